//! Named-entry access to ZIP-based containers (EPUB, DOCX, ODT, CBZ).

use std::io::{Cursor, Read};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};

/// Body documents inside an EPUB.
pub const EPUB_BODY_SUFFIXES: &[&str] = &[".html", ".xhtml"];

/// Page images inside a comic archive.
pub const IMAGE_SUFFIXES: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// An opened ZIP container held entirely in memory.
pub struct Container {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl Container {
    /// Open a ZIP container from raw bytes.
    ///
    /// Anything that is not a readable ZIP central directory fails with
    /// [`Error::ContainerCorrupt`].
    pub fn open(bytes: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::ContainerCorrupt(e.to_string()))?;
        log::debug!("opened container with {} entries", archive.len());
        Ok(Self { archive })
    }

    /// Number of entries, directories included.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// List file entries whose path ends with one of `suffixes`
    /// (ASCII case-insensitive), sorted lexicographically by path.
    ///
    /// The sort is the reading-order contract for formats that have no
    /// manifest-driven spine.
    pub fn list_entries(&self, suffixes: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .filter(|name| {
                let lower = name.to_ascii_lowercase();
                suffixes.iter().any(|suffix| lower.ends_with(suffix))
            })
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    /// Check whether an entry exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.archive.index_for_name(path).is_some()
    }

    /// Read the raw bytes of the entry at `path`.
    pub fn read_entry_bytes(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut file = match self.archive.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(Error::ContainerMissingEntry(path.to_string()));
            }
            Err(e) => return Err(Error::MalformedArchiveEntry(format!("{path}: {e}"))),
        };

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| Error::MalformedArchiveEntry(format!("{path}: {e}")))?;
        Ok(contents)
    }

    /// Read the entry at `path` as text.
    ///
    /// Decoding follows [`crate::util::decode_markup`]: UTF-8, then the XML
    /// declaration's encoding, then Windows-1252.
    pub fn read_entry(&mut self, path: &str) -> Result<String> {
        let bytes = self.read_entry_bytes(path)?;
        Ok(crate::util::decode_markup(&bytes).into_owned())
    }

    /// Read an entry if it exists, treating absence as `None`.
    pub fn read_optional(&mut self, path: &str) -> Result<Option<String>> {
        match self.read_entry(path) {
            Ok(text) => Ok(Some(text)),
            Err(Error::ContainerMissingEntry(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
