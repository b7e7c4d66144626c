//! Extension-based format resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The closed set of document formats the ingestion pipeline understands.
///
/// Adding a format means adding a variant here, an arm in
/// [`Format::from_extension`], and an extractor arm in
/// [`crate::extract::extract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    Text,
    Markdown,
    Pdf,
    Epub,
    Html,
    Docx,
    DocLegacy,
    Odt,
    Rtf,
    Fb2,
    /// MOBI and the AZW/AZW3 Kindle family.
    Mobi,
    /// ZIP-backed comic archive (`.cbz`).
    ComicZip,
    /// RAR-backed comic archive (`.cbr`).
    ComicRar,
}

impl Format {
    /// Resolve a format from a filename by its lowercased final extension.
    ///
    /// There is no content sniffing: a file named `notes` or `book.xyz`
    /// fails with [`Error::UnsupportedFormat`] carrying the raw extension.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();
        Self::from_extension(ext)
    }

    /// Resolve a format from a bare extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Result<Self> {
        let format = match ext.to_ascii_lowercase().as_str() {
            "txt" => Format::Text,
            "md" | "markdown" => Format::Markdown,
            "pdf" => Format::Pdf,
            "epub" => Format::Epub,
            "html" | "htm" | "xhtml" => Format::Html,
            "docx" => Format::Docx,
            "doc" => Format::DocLegacy,
            "odt" => Format::Odt,
            "rtf" => Format::Rtf,
            "fb2" => Format::Fb2,
            "mobi" | "azw" | "azw3" => Format::Mobi,
            "cbz" => Format::ComicZip,
            "cbr" => Format::ComicRar,
            _ => return Err(Error::UnsupportedFormat(ext.to_string())),
        };
        Ok(format)
    }

    /// Human-readable format name.
    pub fn display_name(self) -> &'static str {
        match self {
            Format::Text => "Plain Text",
            Format::Markdown => "Markdown",
            Format::Pdf => "PDF",
            Format::Epub => "EPUB",
            Format::Html => "HTML",
            Format::Docx => "Word Document",
            Format::DocLegacy => "Word (Legacy)",
            Format::Odt => "OpenDocument",
            Format::Rtf => "Rich Text",
            Format::Fb2 => "FictionBook",
            Format::Mobi => "Mobi/Kindle",
            Format::ComicZip => "Comic Book (ZIP)",
            Format::ComicRar => "Comic Book (RAR)",
        }
    }

    /// Get the MIME type string for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Text => "text/plain",
            Format::Markdown => "text/markdown",
            Format::Pdf => "application/pdf",
            Format::Epub => "application/epub+zip",
            Format::Html => "text/html",
            Format::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Format::DocLegacy => "application/msword",
            Format::Odt => "application/vnd.oasis.opendocument.text",
            Format::Rtf => "application/rtf",
            Format::Fb2 => "application/x-fictionbook+xml",
            Format::Mobi => "application/x-mobipocket-ebook",
            Format::ComicZip => "application/vnd.comicbook+zip",
            Format::ComicRar => "application/vnd.comicbook-rar",
        }
    }

    /// Check if this format is stored inside a ZIP container.
    pub fn is_zip_backed(self) -> bool {
        matches!(
            self,
            Format::Epub | Format::Docx | Format::Odt | Format::ComicZip
        )
    }

    /// Every supported format, in declaration order.
    pub const ALL: [Format; 13] = [
        Format::Text,
        Format::Markdown,
        Format::Pdf,
        Format::Epub,
        Format::Html,
        Format::Docx,
        Format::DocLegacy,
        Format::Odt,
        Format::Rtf,
        Format::Fb2,
        Format::Mobi,
        Format::ComicZip,
        Format::ComicRar,
    ];
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Strip the final extension from a filename to produce a default title.
pub fn title_from_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_extension() {
        assert_eq!(Format::from_filename("book.epub").unwrap(), Format::Epub);
        assert_eq!(Format::from_filename("BOOK.EPUB").unwrap(), Format::Epub);
        assert_eq!(Format::from_filename("notes.md").unwrap(), Format::Markdown);
        assert_eq!(Format::from_filename("page.htm").unwrap(), Format::Html);
        assert_eq!(Format::from_filename("a.b.c.azw3").unwrap(), Format::Mobi);
        assert_eq!(Format::from_filename("old.doc").unwrap(), Format::DocLegacy);
        assert_eq!(Format::from_filename("comic.cbr").unwrap(), Format::ComicRar);
    }

    #[test]
    fn test_unknown_extension_carries_raw_string() {
        match Format::from_filename("archive.XyZ") {
            Err(Error::UnsupportedFormat(ext)) => assert_eq!(ext, "XyZ"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
        match Format::from_filename("README") {
            Err(Error::UnsupportedFormat(ext)) => assert_eq!(ext, ""),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_zip_backed() {
        assert!(Format::Epub.is_zip_backed());
        assert!(Format::ComicZip.is_zip_backed());
        assert!(!Format::ComicRar.is_zip_backed());
        assert!(!Format::Mobi.is_zip_backed());
    }

    #[test]
    fn test_title_from_filename() {
        assert_eq!(title_from_filename("My Book.txt"), "My Book");
        assert_eq!(title_from_filename("dir/sub/novel.tar.epub"), "novel.tar");
        assert_eq!(title_from_filename(".hidden"), ".hidden");
        assert_eq!(title_from_filename("plain"), "plain");
    }
}
