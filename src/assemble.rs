//! From file bytes to a [`Document`].

use std::path::Path;

use crate::chapters::segment;
use crate::document::Document;
use crate::error::Result;
use crate::extract::{self, PdfTextLayer};
use crate::format::Format;

const COMIC_CHAPTER_TITLE: &str = "Comic Info";

/// Runs format resolution, extraction and chapter segmentation.
///
/// Holds the optional PDF text-layer decoder; everything else is stateless.
pub struct Assembler {
    pdf: Option<Box<dyn PdfTextLayer>>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    /// An assembler with the built-in PDF decoder when the `pdf` feature
    /// is enabled, and none otherwise.
    pub fn new() -> Self {
        #[cfg(feature = "pdf")]
        let pdf: Option<Box<dyn PdfTextLayer>> = Some(Box::new(extract::PdfExtractLayer));
        #[cfg(not(feature = "pdf"))]
        let pdf: Option<Box<dyn PdfTextLayer>> = None;
        Self { pdf }
    }

    /// Use `layer` for PDF files.
    pub fn with_pdf_layer(mut self, layer: impl PdfTextLayer + 'static) -> Self {
        self.pdf = Some(Box::new(layer));
        self
    }

    /// Build a document from a file's name and raw bytes.
    ///
    /// Fails with the extractor's error unchanged; assembly adds no failure
    /// modes of its own.
    pub fn assemble(&self, filename: &str, bytes: Vec<u8>) -> Result<Document> {
        let format = Format::from_filename(filename)?;
        let extracted = extract::extract(format, filename, bytes, self.pdf.as_deref())?;

        let mut chapters = segment(&extracted.content);
        if format == Format::ComicZip
            && let [only] = chapters.as_mut_slice()
        {
            only.title = COMIC_CHAPTER_TITLE.to_string();
        }

        let document = Document::new(filename, format, extracted, chapters);
        log::info!(
            "imported {filename} as {format}: {} words, {} chapters",
            document.word_count,
            document.chapters.len()
        );
        Ok(document)
    }

    /// Read and assemble a file from disk.
    ///
    /// The extension is checked before any bytes are read, and the read is
    /// the only I/O.
    pub fn import_path(&self, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let filename = file_name(path);
        Format::from_filename(&filename)?;
        let bytes = std::fs::read(path)?;
        self.assemble(&filename, bytes)
    }

    /// [`Assembler::import_path`] with the read awaited on tokio.
    pub async fn import_path_async(&self, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let filename = file_name(path);
        Format::from_filename(&filename)?;
        let bytes = tokio::fs::read(path).await?;
        self.assemble(&filename, bytes)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Assemble with a default [`Assembler`].
pub fn assemble(filename: &str, bytes: Vec<u8>) -> Result<Document> {
    Assembler::new().assemble(filename, bytes)
}
