//! PDF through a pluggable text-layer decoder.

use super::Extracted;
use crate::error::{Error, Result};

/// Decodes the text layer of a PDF into one string per page.
///
/// The pipeline only joins the pages. How they are produced is up to the
/// implementation.
pub trait PdfTextLayer: Send + Sync {
    fn pages(&self, bytes: &[u8]) -> Result<Vec<String>>;
}

pub(super) fn extract(
    filename: &str,
    bytes: &[u8],
    layer: Option<&dyn PdfTextLayer>,
) -> Result<Extracted> {
    let Some(layer) = layer else {
        return Err(Error::FormatNotSupported(
            "PDF support requires a text-layer decoder; rebuild with the `pdf` feature or convert the file to EPUB or plain text.".to_string(),
        ));
    };

    let pages = layer.pages(bytes)?;
    log::debug!("{filename}: {} pdf pages", pages.len());

    let content = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    Ok(Extracted::untitled(filename, content))
}

/// Text-layer decoder backed by `pdf-extract`.
#[cfg(feature = "pdf")]
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractLayer;

#[cfg(feature = "pdf")]
impl PdfTextLayer for PdfExtractLayer {
    fn pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
            Error::FormatNotSupported(format!(
                "Could not read the PDF text layer ({e}). Scanned PDFs need OCR before import."
            ))
        })
    }
}
