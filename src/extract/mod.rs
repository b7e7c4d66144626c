//! Per-format text extraction.
//!
//! Each supported [`Format`] maps to exactly one strategy. The dispatch is a
//! closed `match`: adding a format means adding a variant and an arm here.

mod binary;
mod comic;
mod epub;
mod fb2;
mod html;
mod office;
mod pdf;
mod rtf;
mod text;

pub use pdf::PdfTextLayer;
#[cfg(feature = "pdf")]
pub use pdf::PdfExtractLayer;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::Result;
use crate::format::{Format, title_from_filename};

/// Author recorded when no author can be recovered from the file.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Output of one extractor: metadata plus normalized plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub author: String,
    pub content: String,
}

impl Extracted {
    /// Content with filename-derived title and the unknown author.
    pub fn untitled(filename: &str, content: String) -> Self {
        Self {
            title: title_from_filename(filename),
            author: UNKNOWN_AUTHOR.to_string(),
            content,
        }
    }

    /// Overlay recovered metadata, keeping the defaults for blank fields.
    pub fn with_metadata(mut self, title: Option<String>, author: Option<String>) -> Self {
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            self.title = crate::util::collapse_whitespace(&title);
        }
        if let Some(author) = author.filter(|a| !a.trim().is_empty()) {
            self.author = crate::util::collapse_whitespace(&author);
        }
        self
    }
}

/// Run the extractor for `format` over the raw file bytes.
pub fn extract(
    format: Format,
    filename: &str,
    bytes: Vec<u8>,
    pdf: Option<&dyn PdfTextLayer>,
) -> Result<Extracted> {
    log::debug!("extracting {filename} as {format} ({} bytes)", bytes.len());
    match format {
        Format::Text | Format::Markdown => Ok(text::extract(filename, &bytes)),
        Format::Html => Ok(html::extract(filename, &bytes)),
        Format::Epub => epub::extract(filename, bytes),
        Format::Docx => office::extract_docx(filename, bytes),
        Format::Odt => office::extract_odt(filename, bytes),
        Format::Rtf => Ok(rtf::extract(filename, &bytes)),
        Format::Fb2 => Ok(fb2::extract(filename, &bytes)),
        Format::DocLegacy => binary::extract_doc(filename, &bytes),
        Format::Mobi => binary::extract_mobi(filename, &bytes),
        Format::ComicZip => comic::extract_cbz(filename, bytes),
        Format::ComicRar => comic::extract_cbr(filename),
        Format::Pdf => pdf::extract(filename, &bytes, pdf),
    }
}

/// Dublin Core title and creator, as found in EPUB OPF packages, DOCX
/// `docProps/core.xml` and ODT `meta.xml`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct DublinCore {
    pub title: Option<String>,
    pub creator: Option<String>,
}

impl DublinCore {
    /// Collect the first `title` and the first `creator` (or ODF
    /// `initial-creator`) element, ignoring namespace prefixes.
    ///
    /// Malformed XML yields whatever was read before the error.
    pub fn parse(content: &str) -> Self {
        // No trim_text: text is split around entity references and trimming
        // would eat the spaces next to them.
        let mut reader = Reader::from_str(content);

        let mut dc = DublinCore::default();
        let mut current: Option<&'static str> = None;
        let mut buf_text = String::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    current = match crate::util::local_name(e.name().as_ref()) {
                        b"title" if dc.title.is_none() => Some("title"),
                        b"creator" | b"initial-creator" if dc.creator.is_none() => {
                            Some("creator")
                        }
                        _ => None,
                    };
                    buf_text.clear();
                }
                Ok(Event::Text(e)) => {
                    if current.is_some() {
                        buf_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Ok(Event::GeneralRef(e)) => {
                    if current.is_some()
                        && let Some(resolved) =
                            crate::util::resolve_entity(&String::from_utf8_lossy(e.as_ref()))
                    {
                        buf_text.push(resolved);
                    }
                }
                Ok(Event::End(_)) => {
                    match current.take() {
                        Some("title") => dc.title = Some(buf_text.clone()),
                        Some("creator") => dc.creator = Some(buf_text.clone()),
                        _ => {}
                    }
                    buf_text.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    log::debug!("metadata XML parse stopped early: {e}");
                    break;
                }
                _ => {}
            }
        }

        dc
    }
}
