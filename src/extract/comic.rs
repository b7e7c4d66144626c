//! Comic archives. Page images carry no text, so content is never extracted.

use super::Extracted;
use crate::container::{Container, IMAGE_SUFFIXES};
use crate::error::{Error, Result};

const CBR_UNSUPPORTED: &str = "CBR (RAR) comic book files are not supported. Please convert to CBZ format first, or use a dedicated comic reader.";

/// Count page images and return a placeholder explaining why the pages
/// cannot be read.
pub(super) fn extract_cbz(filename: &str, bytes: Vec<u8>) -> Result<Extracted> {
    let container = Container::open(bytes)?;
    let pages = container.list_entries(IMAGE_SUFFIXES).len();
    if pages == 0 {
        return Err(Error::ContainerMissingEntry(
            "*.jpg|*.jpeg|*.png|*.gif|*.webp".to_string(),
        ));
    }
    log::info!("{filename}: comic archive with {pages} pages, text extraction declined");

    let content = format!(
        "This is a comic book file ({filename}) containing {pages} pages.\n\n\
         Comic book files contain images rather than text, so they cannot be read \
         using RSVP or traditional reading modes.\n\n\
         For the best comic reading experience, please use a dedicated comic reader application."
    );
    Ok(Extracted::untitled(filename, content))
}

/// RAR-backed archives are refused without looking at the bytes.
pub(super) fn extract_cbr(filename: &str) -> Result<Extracted> {
    log::debug!("refusing RAR comic archive {filename}");
    Err(Error::FormatNotSupported(CBR_UNSUPPORTED.to_string()))
}
