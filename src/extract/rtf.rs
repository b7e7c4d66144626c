//! Rich Text Format: control words and braces removed, paragraphs kept apart.

use super::Extracted;
use crate::markup::{RTF_RULES, strip};

pub(super) fn extract(filename: &str, bytes: &[u8]) -> Extracted {
    let raw = crate::util::decode_text(bytes, None);
    Extracted::untitled(filename, strip(&raw, &RTF_RULES))
}
