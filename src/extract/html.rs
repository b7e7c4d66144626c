//! Standalone HTML files.

use super::Extracted;
use crate::markup::{HTML_RULES, strip};

pub(super) fn extract(filename: &str, bytes: &[u8]) -> Extracted {
    let raw = crate::util::decode_markup(bytes);
    Extracted::untitled(filename, strip(&raw, &HTML_RULES))
}
