//! Plain text and Markdown: the file's own text, line endings normalized.

use super::Extracted;

pub(super) fn extract(filename: &str, bytes: &[u8]) -> Extracted {
    let raw = crate::util::decode_text(bytes, None);
    let content = raw.replace("\r\n", "\n").replace('\r', "\n").trim().to_string();
    Extracted::untitled(filename, content)
}
