//! Small helpers shared by the extractors and the document model.

use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::bytes::Regex as BytesRegex;

/// Get current time as milliseconds since Unix epoch.
pub fn time_now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generate a fresh unique identifier for documents and chapters.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Text of a document payload.
///
/// Valid UTF-8 wins, minus any BOM. Anything else is decoded with the
/// `declared` label when `encoding_rs` knows it, else as Windows-1252, so a
/// legacy file always yields some text.
pub fn decode_text<'a>(bytes: &'a [u8], declared: Option<&str>) -> Cow<'a, str> {
    let (text, _, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return text;
    }
    let encoding = declared
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::WINDOWS_1252);
    log::debug!("payload is not UTF-8, decoding as {}", encoding.name());
    encoding.decode(bytes).0
}

/// Decode a markup payload, honouring the encoding named in its XML declaration.
pub fn decode_markup(bytes: &[u8]) -> Cow<'_, str> {
    decode_text(bytes, declared_encoding(bytes))
}

static XML_DECLARED_ENCODING: LazyLock<BytesRegex> = LazyLock::new(|| {
    BytesRegex::new(r#"<\?xml[^>]*?\bencoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("valid encoding declaration pattern")
});

/// Encoding label from an `<?xml ... encoding="..."?>` declaration near the
/// start of `bytes`.
pub fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let head = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    let label = XML_DECLARED_ENCODING.captures(head)?.get(1)?;
    std::str::from_utf8(label.as_bytes()).ok()
}

const DECLARATION_WINDOW: usize = 128;

/// Extract local name from namespaced XML name (e.g., "dc:title" -> "title").
pub fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Character for an XML general reference (`amp`, `#233`, `#xE9`).
///
/// Covers the predefined XML entities plus `nbsp`, which turns up in
/// hand-written metadata.
pub fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let reference = name.strip_prefix('#')?;
            let code = match reference.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => reference.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_strips_bom() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFhi", None), "hi");
    }

    #[test]
    fn test_decode_text_utf8_and_fallback() {
        assert_eq!(decode_text("caf\u{e9}".as_bytes(), None), "caf\u{e9}");

        // 0xE9 alone is invalid UTF-8, but 'é' in Windows-1252
        assert_eq!(decode_text(b"caf\xE9", None), "caf\u{e9}");

        // ISO-8859-7 hint: 0xE1 is Greek small alpha
        assert_eq!(decode_text(b"\xE1", Some("iso-8859-7")), "\u{3b1}");
    }

    #[test]
    fn test_declared_encoding() {
        assert_eq!(
            declared_encoding(br#"<?xml version="1.0" encoding="windows-1251"?><a/>"#),
            Some("windows-1251")
        );
        assert_eq!(
            declared_encoding(b"\xEF\xBB\xBF<?xml version='1.0' encoding = 'UTF-8'?>"),
            Some("UTF-8")
        );
        assert_eq!(declared_encoding(b"<html></html>"), None);
        assert_eq!(declared_encoding(br#"<?xml version="1.0"?><p encoding="x"/>"#), None);
    }

    #[test]
    fn test_declared_encoding_drives_markup_decoding() {
        let xml = b"<?xml version=\"1.0\" encoding=\"windows-1251\"?><p>\xCF\xF0\xE8</p>";
        assert!(decode_markup(xml).ends_with("<p>\u{41f}\u{440}\u{438}</p>"));
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"title"), b"title");
        assert_eq!(local_name(b"dc:title"), b"title");
        assert_eq!(local_name(b""), b"");
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp"), Some('&'));
        assert_eq!(resolve_entity("#65"), Some('A'));
        assert_eq!(resolve_entity("#x2019"), Some('\u{2019}'));
        assert_eq!(resolve_entity("#xD800"), None);
        assert_eq!(resolve_entity("bogus"), None);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\tc  "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }
}
