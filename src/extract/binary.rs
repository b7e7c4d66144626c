//! Legacy Word `.doc` and MOBI/AZW binaries, recovered by salvage.

use super::Extracted;
use crate::error::Result;
use crate::format::Format;
use crate::salvage::{DOC_LEGACY_POLICY, MOBI_POLICY, salvage_with_policy};

/// Offset of the type/creator pair in a PalmDB header.
const PALMDB_TYPE_OFFSET: usize = 60;
const PALMDB_NAME_LEN: usize = 32;

pub(super) fn extract_doc(filename: &str, bytes: &[u8]) -> Result<Extracted> {
    let content = salvage_with_policy(bytes, Format::DocLegacy, DOC_LEGACY_POLICY)?;
    Ok(Extracted::untitled(filename, content))
}

pub(super) fn extract_mobi(filename: &str, bytes: &[u8]) -> Result<Extracted> {
    let content = salvage_with_policy(bytes, Format::Mobi, MOBI_POLICY)?;
    Ok(Extracted::untitled(filename, content).with_metadata(palmdb_name(bytes), None))
}

/// The database name from a PalmDB header, if this is a MOBI or PalmDOC
/// file and the name is printable.
fn palmdb_name(bytes: &[u8]) -> Option<String> {
    let kind = bytes.get(PALMDB_TYPE_OFFSET..PALMDB_TYPE_OFFSET + 8)?;
    if kind != b"BOOKMOBI" && kind != b"TEXtREAd" {
        return None;
    }

    let raw = &bytes[..PALMDB_NAME_LEN];
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let name = &raw[..end];
    if name.is_empty() || !name.iter().all(|b| (0x20..=0x7E).contains(b)) {
        return None;
    }

    Some(String::from_utf8_lossy(name).replace('_', " "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const PROSE: &[u8] = b"It is a truth universally acknowledged, that a single man in possession of a good fortune, must be in want of a wife.";

    fn mobi_fixture(name: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; 78];
        data[..name.len()].copy_from_slice(name);
        data[60..68].copy_from_slice(b"BOOKMOBI");
        data.extend_from_slice(&[0xE9, 0x01]);
        data.extend_from_slice(PROSE);
        data.extend_from_slice(&[0x00, 0x02, 0xFF]);
        data
    }

    #[test]
    fn test_mobi_salvage_with_palmdb_title() {
        let out = extract_mobi("pride.azw3", &mobi_fixture(b"Pride_and_Prejudice")).unwrap();
        assert_eq!(out.title, "Pride and Prejudice");
        assert!(out.content.contains("truth universally acknowledged"));
    }

    #[test]
    fn test_mobi_unprintable_name_uses_filename() {
        let out = extract_mobi("pride.mobi", &mobi_fixture(b"\x01\x02")).unwrap();
        assert_eq!(out.title, "pride");
    }

    #[test]
    fn test_mobi_rejects_noise() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i % 7) as u8).collect();
        match extract_mobi("noise.mobi", &data) {
            Err(Error::UnrecoverableBinaryFormat { format, .. }) => assert_eq!(format, Format::Mobi),
            other => panic!("expected UnrecoverableBinaryFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_doc_salvage() {
        let mut data = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        data.extend_from_slice(PROSE);
        let out = extract_doc("memo.doc", &data).unwrap();
        assert_eq!(out.title, "memo");
        assert_eq!(out.content, std::str::from_utf8(PROSE).unwrap());
    }

    #[test]
    fn test_doc_error_message_has_hint() {
        let err = extract_doc("memo.doc", b"\x00\x01short\x00").unwrap_err();
        assert!(err.to_string().contains("save the document as .docx"));
    }
}
