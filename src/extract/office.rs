//! Office Open XML (DOCX) and OpenDocument Text (ODT).
//!
//! Both keep their prose in one fixed XML entry. Metadata lives in a
//! separate optional entry and is read best-effort.

use super::{DublinCore, Extracted};
use crate::container::Container;
use crate::error::Result;
use crate::markup::{DOCX_RULES, ODT_RULES, StripRules, strip};

const DOCX_BODY: &str = "word/document.xml";
const DOCX_CORE: &str = "docProps/core.xml";
const ODT_BODY: &str = "content.xml";
const ODT_META: &str = "meta.xml";

pub(super) fn extract_docx(filename: &str, bytes: Vec<u8>) -> Result<Extracted> {
    extract_fixed(filename, bytes, DOCX_BODY, DOCX_CORE, &DOCX_RULES)
}

pub(super) fn extract_odt(filename: &str, bytes: Vec<u8>) -> Result<Extracted> {
    extract_fixed(filename, bytes, ODT_BODY, ODT_META, &ODT_RULES)
}

fn extract_fixed(
    filename: &str,
    bytes: Vec<u8>,
    body: &str,
    meta: &str,
    rules: &StripRules,
) -> Result<Extracted> {
    let mut container = Container::open(bytes)?;
    let content = strip(&container.read_entry(body)?, rules);

    let dc = match container.read_optional(meta) {
        Ok(Some(xml)) => DublinCore::parse(&xml),
        Ok(None) => DublinCore::default(),
        Err(e) => {
            log::debug!("ignoring unreadable {meta}: {e}");
            DublinCore::default()
        }
    };

    Ok(Extracted::untitled(filename, content).with_metadata(dc.title, dc.creator))
}
