//! EPUB: every XHTML/HTML body in lexicographic path order.
//!
//! The package spine is deliberately not consulted for ordering. The OPF is
//! read only for title and creator, and any failure there falls back to the
//! filename-derived defaults.

use quick_xml::Reader;
use quick_xml::events::Event;

use super::{DublinCore, Extracted};
use crate::container::{Container, EPUB_BODY_SUFFIXES};
use crate::error::Result;
use crate::markup::{HTML_RULES, strip};

const CONTAINER_XML: &str = "META-INF/container.xml";

pub(super) fn extract(filename: &str, bytes: Vec<u8>) -> Result<Extracted> {
    let mut container = Container::open(bytes)?;

    let bodies = container.list_entries(EPUB_BODY_SUFFIXES);
    log::debug!("epub {filename}: {} body entries", bodies.len());

    let mut sections = Vec::with_capacity(bodies.len());
    for path in &bodies {
        let text = strip(&container.read_entry(path)?, &HTML_RULES);
        if !text.is_empty() {
            sections.push(text);
        }
    }
    let content = sections.join("\n\n");

    let metadata = read_metadata(&mut container);
    Ok(Extracted::untitled(filename, content).with_metadata(metadata.title, metadata.creator))
}

/// Title and creator from the OPF package, or nothing.
fn read_metadata(container: &mut Container) -> DublinCore {
    let opf_path = match container.read_optional(CONTAINER_XML) {
        Ok(Some(xml)) => rootfile_path(&xml),
        Ok(None) => None,
        Err(e) => {
            log::debug!("unreadable {CONTAINER_XML}: {e}");
            None
        }
    };
    let Some(opf_path) = opf_path else {
        return DublinCore::default();
    };

    match container.read_optional(&opf_path) {
        Ok(Some(opf)) => DublinCore::parse(&opf),
        Ok(None) => {
            log::debug!("package document {opf_path} not in archive");
            DublinCore::default()
        }
        Err(e) => {
            log::debug!("unreadable package document {opf_path}: {e}");
            DublinCore::default()
        }
    }
}

/// Find the `full-path` of the first `<rootfile>` in `container.xml`.
fn rootfile_path(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if crate::util::local_name(e.name().as_ref()) == b"rootfile" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"full-path" {
                        return String::from_utf8(attr.value.to_vec()).ok();
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}
