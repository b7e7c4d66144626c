//! FictionBook 2 XML.

use quick_xml::Reader;
use quick_xml::events::Event;

use super::Extracted;
use crate::markup::{FB2_RULES, strip};
use crate::util::{decode_markup, local_name, resolve_entity};

pub(super) fn extract(filename: &str, bytes: &[u8]) -> Extracted {
    let raw = decode_markup(bytes);
    let info = TitleInfo::parse(&raw);
    let author = info.author();
    Extracted::untitled(filename, strip(&raw, &FB2_RULES)).with_metadata(info.title, author)
}

/// `<description><title-info>` fields: book title and the first author.
#[derive(Debug, Default)]
struct TitleInfo {
    title: Option<String>,
    first_name: Option<String>,
    middle_name: Option<String>,
    last_name: Option<String>,
    nickname: Option<String>,
}

impl TitleInfo {
    fn parse(xml: &str) -> Self {
        let mut reader = Reader::from_str(xml);
        let mut info = TitleInfo::default();

        let mut in_title_info = false;
        let mut author_seen = false;
        let mut in_author = false;
        let mut field: Option<Vec<u8>> = None;
        let mut text = String::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = local_name(e.name().as_ref()).to_vec();
                    match name.as_slice() {
                        b"title-info" => in_title_info = true,
                        b"author" if in_title_info && !author_seen => in_author = true,
                        b"book-title" if in_title_info => field = Some(name.clone()),
                        b"first-name" | b"middle-name" | b"last-name" | b"nickname"
                            if in_author =>
                        {
                            field = Some(name.clone())
                        }
                        _ => {}
                    }
                    text.clear();
                }
                Ok(Event::Text(e)) if field.is_some() => {
                    text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
                Ok(Event::GeneralRef(e)) if field.is_some() => {
                    if let Some(resolved) = resolve_entity(&String::from_utf8_lossy(e.as_ref())) {
                        text.push(resolved);
                    }
                }
                Ok(Event::End(e)) => {
                    match local_name(e.name().as_ref()) {
                        b"title-info" => break,
                        b"author" if in_author => {
                            in_author = false;
                            author_seen = true;
                        }
                        _ => {}
                    }
                    if let Some(name) = field.take() {
                        let value = Some(text.trim().to_string()).filter(|v| !v.is_empty());
                        match name.as_slice() {
                            b"book-title" => info.title = value,
                            b"first-name" => info.first_name = value,
                            b"middle-name" => info.middle_name = value,
                            b"last-name" => info.last_name = value,
                            b"nickname" => info.nickname = value,
                            _ => {}
                        }
                    }
                    text.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    log::debug!("fb2 title-info parse stopped early: {e}");
                    break;
                }
                _ => {}
            }
        }

        info
    }

    /// "First Middle Last", or the nickname when no name parts exist.
    fn author(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        if parts.is_empty() {
            self.nickname.clone()
        } else {
            Some(parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::UNKNOWN_AUTHOR;

    const BOOK: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0">
  <description>
    <title-info>
      <author><first-name>Anton</first-name><middle-name>Pavlovich</middle-name><last-name>Chekhov</last-name></author>
      <author><nickname>someone-else</nickname></author>
      <book-title>Short Stories &amp; Sketches</book-title>
    </title-info>
  </description>
  <body>
    <section><title><p>Chapter 1.</p></title><p>The lady with the dog.</p><empty-line/><p>Yalta.</p></section>
  </body>
</FictionBook>"#;

    #[test]
    fn test_fb2_metadata_and_body() {
        let out = extract("stories.fb2", BOOK.as_bytes());
        assert_eq!(out.title, "Short Stories & Sketches");
        assert_eq!(out.author, "Anton Pavlovich Chekhov");
        assert_eq!(out.content, "Chapter 1. The lady with the dog. Yalta.");
    }

    #[test]
    fn test_fb2_nickname_author() {
        let xml = "<FictionBook><description><title-info><author><nickname>anon</nickname></author></title-info></description><body><p>x</p></body></FictionBook>";
        let out = extract("a.fb2", xml.as_bytes());
        assert_eq!(out.author, "anon");
        assert_eq!(out.title, "a");
    }

    #[test]
    fn test_fb2_without_description() {
        let out = extract("bare.fb2", b"<FictionBook><body><p>Just prose.</p></body></FictionBook>");
        assert_eq!(out.content, "Just prose.");
        assert_eq!(out.author, UNKNOWN_AUTHOR);
    }
}
