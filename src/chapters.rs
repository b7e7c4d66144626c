//! Heading-driven chapter segmentation over the token stream.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::Chapter;
use crate::rsvp::count_words;

/// Title of the single chapter emitted when no heading is found.
pub const WHOLE_DOCUMENT_TITLE: &str = "Full Document";

/// Title of the chapter covering words that precede the first heading.
pub const FRONT_MATTER_TITLE: &str = "Front Matter";

const MAX_TITLE_CHARS: usize = 50;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:chapter|part|section)\s*[0-9]*[.:]").expect("valid heading pattern")
});

/// Whether a trimmed line opens a new chapter.
pub fn is_heading(line: &str) -> bool {
    HEADING.is_match(line.trim())
}

/// Partition the words of `text` into chapters.
///
/// Lines are scanned in order with a running word cursor. Each heading line
/// closes the chapter in progress at `cursor - 1` and opens a new one at
/// `cursor`. The result always covers `[0, word_count)` without gaps: words
/// before the first heading get their own leading chapter, and text with no
/// heading at all is one chapter.
pub fn segment(text: &str) -> Vec<Chapter> {
    let total = count_words(text);
    let mut chapters = Vec::new();
    let mut open: Option<(String, usize)> = None;
    let mut cursor = 0;

    for line in text.split('\n') {
        let trimmed = line.trim();
        if HEADING.is_match(trimmed) {
            match open.take() {
                Some((title, start)) => chapters.push(Chapter::spanning(title, start, cursor - 1)),
                None if cursor > 0 => {
                    chapters.push(Chapter::spanning(FRONT_MATTER_TITLE, 0, cursor - 1))
                }
                None => {}
            }
            open = Some((trimmed.chars().take(MAX_TITLE_CHARS).collect(), cursor));
        }
        cursor += count_words(line);
    }

    match open {
        Some((title, start)) => chapters.push(Chapter::spanning(title, start, total - 1)),
        None if total == 0 => chapters.push(Chapter::empty(WHOLE_DOCUMENT_TITLE)),
        None => chapters.push(Chapter::spanning(WHOLE_DOCUMENT_TITLE, 0, total - 1)),
    }

    log::debug!("segmented {total} words into {} chapters", chapters.len());
    chapters
}
