//! The normalized document record and its derived views.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extract::{Extracted, UNKNOWN_AUTHOR};
use crate::format::Format;
use crate::rsvp::{count_words, tokenize};
use crate::util::{new_id, time_now_millis};

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph pattern"));

/// A contiguous, inclusive range of word indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub start_word_index: usize,
    pub end_word_index: usize,
    pub word_count: usize,
}

impl Chapter {
    /// Chapter covering `start..=end`.
    pub fn spanning(title: impl Into<String>, start: usize, end: usize) -> Self {
        debug_assert!(end >= start);
        Self {
            id: new_id(),
            title: title.into(),
            start_word_index: start,
            end_word_index: end,
            word_count: end - start + 1,
        }
    }

    /// The only chapter of a document with no words.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            start_word_index: 0,
            end_word_index: 0,
            word_count: 0,
        }
    }

    pub fn contains(&self, word_index: usize) -> bool {
        self.word_count > 0
            && word_index >= self.start_word_index
            && word_index <= self.end_word_index
    }
}

/// A document ready for reading: normalized content plus reading state.
///
/// Content, chapters and word count are fixed at creation. Only
/// `current_position`, `last_read` and `reading_progress` change afterwards,
/// and stores replace the whole record when persisting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default = "unknown_author")]
    pub author: String,
    /// Original filename.
    #[serde(default)]
    pub source: String,
    pub format: Format,
    pub content: String,
    pub word_count: usize,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub date_added: u64,
    /// 0 when never read.
    #[serde(default)]
    pub last_read: u64,
    #[serde(default)]
    pub current_position: usize,
    /// Percentage, 0-100.
    #[serde(default)]
    pub reading_progress: u32,
}

fn unknown_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

impl Document {
    pub(crate) fn new(
        source: &str,
        format: Format,
        extracted: Extracted,
        chapters: Vec<Chapter>,
    ) -> Self {
        Self {
            id: new_id(),
            title: extracted.title,
            author: extracted.author,
            source: source.to_string(),
            format,
            word_count: count_words(&extracted.content),
            content: extracted.content,
            chapters,
            date_added: time_now_millis(),
            last_read: 0,
            current_position: 0,
            reading_progress: 0,
        }
    }

    /// The token sequence positions index into.
    pub fn words(&self) -> Vec<String> {
        tokenize(&self.content)
    }

    /// Index of the last word, or 0 for an empty document.
    pub fn last_index(&self) -> usize {
        self.word_count.saturating_sub(1)
    }

    /// Move the reading cursor, clamped to the last word, and refresh the
    /// derived progress and last-read time. Returns the stored position.
    pub fn record_position(&mut self, position: usize) -> usize {
        let position = position.min(self.last_index());
        self.current_position = position;
        self.reading_progress = progress_percent(position, self.word_count);
        self.last_read = time_now_millis();
        position
    }

    /// The chapter containing `word_index`.
    pub fn chapter_at(&self, word_index: usize) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.contains(word_index))
    }

    /// Blank-line separated paragraphs with their word ranges.
    pub fn paragraphs(&self) -> Vec<Paragraph<'_>> {
        let mut cursor = 0;
        PARAGRAPH_BREAK
            .split(&self.content)
            .filter_map(|text| {
                let words = count_words(text);
                if words == 0 {
                    return None;
                }
                let paragraph = Paragraph {
                    text: text.trim(),
                    start_word_index: cursor,
                    end_word_index: cursor + words - 1,
                };
                cursor += words;
                Some(paragraph)
            })
            .collect()
    }

    /// Lay the document out as pages of at most `words_per_page` words.
    ///
    /// Whole paragraphs are kept together when they fit. A paragraph longer
    /// than a page starts on a fresh page and is cut at word boundaries.
    pub fn pages(&self, words_per_page: usize) -> Vec<Page> {
        let per_page = words_per_page.max(1);
        let mut pages = Vec::new();
        let mut page_start = 0;
        let mut page_len = 0;

        for paragraph in self.paragraphs() {
            let mut start = paragraph.start_word_index;
            let mut remaining = paragraph.word_count();

            if page_len > 0 && page_len + remaining > per_page {
                pages.push(Page::new(page_start, page_len));
                page_len = 0;
            }
            if page_len == 0 {
                page_start = start;
            }
            while remaining > per_page {
                pages.push(Page::new(start, per_page));
                start += per_page;
                remaining -= per_page;
                page_start = start;
            }
            page_len += remaining;
        }
        if page_len > 0 {
            pages.push(Page::new(page_start, page_len));
        }
        pages
    }

    /// Zero-based page holding `word_index` under [`Document::pages`].
    pub fn page_of(&self, word_index: usize, words_per_page: usize) -> usize {
        let pages = self.pages(words_per_page);
        pages
            .iter()
            .position(|p| word_index <= p.end_word_index)
            .unwrap_or(pages.len().saturating_sub(1))
    }
}

/// `round(position / word_count * 100)`, 0 for empty documents.
pub fn progress_percent(position: usize, word_count: usize) -> u32 {
    if word_count == 0 {
        return 0;
    }
    ((position as f64 / word_count as f64) * 100.0).round() as u32
}

/// One paragraph of a document's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paragraph<'a> {
    pub text: &'a str,
    pub start_word_index: usize,
    pub end_word_index: usize,
}

impl Paragraph<'_> {
    pub fn word_count(&self) -> usize {
        self.end_word_index - self.start_word_index + 1
    }
}

/// A page of the traditional reading view, as an inclusive word range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub start_word_index: usize,
    pub end_word_index: usize,
}

impl Page {
    fn new(start: usize, len: usize) -> Self {
        Self {
            start_word_index: start,
            end_word_index: start + len - 1,
        }
    }

    pub fn word_count(&self) -> usize {
        self.end_word_index - self.start_word_index + 1
    }
}
