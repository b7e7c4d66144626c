//! # lector
//!
//! Document ingestion and rapid serial visual presentation (RSVP).
//!
//! ## Features
//!
//! - Import plain text, Markdown, HTML, EPUB, DOCX, ODT, RTF, FB2, PDF
//!   (with the `pdf` feature or a custom text layer), plus best-effort
//!   salvage of legacy `.doc` and MOBI/AZW files
//! - Normalize every format to one text blob with chapters derived from
//!   heading lines
//! - Split words around their Optimal Recognition Point and time them by
//!   punctuation and length
//! - Drive playback with a cancellable single-tick timer
//!
//! ## Quick Start
//!
//! ```
//! use lector::{assemble, process_word, tokenize};
//!
//! let doc = assemble("note.txt", b"Hello world. This is a test.".to_vec()).unwrap();
//! assert_eq!(doc.word_count, 6);
//! assert_eq!(doc.chapters.len(), 1);
//!
//! let words = tokenize(&doc.content);
//! let split = process_word(&words[1]);
//! assert_eq!(split.before_orp, "wo");
//! assert_eq!(split.orp_char, "r");
//! ```
//!
//! ## Playback
//!
//! ```
//! use lector::{PlaybackController, PlaybackState};
//!
//! let words = vec!["One".to_string(), "two.".to_string()];
//! let mut controller = PlaybackController::new(words, 0, 300, 150);
//! controller.on_position_change(|position| println!("at word {position}"));
//! controller.play();
//! controller.tick();
//! assert_eq!(controller.state(), PlaybackState::Completed);
//! ```

pub mod assemble;
pub mod chapters;
pub mod container;
pub mod document;
pub mod error;
pub mod extract;
pub mod format;
pub mod markup;
pub mod playback;
pub mod preferences;
pub mod rsvp;
pub mod salvage;
pub mod store;
pub(crate) mod util;

pub use assemble::{Assembler, assemble};
pub use document::{Chapter, Document, Page, Paragraph};
pub use error::{Error, Result};
pub use extract::{PdfTextLayer, UNKNOWN_AUTHOR};
#[cfg(feature = "pdf")]
pub use extract::PdfExtractLayer;
pub use format::Format;
pub use playback::{PlaybackController, PlaybackSession, PlaybackState, PositionCoalescer};
pub use preferences::{MAX_WPM, MIN_WPM, UserPreferences, WPM_STEP, clamp_wpm, step_wpm};
pub use rsvp::{RsvpWord, delay, orp_index, process_word, tokenize};
pub use store::{DocumentStore, JsonStore, MemoryStore, ReadingSession, update_progress};
pub use util::time_now_millis;
