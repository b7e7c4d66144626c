//! Word-level primitives for rapid serial visual presentation.
//!
//! - [`tokenize`] turns normalized text into the word sequence every
//!   position in the crate indexes into
//! - [`orp_index`] and [`process_word`] pick the fixation character
//! - [`delay`] decides how long a word stays on screen

mod delay;
mod orp;
mod tokenize;

pub use delay::delay;
pub use orp::{RsvpWord, orp_index, process_word};
pub use tokenize::{count_words, tokenize};
