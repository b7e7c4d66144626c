/// Split text into word tokens on whitespace runs, keeping punctuation
/// attached to its word.
///
/// Positions stored in a [`crate::Document`] index into this sequence, so
/// it depends on nothing but `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Number of tokens [`tokenize`] would produce, without allocating them.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
