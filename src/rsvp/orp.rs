use serde::{Deserialize, Serialize};

/// A token split around its Optimal Recognition Point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpWord {
    pub word: String,
    pub orp_index: usize,
    pub before_orp: String,
    pub orp_char: String,
    pub after_orp: String,
}

/// Character index of the fixation point, biased left of center.
///
/// Lengths are counted in characters, not bytes.
pub fn orp_index(word: &str) -> usize {
    let len = word.chars().count();
    match len {
        0..=3 => 0,
        4..=5 => 1,
        6..=9 => 2,
        10..=13 => 3,
        _ => len / 4,
    }
}

/// Split `word` into the text before the ORP, the ORP character, and the
/// text after it.
pub fn process_word(word: &str) -> RsvpWord {
    let orp = orp_index(word);
    let mut chars = word.chars();
    let before_orp: String = chars.by_ref().take(orp).collect();
    let orp_char: String = chars.next().map(String::from).unwrap_or_default();
    let after_orp: String = chars.collect();

    RsvpWord {
        word: word.to_string(),
        orp_index: orp,
        before_orp,
        orp_char,
        after_orp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_orp_bands() {
        let cases = [
            ("", 0),
            ("a", 0),
            ("cat", 0),
            ("word", 1),
            ("quick", 1),
            ("reading", 2),
            ("somewhere", 2),
            ("straighten", 3),
            ("extraordinary", 3),
            ("incomprehensible", 4),
            ("internationalization", 5),
        ];
        for (word, expected) in cases {
            assert_eq!(orp_index(word), expected, "{word}");
        }
    }

    #[test]
    fn test_process_word() {
        let cat = process_word("cat");
        assert_eq!(cat.before_orp, "");
        assert_eq!(cat.orp_char, "c");
        assert_eq!(cat.after_orp, "at");
        assert_eq!(cat.orp_index, 0);

        let reading = process_word("reading");
        assert_eq!(reading.orp_index, 2);
        assert_eq!(reading.before_orp, "re");
        assert_eq!(reading.orp_char, "a");
        assert_eq!(reading.after_orp, "ding");
    }

    #[test]
    fn test_process_empty_and_multibyte() {
        assert_eq!(process_word(""), RsvpWord::default());

        let word = process_word("naïveté");
        assert_eq!(word.before_orp, "na");
        assert_eq!(word.orp_char, "ï");
        assert_eq!(word.after_orp, "veté");
    }

    proptest! {
        #[test]
        fn prop_orp_in_bounds_and_reassembles(word in "\\PC{0,40}") {
            let len = word.chars().count();
            let split = process_word(&word);
            if len == 0 {
                prop_assert_eq!(split.orp_index, 0);
            } else {
                prop_assert!(split.orp_index < len);
            }
            let rebuilt = format!("{}{}{}", split.before_orp, split.orp_char, split.after_orp);
            prop_assert_eq!(rebuilt, word);
        }
    }
}
