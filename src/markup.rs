//! Rule-driven markup stripping for HTML, XHTML, XML payloads and RTF.
//!
//! One routine serves every markup-bearing format. Each format supplies a
//! [`StripRules`] table:
//!
//! 1. `drop` patterns remove whole blocks, body included (`<script>`,
//!    `<style>`, FB2 `<binary>`, RTF font tables), repeated until none
//!    match so nested RTF groups fall away innermost first
//! 2. `breaks` patterns turn paragraph and line-break markers into newlines
//! 3. `remove` patterns delete everything else that is markup, replaced by
//!    `remove_with`
//! 4. entities are decoded in a single pass
//! 5. whitespace runs collapse to one space and the result is trimmed

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Per-format stripping table.
#[derive(Debug)]
pub struct StripRules {
    drop: Vec<Regex>,
    breaks: Vec<(Regex, &'static str)>,
    remove: Vec<Regex>,
    remove_with: &'static str,
    decode_entities: bool,
}

impl StripRules {
    fn new(
        drop: &[&str],
        breaks: &[(&str, &'static str)],
        remove: &[&str],
        remove_with: &'static str,
        decode_entities: bool,
    ) -> Self {
        let compile = |p: &str| Regex::new(p).expect("valid strip pattern");
        Self {
            drop: drop.iter().map(|p| compile(p)).collect(),
            breaks: breaks.iter().map(|(p, r)| (compile(p), *r)).collect(),
            remove: remove.iter().map(|p| compile(p)).collect(),
            remove_with,
            decode_entities,
        }
    }
}

const SCRIPT_BLOCK: &str = r"(?is)<script\b[^>]*>.*?</script\s*>";
const STYLE_BLOCK: &str = r"(?is)<style\b[^>]*>.*?</style\s*>";
const ANY_TAG: &str = r"<[^>]+>";

/// HTML documents and the XHTML bodies inside EPUB containers.
pub static HTML_RULES: LazyLock<StripRules> = LazyLock::new(|| {
    StripRules::new(
        &[SCRIPT_BLOCK, STYLE_BLOCK, r"(?s)<!--.*?-->"],
        &[(r"(?i)<(?:p|br|div|li|tr|h[1-6])\b[^>]*>", "\n")],
        &[ANY_TAG],
        " ",
        true,
    )
});

/// `word/document.xml` inside DOCX. Text runs split words, so tags vanish
/// without a separator.
pub static DOCX_RULES: LazyLock<StripRules> = LazyLock::new(|| {
    StripRules::new(
        &[],
        &[
            (r"<w:p(?:\s[^>]*)?/?>", "\n"),
            (r"<w:br\b[^>]*>", "\n"),
            (r"<w:tab\b[^>]*>", " "),
        ],
        &[ANY_TAG],
        "",
        true,
    )
});

/// `content.xml` inside ODT.
pub static ODT_RULES: LazyLock<StripRules> = LazyLock::new(|| {
    StripRules::new(
        &[],
        &[
            (r"<text:(?:p|h)\b[^>]*>", "\n"),
            (r"<text:line-break\b[^>]*>", "\n"),
            (r"<text:(?:s|tab)\b[^>]*>", " "),
        ],
        &[ANY_TAG],
        "",
        true,
    )
});

/// FictionBook XML. Embedded `<binary>` images are base64 and the
/// `<description>` block is metadata, neither is prose.
pub static FB2_RULES: LazyLock<StripRules> = LazyLock::new(|| {
    StripRules::new(
        &[
            r"(?is)<binary\b[^>]*>.*?</binary\s*>",
            r"(?is)<description\b[^>]*>.*?</description\s*>",
        ],
        &[
            (r"(?i)<empty-line\s*/>", "\n\n"),
            (r"(?i)<(?:p|title|subtitle|v)\b[^>]*>", "\n"),
        ],
        &[ANY_TAG],
        "",
        true,
    )
});

/// Rich Text Format control words, hex escapes and group braces.
pub static RTF_RULES: LazyLock<StripRules> = LazyLock::new(|| {
    StripRules::new(
        &[r"\{\\(?:fonttbl|colortbl|stylesheet|info|\*)(?:[^{}]|\{[^{}]*\})*\}"],
        &[(r"\\(?:par|line)\b ?", "\n")],
        &[r"\\'[0-9a-fA-F]{2}", r"\\[a-zA-Z]+-?\d* ?", r"[{}]"],
        "",
        false,
    )
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(amp|lt|gt|quot|#39|apos|nbsp);").expect("valid entity pattern")
});

/// Strip markup from `raw` according to `rules`.
pub fn strip(raw: &str, rules: &StripRules) -> String {
    let mut text = raw.to_string();

    loop {
        let mut changed = false;
        for pattern in &rules.drop {
            let stripped = match pattern.replace_all(&text, "") {
                Cow::Borrowed(_) => None,
                Cow::Owned(stripped) => Some(stripped),
            };
            if let Some(stripped) = stripped {
                text = stripped;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    for (pattern, replacement) in &rules.breaks {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    for pattern in &rules.remove {
        text = pattern.replace_all(&text, rules.remove_with).into_owned();
    }
    if rules.decode_entities {
        text = decode_entities(&text);
    }

    crate::util::collapse_whitespace(&text)
}

/// Decode the small fixed entity table. Each entity is replaced once, so
/// `&amp;lt;` becomes `&lt;` rather than `<`.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            "#39" | "apos" => "'",
            _ => " ",
        })
        .into_owned()
}
