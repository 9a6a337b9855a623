//! Text normalization for downloaded documentation.
//!
//! Raw Markdown/MDX is reduced to a single line of plain prose before it is
//! written to the corpus.
//!
//! # Algorithm
//!
//! The steps are order-sensitive; each one narrows what the next one sees.
//!
//! 1. Remove HTML-like tags (`<...>`).
//! 2. Remove `http…` and `www.…` tokens up to the next whitespace.
//! 3. Remove everything from the literal `Copyright` to the end of its line.
//! 4. Replace newlines with a single space.
//! 5. Convert emoji glyphs to `:shortcode:` form, then strip every
//!    `:shortcode:` (including ones already present in the source text).
//!
//! [`collapse_whitespace`] is the final pass that callers apply before
//! storing text; [`clean_document`] runs both.
//!
//! # Example
//!
//! ```rust
//! use docs_corpus_core::normalize::clean_document;
//!
//! let raw = "Hello <b>World</b>\nhttp://x.com Copyright 2024 😀";
//! assert_eq!(clean_document(raw), "Hello World");
//! ```

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

struct Patterns {
    html_tag: Regex,
    url: Regex,
    copyright: Regex,
    shortcode: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        html_tag: Regex::new(r"<[^>]*>").expect("static pattern"),
        url: Regex::new(r"http\S+|www.\S+").expect("static pattern"),
        // `.` does not cross newlines, so this stops at the end of the line.
        copyright: Regex::new(r"Copyright.*").expect("static pattern"),
        shortcode: Regex::new(r":[a-z_&+-]+:").expect("static pattern"),
        whitespace: Regex::new(r"\s+").expect("static pattern"),
    })
}

/// Apply normalization steps 1–5 to raw document text.
///
/// Never fails; the result may be empty. Whitespace is left as produced by
/// the individual steps, see [`collapse_whitespace`].
pub fn normalize(raw: &str) -> String {
    let p = patterns();
    let text = p.html_tag.replace_all(raw, "");
    let text = p.url.replace_all(&text, "");
    let text = p.copyright.replace_all(&text, "");
    let text = text.replace('\n', " ");
    let text = demojize(&text);
    p.shortcode.replace_all(&text, "").into_owned()
}

/// Collapse runs of whitespace into single spaces and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    patterns()
        .whitespace
        .replace_all(text, " ")
        .trim()
        .to_string()
}

/// Full cleaning pass applied to every downloaded document.
pub fn clean_document(raw: &str) -> String {
    collapse_whitespace(&normalize(raw))
}

/// Replace each emoji grapheme with `:name:`, where `name` is the emoji's
/// CLDR name in lowercase with every character outside `[a-z&+-]` turned
/// into `_`, so the result always matches the shortcode strip pattern.
pub fn demojize(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for grapheme in text.graphemes(true) {
        if grapheme.is_ascii() {
            out.push_str(grapheme);
            continue;
        }
        match emoji_name(grapheme) {
            Some(name) => {
                out.push(':');
                out.push_str(&shortcode_name(name));
                out.push(':');
            }
            None => out.push_str(grapheme),
        }
    }
    Cow::Owned(out)
}

fn emoji_name(grapheme: &str) -> Option<&'static str> {
    if let Some(emoji) = emojis::get(grapheme) {
        return Some(emoji.name());
    }

    // Retry without variation selectors and skin-tone modifiers.
    let base: String = grapheme
        .chars()
        .filter(|c| !matches!(c, '\u{FE0E}' | '\u{FE0F}' | '\u{1F3FB}'..='\u{1F3FF}'))
        .collect();
    if base.is_empty() {
        // A modifier on its own has no table entry.
        return grapheme.chars().find_map(skin_tone_name);
    }
    if base == grapheme {
        return None;
    }
    emojis::get(&base).map(|emoji| emoji.name())
}

fn skin_tone_name(c: char) -> Option<&'static str> {
    match c {
        '\u{1F3FB}' => Some("light skin tone"),
        '\u{1F3FC}' => Some("medium-light skin tone"),
        '\u{1F3FD}' => Some("medium skin tone"),
        '\u{1F3FE}' => Some("medium-dark skin tone"),
        '\u{1F3FF}' => Some("dark skin tone"),
        _ => None,
    }
}

fn shortcode_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '&' | '+' | '-' => c,
            _ => '_',
        })
        .collect()
}
