//! Text helpers: slugs, word counts, reading time and plain-text summaries

use lazy_static::lazy_static;
use regex::Regex;

/// Reading speed for blog posts (words per minute)
pub const POST_WORDS_PER_MINUTE: usize = 200;

/// Reading speed for standalone documents (words per minute)
pub const DOCUMENT_WORDS_PER_MINUTE: usize = 100;

/// Maximum length of a generated description before truncation
const SUMMARY_MAX_CHARS: usize = 150;

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9_\s-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref FIRST_HEADING: Regex = Regex::new(r"(?m)^#\s+(.+)$").unwrap();
    static ref ANY_HEADING: Regex = Regex::new(r"(?m)^#+\s+.+$").unwrap();
    static ref BLANK_LINE: Regex = Regex::new(r"(?m)^\s*$\n?").unwrap();
    static ref FENCED_CODE: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`[^`]+`").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap();
    static ref EMPHASIS: Regex = Regex::new(r"[*_]{1,2}([^*_]+)[*_]{1,2}").unwrap();
}

/// Derive a URL-safe slug from a title.
///
/// Lowercases, drops everything that is not an ASCII letter, digit,
/// underscore, whitespace or hyphen, turns whitespace runs into `-` and trims
/// hyphens at both ends.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lower, "");
    let hyphenated = WHITESPACE.replace_all(cleaned.trim(), "-");
    hyphenated.trim_matches('-').to_string()
}

/// Naive word count: the number of pieces produced by splitting on
/// whitespace runs. Leading or trailing whitespace counts as an empty piece,
/// and the empty string counts as one.
pub fn word_count(text: &str) -> usize {
    WHITESPACE.split(text).count()
}

/// Minutes needed to read `words` at `words_per_minute`, rounded up
pub fn reading_time(words: usize, words_per_minute: usize) -> usize {
    words.div_ceil(words_per_minute.max(1))
}

/// Human readable reading time, e.g. "3 min read"
pub fn reading_time_label(minutes: usize) -> String {
    format!("{} min read", minutes)
}

/// Text of the first level-one markdown heading, if any
pub fn first_heading(markdown: &str) -> Option<String> {
    FIRST_HEADING
        .captures(markdown)
        .map(|caps| caps[1].trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Build a short plain-text description from a markdown body.
///
/// Headings, blank lines, code and markup are removed; the first remaining
/// line is used, cut at 150 characters with a trailing ellipsis.
pub fn summarize(markdown: &str) -> String {
    let text = ANY_HEADING.replace_all(markdown, "");
    let text = BLANK_LINE.replace_all(&text, "");
    let text = FENCED_CODE.replace_all(&text, "");
    let text = INLINE_CODE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = EMPHASIS.replace_all(&text, "$1");

    let first_line = text.trim().lines().next().unwrap_or("").to_string();
    if first_line.chars().count() > SUMMARY_MAX_CHARS {
        let cut: String = first_line.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        first_line
    }
}
