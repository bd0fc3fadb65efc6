use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const SLUG_MAX_CHARS: usize = 50;

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[\s_-]+").unwrap();
}

/// Lowercase, accent-free, hyphen-separated identifier for a title.
///
/// The result is a fixed point: slugifying a slug returns it unchanged.
pub fn slugify(title: &str) -> String {
    let folded: String = title
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    let cleaned = DISALLOWED.replace_all(&folded, "");
    let hyphenated = SEPARATORS.replace_all(&cleaned, "-");

    let truncated: String = hyphenated
        .trim_matches('-')
        .chars()
        .take(SLUG_MAX_CHARS)
        .collect();
    // A cut can land right after a separator.
    truncated.trim_end_matches('-').to_string()
}
