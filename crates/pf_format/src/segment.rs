use lazy_static::lazy_static;
use pf_core::Content;
use regex::Regex;
use scraper::Html;

lazy_static! {
    /// `<p>`, `<p class=...>`, `</p>` or a blank line.
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"(?i)</?p(?:\s[^>]*)?>|\n\s*\n").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Split a body into plain-text paragraphs, in order, dropping empty ones.
pub fn split_paragraphs(body: &Content) -> Vec<String> {
    match body {
        Content::Text(text) => split_text(text),
        Content::Paragraphs(paragraphs) => paragraphs.iter().flat_map(|p| split_text(p)).collect(),
    }
}

fn split_text(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(strip_markup)
        .filter(|paragraph| !paragraph.is_empty())
        .collect()
}

/// Drop any remaining tags, decode entities and collapse whitespace.
pub fn strip_markup(fragment: &str) -> String {
    let text: String = if fragment.contains('<') || fragment.contains('&') {
        Html::parse_fragment(fragment).root_element().text().collect()
    } else {
        fragment.to_string()
    };
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_tags() {
        let body = Content::from("<p>Hello there.</p><p>Welcome.</p>");
        assert_eq!(split_paragraphs(&body), vec!["Hello there.", "Welcome."]);
    }

    #[test]
    fn test_blank_lines() {
        let body = Content::from("First paragraph.\n\nSecond one\nstill second.\n   \nThird.");
        assert_eq!(
            split_paragraphs(&body),
            vec!["First paragraph.", "Second one still second.", "Third."]
        );
    }

    #[test]
    fn test_inline_markup_and_entities() {
        let body = Content::from(
            "<p><i>Originally in <a href=\"https://example.com\">Inside Climate News</a></i></p>\n<p class=\"lead\">Fish &amp; chips</p>",
        );
        assert_eq!(
            split_paragraphs(&body),
            vec!["Originally in Inside Climate News", "Fish & chips"]
        );
    }

    #[test]
    fn test_markup_only_segments_are_dropped() {
        let body = Content::from("<p><img src=\"x.png\"/></p><p>  </p><p>Kept.</p>");
        assert_eq!(split_paragraphs(&body), vec!["Kept."]);
    }

    #[test]
    fn test_paragraph_list() {
        let body = Content::Paragraphs(vec![
            "One.".to_string(),
            "".to_string(),
            "<p>Two.</p><p>Three.</p>".to_string(),
        ]);
        assert_eq!(split_paragraphs(&body), vec!["One.", "Two.", "Three."]);
    }

    #[test]
    fn test_count_matches_non_empty_paragraphs() {
        let paragraphs = ["Alpha.", "Beta.", "Gamma.", "Delta."];
        let body = Content::Text(paragraphs.join("\n\n"));
        let split = split_paragraphs(&body);
        assert_eq!(split.len(), paragraphs.len());
        assert_eq!(split, paragraphs);
    }
}
