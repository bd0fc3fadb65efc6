//! Prompt templates sent to the oracle.

use pf_core::{Article, FormatRequest, EXCERPT_MAX_CHARS};

use crate::translate::Languages;

/// Translate a single piece of text; the reply is used verbatim.
pub fn translate_text(text: &str, languages: &Languages) -> String {
    format!(
        "Translate the following text from {source} to {target}:\n\n\
         \"{text}\"\n\n\
         Translate naturally, preserving the original meaning and tone. \
         Keep any HTML markup unchanged.\n\
         Reply only with the translated text, without explanations.",
        source = languages.source,
        target = languages.target,
        text = text,
    )
}

/// Translate a whole article in one round trip; the reply must carry a JSON
/// object with the translated fields.
pub fn translate_article(article: &Article, languages: &Languages) -> String {
    let mut prompt = format!(
        "# Translation task\n\n\
         Translate the following article from {source} to {target} naturally and fluently. \
         Keep the original tone and adapt idioms where needed. Keep any HTML markup unchanged.\n\n\
         ## Original title\n{title}\n\n",
        source = languages.source,
        target = languages.target,
        title = article.title,
    );

    if let Some(summary) = &article.summary {
        prompt.push_str(&format!("## Original summary\n{}\n\n", summary));
    }
    if let Some(excerpt) = article.excerpt.as_ref().filter(|e| article.summary.as_ref() != Some(*e)) {
        prompt.push_str(&format!("## Original excerpt\n{}\n\n", excerpt));
    }
    prompt.push_str(&format!("## Original content\n{}\n\n", article.content.to_text()));

    prompt.push_str(
        "Reply only with a JSON object holding the translated fields \"title\", \"summary\", \
         \"excerpt\" and \"content\" (omit fields that were not given), without further explanation.",
    );
    prompt
}

/// Convert an article to a Portable Text post; the rules mirror the
/// deterministic formatter.
pub fn format_document(request: &FormatRequest) -> String {
    format!(
        r#"Convert the following article to the Sanity CMS Portable Text format:

TITLE: {title}

SUMMARY: {summary}

CONTENT: {content}

SOURCE: {source}

LINK: {link}

The output must follow exactly this schema:
```json
{{
  "_type": "post",
  "title": "Article title",
  "slug": {{ "_type": "slug", "current": "article-title" }},
  "publishedAt": "2024-05-18T12:34:56Z",
  "excerpt": "Short summary of the post",
  "content": [
    {{
      "_type": "block",
      "_key": "randomKey1",
      "style": "normal",
      "markDefs": [],
      "children": [
        {{ "_type": "span", "_key": "randomKey2", "text": "Paragraph text", "marks": [] }}
      ]
    }}
  ],
  "originalSource": {{ "url": "https://original-site.com/article", "title": "Original title", "site": "Site name" }}
}}
```

IMPORTANT:
1. Build the slug by removing accents, lowercasing, and replacing spaces with hyphens (at most 50 characters)
2. Put each paragraph in its own block, without HTML tags
3. Generate random, unique keys (_key) for every block and span
4. The excerpt must have at most {max_excerpt} characters
5. publishedAt is the current date in ISO 8601

Reply only with the formatted JSON, without explanations."#,
        title = request.title,
        summary = request.summary.as_deref().unwrap_or_default(),
        content = request.body.to_text(),
        source = request.source.as_deref().unwrap_or_default(),
        link = request.link.as_deref().unwrap_or_default(),
        max_excerpt = EXCERPT_MAX_CHARS,
    )
}

pub fn summarize(text: &str, max_words: usize) -> String {
    format!(
        "Summarize the following text in no more than {max_words} words. \
         Keep the most important information and the original tone:\n\n\
         \"{text}\"\n\n\
         Reply only with the summary, without explanations.",
        max_words = max_words,
        text = text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article() -> Article {
        Article::from_value(json!({
            "title": "Experts alarmed",
            "summary": "Critics call for a moratorium.",
            "excerpt": "Critics call for a moratorium.",
            "content": ["First.", "Second."],
        }))
        .unwrap()
    }

    #[test]
    fn test_article_prompt_embeds_fields_once() {
        let prompt = translate_article(&article(), &Languages::default());
        assert!(prompt.contains("Experts alarmed"));
        assert!(prompt.contains("First.\n\nSecond."));
        assert!(prompt.contains("Brazilian Portuguese"));
        assert_eq!(prompt.matches("Critics call for a moratorium.").count(), 1);
    }

    #[test]
    fn test_text_prompt_keeps_quotes() {
        let prompt = translate_text(r#"He said "hi""#, &Languages::default());
        assert!(prompt.contains(r#""He said "hi"""#));
    }

    #[test]
    fn test_format_prompt_states_rules() {
        let request = FormatRequest::from_article(&article());
        let prompt = format_document(&request);
        assert!(prompt.contains("TITLE: Experts alarmed"));
        assert!(prompt.contains("at most 299 characters"));
        assert!(prompt.contains("\"_type\": \"post\""));
    }
}
