use async_trait::async_trait;
use chrono::Utc;
use pf_core::{Block, DocumentFormatter, FormatRequest, FormattedDocument, OriginalSource, Result, Slug};
use url::Url;

use crate::keys::KeyGenerator;
use crate::segment::split_paragraphs;
use crate::slug::slugify;
use crate::truncate_excerpt;

/// Builds Portable Text locally, with no oracle involved.
#[derive(Debug, Clone, Default)]
pub struct DeterministicFormatter;

impl DeterministicFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, request: &FormatRequest) -> FormattedDocument {
        let mut keys = KeyGenerator::default();
        let content = split_paragraphs(&request.body)
            .into_iter()
            .map(|text| {
                let key = keys.next_key();
                let span_key = keys.next_key();
                Block::paragraph(key, span_key, text)
            })
            .collect();

        FormattedDocument {
            doc_type: "post".to_string(),
            title: request.title.clone(),
            slug: Slug::new(slugify(&request.title)),
            published_at: Utc::now(),
            excerpt: truncate_excerpt(request.summary.as_deref().unwrap_or_default()),
            content,
            original_source: original_source(request),
        }
    }
}

fn original_source(request: &FormatRequest) -> OriginalSource {
    let url = request.link.clone().unwrap_or_default();
    let site = match request.source.as_deref().map(str::trim) {
        Some(source) if !source.is_empty() => source.to_string(),
        _ => Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default(),
    };
    OriginalSource {
        url,
        title: request
            .original_title
            .clone()
            .unwrap_or_else(|| request.title.clone()),
        site,
    }
}

#[async_trait]
impl DocumentFormatter for DeterministicFormatter {
    fn name(&self) -> &str {
        "deterministic"
    }

    async fn format(&self, request: &FormatRequest) -> Result<FormattedDocument> {
        Ok(self.build(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::{Article, Content};
    use serde_json::json;
    use std::collections::HashSet;

    fn hello_world() -> FormatRequest {
        let article = Article::from_value(json!({
            "title": "Hello World",
            "summary": "A short greeting.",
            "excerpt": "A short greeting.",
            "content": "<p>Hello there.</p><p>Welcome.</p>",
            "link": "https://www.example.com/hello",
        }))
        .unwrap();
        FormatRequest::from_article(&article)
    }

    #[tokio::test]
    async fn test_hello_world() {
        let document = DeterministicFormatter::new().format(&hello_world()).await.unwrap();

        assert_eq!(document.doc_type, "post");
        assert_eq!(document.title, "Hello World");
        assert_eq!(document.slug.current, "hello-world");
        assert_eq!(document.slug.slug_type, "slug");
        assert_eq!(document.excerpt, "A short greeting.");
        let texts: Vec<String> = document.content.iter().map(Block::text).collect();
        assert_eq!(texts, vec!["Hello there.", "Welcome."]);
        assert!(document.content.iter().all(|b| b.style == "normal" && b.mark_defs.is_empty()));
        assert_eq!(document.original_source.url, "https://www.example.com/hello");
        assert_eq!(document.original_source.title, "Hello World");
        assert_eq!(document.original_source.site, "www.example.com");
    }

    #[test]
    fn test_keys_unique_within_document() {
        let mut request = hello_world();
        request.body = Content::Text((0..40).map(|i| format!("Paragraph {}.", i)).collect::<Vec<_>>().join("\n\n"));
        let document = DeterministicFormatter::new().build(&request);

        assert_eq!(document.content.len(), 40);
        let mut seen = HashSet::new();
        for block in &document.content {
            assert!(seen.insert(block.key.clone()));
            for span in &block.children {
                assert!(seen.insert(span.key.clone()));
            }
        }
    }

    #[test]
    fn test_long_summary_is_cut() {
        let mut request = hello_world();
        let summary = "word ".repeat(100);
        request.summary = Some(summary.clone());
        let document = DeterministicFormatter::new().build(&request);
        assert_eq!(document.excerpt.chars().count(), 299);
        assert!(summary.starts_with(&document.excerpt));
    }

    #[test]
    fn test_source_and_original_title() {
        let mut request = hello_world().with_original_title("Hello World (original)");
        request.title = "Olá Mundo".to_string();
        request.source = Some("Example News".to_string());
        let document = DeterministicFormatter::new().build(&request);

        assert_eq!(document.slug.current, "ola-mundo");
        assert_eq!(document.original_source.site, "Example News");
        assert_eq!(document.original_source.title, "Hello World (original)");
    }

    #[test]
    fn test_missing_link_and_summary() {
        let request = FormatRequest {
            title: "Bare".to_string(),
            body: Content::from("Only body."),
            summary: None,
            source: None,
            link: None,
            original_title: None,
        };
        let document = DeterministicFormatter::new().build(&request);
        assert_eq!(document.excerpt, "");
        assert_eq!(document.original_source.url, "");
        assert_eq!(document.original_source.site, "");
        assert_eq!(document.content.len(), 1);
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(DeterministicFormatter::new().build(&hello_world())).unwrap();
        assert_eq!(value["_type"], "post");
        assert_eq!(value["slug"]["_type"], "slug");
        assert_eq!(value["content"][0]["_type"], "block");
        assert_eq!(value["content"][0]["children"][0]["_type"], "span");
        assert_eq!(value["content"][0]["children"][0]["marks"], json!([]));
        assert!(value["originalSource"].is_object());
    }
}
