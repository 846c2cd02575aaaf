//! Extraction: locate the title and the content container in a fetched page.
//!
//! Both lookups are plain CSS selectors taken from the source's row in the
//! selector table ([`crate::config::SourceFormat::selectors`]). Only the
//! first match of each counts. The container is serialised back to HTML and
//! handed to [`super::cleanup`].

use crate::config::SourceFormat;
use crate::error::Substack2PdfError;
use crate::output::{Post, UNTITLED};
use crate::pipeline::cleanup;
use html5ever::driver::{self, ParseOpts};
use html5ever::tree_builder::TreeBuilderOpts;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tendril::TendrilSink;
use tracing::{debug, warn};

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Pull a [`Post`] out of a page.
///
/// A missing container is not an error at this level: the post comes back
/// with `content_markup: None` and its title intact, and the caller decides
/// how to report it.
pub fn extract_post(
    html: &str,
    source: SourceFormat,
    strip_images: bool,
) -> Result<Post, Substack2PdfError> {
    let selectors = source.selectors();
    let title_sel = parse_selector(selectors.title)?;
    let content_sel = parse_selector(selectors.content)?;

    let document = parse_without_scripting(html);

    let title = document
        .select(&title_sel)
        .next()
        .map(|el| normalise_text(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());
    debug!("Title: {:?}", title);

    let content_markup = match document.select(&content_sel).next() {
        Some(container) => {
            let raw = container.html();
            debug!(
                "Matched '{}' ({} bytes of markup)",
                selectors.content,
                raw.len()
            );
            Some(cleanup::clean_content(&raw, strip_images)?)
        }
        None => {
            warn!("No element matched content selector '{}'", selectors.content);
            None
        }
    };

    Ok(Post {
        title,
        content_markup,
    })
}

/// Parse as a browser with JavaScript off would.
///
/// With scripting on, `<noscript>` children are kept as raw text and come
/// back escaped (`&lt;img ...&gt;`) when the container is serialised.
fn parse_without_scripting(html: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };
    driver::parse_document(Html::new_document(), opts).one(html)
}

fn parse_selector(css: &'static str) -> Result<Selector, Substack2PdfError> {
    Selector::parse(css)
        .map_err(|e| Substack2PdfError::Internal(format!("bad selector '{css}': {e}")))
}

/// Collapse runs of whitespace and trim, the way a reader sees the heading.
fn normalise_text(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBSTACK_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>ignored</title></head>
<body>
  <nav><h2>Subscribe</h2></nav>
  <h1 class="post-title">How We Ship</h1>
  <div class="available-content">
    <div class="body markup">
      <p>First paragraph.</p>
      <blockquote>Quoted line.</blockquote>
      <img src="https://cdn.example.com/a.png">
      <p>Second paragraph.</p>
    </div>
  </div>
</body></html>"#;

    #[test]
    fn substack_title_and_body() {
        let post = extract_post(SUBSTACK_PAGE, SourceFormat::Substack, false).unwrap();
        assert_eq!(post.title, "How We Ship");
        let content = post.content_markup.unwrap();
        assert!(content.contains("<p>First paragraph.</p>"));
        assert!(content.contains("<blockquote>Quoted line.</blockquote>"));
        assert!(content.contains("<p>Second paragraph.</p>"));
        assert!(content.contains("https://cdn.example.com/a.png"));
        assert!(!content.contains("Subscribe"));
    }

    #[test]
    fn missing_title_is_untitled() {
        let html = r#"<html><body><div class="body"><p>x</p></div></body></html>"#;
        let post = extract_post(html, SourceFormat::Substack, false).unwrap();
        assert_eq!(post.title, "Untitled");
        assert!(post.has_content());
    }

    #[test]
    fn blank_title_is_untitled() {
        let html = r#"<html><body><h1>   </h1><div class="body"><p>x</p></div></body></html>"#;
        let post = extract_post(html, SourceFormat::Substack, false).unwrap();
        assert_eq!(post.title, "Untitled");
    }

    #[test]
    fn nested_title_markup_is_flattened() {
        let html = r#"<html><body><h1>
            Hello <em>brave</em>
            new world</h1><div class="body"></div></body></html>"#;
        let post = extract_post(html, SourceFormat::Substack, false).unwrap();
        assert_eq!(post.title, "Hello brave new world");
    }

    #[test]
    fn missing_container_keeps_title() {
        let html = r#"<html><body><h1>Only a title</h1><main><p>x</p></main></body></html>"#;
        let post = extract_post(html, SourceFormat::Substack, false).unwrap();
        assert_eq!(post.title, "Only a title");
        assert!(post.content_markup.is_none());
    }

    #[test]
    fn medium_uses_article() {
        let html = r#"<html><body>
            <div class="body"><p>wrong container</p></div>
            <article><h1>Medium Post</h1><p>Right container.</p></article>
            <article><p>Second article.</p></article>
        </body></html>"#;
        let post = extract_post(html, SourceFormat::Medium, false).unwrap();
        assert_eq!(post.title, "Medium Post");
        let content = post.content_markup.unwrap();
        assert!(content.starts_with("<article>"));
        assert!(content.contains("Right container."));
        assert!(!content.contains("wrong container"));
        assert!(!content.contains("Second article."));
    }

    #[test]
    fn substack_page_in_medium_mode_has_no_content() {
        let post = extract_post(SUBSTACK_PAGE, SourceFormat::Medium, false).unwrap();
        assert_eq!(post.title, "How We Ship");
        assert!(post.content_markup.is_none());
    }

    const NOSCRIPT_PAGE: &str = r#"<html><body><h1>T</h1>
        <div class="body"><p>Before</p><noscript><img src="n.png"></noscript><p>After</p></div>
    </body></html>"#;

    #[test]
    fn noscript_image_stays_markup() {
        let content = extract_post(NOSCRIPT_PAGE, SourceFormat::Substack, false)
            .unwrap()
            .content_markup
            .unwrap();
        assert!(content.contains(r#"<img src="n.png">"#), "got: {content}");
        assert!(!content.contains("&lt;"), "got: {content}");
        assert!(!content.contains("noscript"), "got: {content}");
        assert!(content.contains("<p>Before</p>") && content.contains("<p>After</p>"));
    }

    #[test]
    fn noscript_image_stripped_with_the_rest() {
        let content = extract_post(NOSCRIPT_PAGE, SourceFormat::Substack, true)
            .unwrap()
            .content_markup
            .unwrap();
        assert!(!content.contains("img"), "got: {content}");
        assert!(!content.contains("&lt;"), "got: {content}");
        assert!(content.contains("<p>Before</p>") && content.contains("<p>After</p>"));
    }

    #[test]
    fn strip_images_reaches_cleanup() {
        let post = extract_post(SUBSTACK_PAGE, SourceFormat::Substack, true).unwrap();
        assert!(!post.content_markup.unwrap().contains("<img"));
    }
}
