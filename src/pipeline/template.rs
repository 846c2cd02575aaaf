//! Template: wrap an extracted post in a standalone, styled HTML document.

use crate::config::FontSize;
use crate::output::Post;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img[\s/>]").unwrap());

/// The HTML string handed to the PDF engine.
///
/// Only built from a [`Post`] that has content, so holding one means there
/// is something worth rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDocument {
    html: String,
}

impl RenderDocument {
    /// Assemble the document, or `None` when the post has no content.
    pub fn from_post(post: &Post, font_size: FontSize) -> Option<Self> {
        let content = post.content_markup.as_deref()?;
        let html = format!(
            "<html><head><meta charset='utf-8'><style>{}</style></head>\
<body><h1>{}</h1>\n{}</body></html>",
            stylesheet(font_size),
            escape_text(&post.title),
            content
        );
        Some(Self { html })
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    /// Number of `<img>` tags in the document.
    pub fn image_count(&self) -> usize {
        RE_IMG_TAG.find_iter(&self.html).count()
    }
}

/// The injected stylesheet for a font tier.
pub fn stylesheet(font_size: FontSize) -> String {
    format!(
        "body {{ font-size: {body}px; line-height: 2.0; margin: 20px; }} \
h1 {{ font-size: {heading}px; margin-bottom: 20px; }} \
p {{ margin-bottom: 15px; }} \
img {{ max-width: 100%; height: auto; }}",
        body = font_size.body_px(),
        heading = font_size.heading_px(),
    )
}

/// Escape text for use between tags.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
