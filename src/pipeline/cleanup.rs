//! Cleanup: rewrite the extracted container before it is templated.
//!
//! `<noscript>` wrappers are unwrapped first, in a rewrite of their own: the
//! rewriter lexes their content as raw text, so the images inside would
//! otherwise escape the passes below. The remaining passes run as handlers of
//! one streaming [`lol_html`] rewrite:
//!
//! 1. Drop every `<img>` when image stripping is on.
//! 2. Remove every inline `style` attribute, so the page author's styling
//!    cannot override the injected stylesheet.
//! 3. Give lazy-loaded images a real `src`, taken from `data-src`, then the
//!    first URL of `data-srcset`, then `data-original`.
//!
//! The passes touch disjoint things (whole `img` elements, `style`
//! attributes, `src` attributes), so their relative order never changes the
//! output.

use crate::error::Substack2PdfError;
use lol_html::{element, rewrite_str, RewriteStrSettings};

/// Lazy-loading attributes, in the order they are tried.
const LAZY_SRC_ATTRS: [&str; 3] = ["data-src", "data-srcset", "data-original"];

/// Apply all cleanup passes to a fragment of HTML.
pub fn clean_content(markup: &str, strip_images: bool) -> Result<String, Substack2PdfError> {
    let markup = unwrap_noscript(markup)?;
    let mut handlers = Vec::with_capacity(2);

    if strip_images {
        handlers.push(element!("img", |el| {
            el.remove();
            Ok(())
        }));
    }

    handlers.push(element!("[style]", |el| {
        el.remove_attribute("style");
        Ok(())
    }));

    if !strip_images {
        handlers.push(element!("img", |el| {
            let has_usable_src = el
                .get_attribute("src")
                .is_some_and(|src| is_usable_src(&src));
            if has_usable_src {
                return Ok(());
            }
            let [data_src, data_srcset, data_original] =
                LAZY_SRC_ATTRS.map(|name| el.get_attribute(name));
            if let Some(src) = pick_lazy_src(
                data_src.as_deref(),
                data_srcset.as_deref(),
                data_original.as_deref(),
            ) {
                el.set_attribute("src", &src)?;
            }
            Ok(())
        }));
    }

    rewrite_str(
        &markup,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| Substack2PdfError::Cleanup(e.to_string()))
}

/// Replace every `<noscript>` element with its content.
fn unwrap_noscript(markup: &str) -> Result<String, Substack2PdfError> {
    rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers: vec![element!("noscript", |el| {
                el.remove_and_keep_content();
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| Substack2PdfError::Cleanup(e.to_string()))
}

/// A `src` counts when it is non-blank and not an inline placeholder.
fn is_usable_src(src: &str) -> bool {
    let src = src.trim();
    !src.is_empty() && !src.starts_with("data:")
}

/// First non-blank candidate wins.
fn pick_lazy_src(
    data_src: Option<&str>,
    data_srcset: Option<&str>,
    data_original: Option<&str>,
) -> Option<String> {
    fn non_blank(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|v| !v.is_empty())
    }

    non_blank(data_src)
        .or_else(|| data_srcset.and_then(first_srcset_url))
        .or_else(|| non_blank(data_original))
        .map(str::to_string)
}

/// The URL of the first candidate in a `srcset` value.
///
/// Parsed like a browser: skip leading whitespace and commas, the URL runs to
/// the next whitespace, trailing commas are trimmed. CDN URLs with commas in
/// their path (`w_424,c_limit,f_webp`) therefore stay whole.
pub fn first_srcset_url(srcset: &str) -> Option<&str> {
    let rest = srcset.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let url = rest[..end].trim_end_matches(',');
    (!url.is_empty()).then_some(url)
}
