//! Configuration types for a single post-to-PDF run.
//!
//! Every knob lives in [`ConversionConfig`], built through
//! [`ConversionConfigBuilder`]. The two pieces of behaviour that tests and
//! embedders most often want to swap, the PDF engine and the default output
//! location, are injected here as trait objects.

use crate::destination::OutputPathPolicy;
use crate::error::Substack2PdfError;
use crate::pipeline::render::PdfEngine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Header value sent with the page request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Configuration for one fetch → extract → render run.
///
/// # Example
/// ```rust
/// use substack2pdf::{ConversionConfig, FontSize, SourceFormat};
///
/// let config = ConversionConfig::builder()
///     .source(SourceFormat::Medium)
///     .font_size(FontSize::Small)
///     .strip_images(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.source.selectors().content, "article");
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Which site's selector pair to extract with. Default: Substack.
    pub source: SourceFormat,

    /// Body/heading size tier of the generated stylesheet. Default: Big.
    pub font_size: FontSize,

    /// Drop every `<img>` from the extracted content. Default: false.
    pub strip_images: bool,

    /// `User-Agent` header for the page request. Default: `Mozilla/5.0`.
    pub user_agent: String,

    /// Options forwarded to the rendering engine.
    pub render: RenderOptions,

    /// Explicit path to the wkhtmltopdf binary. If None, falls back to
    /// `WKHTMLTOPDF_PATH` and then the platform default.
    pub wkhtmltopdf_path: Option<PathBuf>,

    /// Pre-constructed engine. Takes precedence over `wkhtmltopdf_path`.
    pub engine: Option<Arc<dyn PdfEngine>>,

    /// Where a PDF goes when no output path is given.
    /// If None, uses [`crate::destination::DesktopOutput`].
    pub output_policy: Option<Arc<dyn OutputPathPolicy>>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            source: SourceFormat::default(),
            font_size: FontSize::default(),
            strip_images: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            render: RenderOptions::default(),
            wkhtmltopdf_path: None,
            engine: None,
            output_policy: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("source", &self.source)
            .field("font_size", &self.font_size)
            .field("strip_images", &self.strip_images)
            .field("user_agent", &self.user_agent)
            .field("render", &self.render)
            .field("wkhtmltopdf_path", &self.wkhtmltopdf_path)
            .field("engine", &self.engine.as_ref().map(|_| "<dyn PdfEngine>"))
            .field(
                "output_policy",
                &self.output_policy.as_ref().map(|_| "<dyn OutputPathPolicy>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn source(mut self, source: SourceFormat) -> Self {
        self.config.source = source;
        self
    }

    pub fn font_size(mut self, size: FontSize) -> Self {
        self.config.font_size = size;
        self
    }

    pub fn strip_images(mut self, v: bool) -> Self {
        self.config.strip_images = v;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn render_delay_ms(mut self, ms: u64) -> Self {
        self.config.render.delay_ms = ms;
        self
    }

    pub fn render_options(mut self, options: RenderOptions) -> Self {
        self.config.render = options;
        self
    }

    pub fn wkhtmltopdf_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.wkhtmltopdf_path = Some(path.into());
        self
    }

    pub fn engine(mut self, engine: Arc<dyn PdfEngine>) -> Self {
        self.config.engine = Some(engine);
        self
    }

    pub fn output_policy(mut self, policy: Arc<dyn OutputPathPolicy>) -> Self {
        self.config.output_policy = Some(policy);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Substack2PdfError> {
        let c = &self.config;
        if c.user_agent.trim().is_empty() {
            return Err(Substack2PdfError::InvalidConfig(
                "User-Agent must not be empty".into(),
            ));
        }
        if c.render.delay_ms > MAX_RENDER_DELAY_MS {
            return Err(Substack2PdfError::InvalidConfig(format!(
                "Render delay must be ≤ {MAX_RENDER_DELAY_MS}ms, got {}",
                c.render.delay_ms
            )));
        }
        Ok(self.config)
    }
}

/// Longest engine delay `build()` accepts.
pub const MAX_RENDER_DELAY_MS: u64 = 60_000;

// ── Enums ────────────────────────────────────────────────────────────────

/// The site a post comes from, which decides where its content lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Substack: the article sits in an element with class `body`. (default)
    #[default]
    Substack,
    /// Medium: the article sits in the first `<article>`.
    Medium,
}

/// The CSS selector pair used to pull a post out of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSelectors {
    pub title: &'static str,
    pub content: &'static str,
}

/// One row per source. Adding a site means adding a row and a variant.
const SELECTOR_TABLE: &[(SourceFormat, SourceSelectors)] = &[
    (
        SourceFormat::Substack,
        SourceSelectors {
            title: "h1",
            content: ".body",
        },
    ),
    (
        SourceFormat::Medium,
        SourceSelectors {
            title: "h1",
            content: "article",
        },
    ),
];

impl SourceFormat {
    /// Look up this source's selector pair.
    pub fn selectors(self) -> SourceSelectors {
        SELECTOR_TABLE
            .iter()
            .find(|(source, _)| *source == self)
            .map(|(_, selectors)| *selectors)
            .unwrap_or(SELECTOR_TABLE[0].1)
    }
}

/// Two font tiers for the generated stylesheet.
///
/// | Tier  | body | h1   |
/// |-------|------|------|
/// | Small | 18px | 24px |
/// | Big   | 26px | 34px |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    /// (default)
    #[default]
    Big,
}

impl FontSize {
    /// Body text size in pixels.
    pub fn body_px(self) -> u32 {
        match self {
            FontSize::Small => 18,
            FontSize::Big => 26,
        }
    }

    /// Title heading size in pixels.
    pub fn heading_px(self) -> u32 {
        match self {
            FontSize::Small => 24,
            FontSize::Big => 34,
        }
    }
}

/// Options passed to the PDF engine on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Paper size. Default: `A4`.
    pub page_size: String,
    /// Input encoding. Default: `UTF-8`.
    pub encoding: String,
    /// Silence the engine's own progress output. Default: true.
    pub quiet: bool,
    /// Wait before capturing the page so lazy images can land. Default: 3000.
    pub delay_ms: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: "A4".to_string(),
            encoding: "UTF-8".to_string(),
            quiet: true,
            delay_ms: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.source, SourceFormat::Substack);
        assert_eq!(c.font_size, FontSize::Big);
        assert!(!c.strip_images);
        assert_eq!(c.user_agent, "Mozilla/5.0");
        assert_eq!(c.render.page_size, "A4");
        assert_eq!(c.render.encoding, "UTF-8");
        assert!(c.render.quiet);
        assert_eq!(c.render.delay_ms, 3000);
    }

    #[test]
    fn selector_table_covers_every_source() {
        assert_eq!(
            SourceFormat::Substack.selectors(),
            SourceSelectors {
                title: "h1",
                content: ".body"
            }
        );
        assert_eq!(SourceFormat::Medium.selectors().content, "article");
        assert_eq!(SourceFormat::Medium.selectors().title, "h1");
    }

    #[test]
    fn font_tiers_keep_heading_larger() {
        for size in [FontSize::Small, FontSize::Big] {
            assert!(size.heading_px() > size.body_px());
        }
        assert_ne!(FontSize::Small.body_px(), FontSize::Big.body_px());
    }

    #[test]
    fn builder_rejects_empty_user_agent() {
        let err = ConversionConfig::builder().user_agent("  ").build().unwrap_err();
        assert!(err.to_string().contains("User-Agent"));
    }

    #[test]
    fn builder_rejects_huge_delay() {
        let err = ConversionConfig::builder()
            .render_delay_ms(120_000)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("120000"));
    }

    #[test]
    fn debug_hides_trait_objects() {
        let c = ConversionConfig::default();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("ConversionConfig"));
        assert!(dbg.contains("engine: None"));
    }
}
