//! # substack2pdf
//!
//! Save a single Substack or Medium post as a clean, readable PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL
//!  │
//!  ├─ 1. Fetch     one GET with a browser-like User-Agent
//!  ├─ 2. Extract   title (first h1) + content container (per-source selector)
//!  ├─ 3. Cleanup   drop images (optional), strip inline styles, fix lazy images
//!  ├─ 4. Template  minimal HTML document with a two-tier font stylesheet
//!  └─ 5. Render    wkhtmltopdf → temp file → rename onto the output path
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use substack2pdf::{convert_to_file, ConversionConfig, FontSize};
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .font_size(FontSize::Small)
//!         .build()?;
//!     let report = convert_to_file(
//!         "https://example.substack.com/p/some-post",
//!         Some(Path::new("post.pdf")),
//!         &config,
//!     )
//!     .await?;
//!     println!("saved {}", report.output.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `substack2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Rendering engine
//!
//! PDFs are produced by [wkhtmltopdf](https://wkhtmltopdf.org/), which must be
//! installed separately. The binary is looked up at a fixed platform path
//! (`/usr/local/bin/wkhtmltopdf` on Unix-likes) unless `WKHTMLTOPDF_PATH` or
//! [`ConversionConfig::wkhtmltopdf_path`] says otherwise.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod destination;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, FontSize, RenderOptions, SourceFormat,
    SourceSelectors, MAX_RENDER_DELAY_MS,
};
pub use convert::{
    convert_sync, convert_to_file, fetch_post, prepare_document, render_to_file,
    resolve_output_path,
};
pub use destination::{DesktopOutput, DirectoryOutput, OutputPathPolicy};
pub use error::{ErrorKind, Substack2PdfError};
pub use output::{ConversionReport, Post};
pub use pipeline::render::{PdfEngine, WkHtmlToPdf};
pub use pipeline::template::RenderDocument;
