//! Error types for the substack2pdf library.
//!
//! A single fatal-error enum, [`Substack2PdfError`], covers every way a run
//! can stop. Variants are grouped by the stage that raises them and
//! [`Substack2PdfError::kind`] folds them into the four-way [`ErrorKind`]
//! taxonomy the CLI reports on:
//!
//! * **Fetch** — the page could not be downloaded (bad URL, transport error,
//!   non-200 status). Nothing else is known about the post.
//! * **Extraction** — the page arrived but the content container is missing.
//!   The title is still carried so the caller can mention it.
//! * **Render** — the HTML was assembled but the engine could not turn it
//!   into a PDF at the requested path.
//! * **Config** — the run was mis-configured before any stage ran.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the substack2pdf library.
#[derive(Debug, Error)]
pub enum Substack2PdfError {
    // ── Fetch errors ──────────────────────────────────────────────────────
    /// The input string is not an HTTP/HTTPS URL.
    #[error("Invalid URL '{input}': expected an http:// or https:// post URL")]
    InvalidUrl { input: String },

    /// The request could not be sent or the body could not be read.
    #[error("Unable to fetch '{url}': {reason}")]
    RequestFailed { url: String, reason: String },

    /// The server answered with something other than 200 OK.
    #[error("Unable to fetch the page. Status code: {status}")]
    HttpStatus { url: String, status: u16 },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// No element matched the content selector.
    #[error(
        "Unable to locate the article content (no match for '{selector}' in \"{title}\"). \
The page structure may have changed."
    )]
    ContentNotFound {
        title: String,
        selector: &'static str,
    },

    /// The HTML rewriter rejected the extracted markup.
    #[error("Failed to clean up article markup: {0}")]
    Cleanup(String),

    // ── Render errors ─────────────────────────────────────────────────────
    /// The rendering binary could not be found or spawned.
    #[error("wkhtmltopdf is not available: {detail}\nInstall it or point --wkhtmltopdf / WKHTMLTOPDF_PATH at the binary.")]
    RendererNotFound { detail: String },

    /// The engine ran but exited unsuccessfully.
    #[error("wkhtmltopdf failed (exit {exit_code:?}): {stderr}")]
    RenderFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The directory the PDF should land in does not exist.
    #[error("Output directory '{dir}' does not exist")]
    OutputDirMissing { dir: PathBuf },

    /// Could not create, write or persist the output PDF.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// No home directory to derive `~/Desktop` from.
    #[error("Could not determine the home directory; pass --output explicitly")]
    NoHomeDirectory,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`Substack2PdfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Fetch,
    Extraction,
    Render,
    Config,
}

impl Substack2PdfError {
    /// Which stage of the run this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl { .. } | Self::RequestFailed { .. } | Self::HttpStatus { .. } => {
                ErrorKind::Fetch
            }
            Self::ContentNotFound { .. } | Self::Cleanup(_) => ErrorKind::Extraction,
            Self::RendererNotFound { .. }
            | Self::RenderFailed { .. }
            | Self::OutputDirMissing { .. }
            | Self::OutputWriteFailed { .. } => ErrorKind::Render,
            Self::NoHomeDirectory | Self::InvalidConfig(_) | Self::Internal(_) => {
                ErrorKind::Config
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_display() {
        let e = Substack2PdfError::HttpStatus {
            url: "https://example.substack.com/p/x".into(),
            status: 404,
        };
        assert!(e.to_string().contains("Status code: 404"), "got: {e}");
        assert_eq!(e.kind(), ErrorKind::Fetch);
    }

    #[test]
    fn content_not_found_keeps_title() {
        let e = Substack2PdfError::ContentNotFound {
            title: "My Post".into(),
            selector: ".body",
        };
        let msg = e.to_string();
        assert!(msg.contains("My Post"));
        assert!(msg.contains(".body"));
        assert!(msg.contains("structure may have changed"));
        assert_eq!(e.kind(), ErrorKind::Extraction);
    }

    #[test]
    fn render_failed_display() {
        let e = Substack2PdfError::RenderFailed {
            exit_code: Some(1),
            stderr: "Exit with code 1 due to network error".into(),
        };
        assert!(e.to_string().contains("network error"));
        assert_eq!(e.kind(), ErrorKind::Render);
    }

    #[test]
    fn output_dir_missing_is_render_kind() {
        let e = Substack2PdfError::OutputDirMissing {
            dir: PathBuf::from("/home/nobody/Desktop"),
        };
        assert_eq!(e.kind(), ErrorKind::Render);
        assert!(e.to_string().contains("Desktop"));
    }

    #[test]
    fn kind_serialises_lowercase() {
        let json = serde_json::to_string(&ErrorKind::Extraction).unwrap();
        assert_eq!(json, "\"extraction\"");
    }
}
