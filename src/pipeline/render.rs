//! PDF rendering through an external engine.
//!
//! ## Why a trait?
//!
//! The real engine is a separate binary that may not be installed where the
//! library is tested or embedded. [`PdfEngine`] is the seam: the default
//! [`WkHtmlToPdf`] shells out, tests inject a fake that writes bytes.
//!
//! Engines are blocking. [`crate::convert::render_to_file`] moves the call
//! onto tokio's blocking pool.

use crate::config::RenderOptions;
use crate::error::Substack2PdfError;
use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Turns an HTML document into a PDF file.
pub trait PdfEngine: Send + Sync {
    /// Render `html` into a PDF at `output`, overwriting it.
    fn render(
        &self,
        html: &str,
        output: &Path,
        options: &RenderOptions,
    ) -> Result<(), Substack2PdfError>;
}

/// The `wkhtmltopdf` command-line engine.
///
/// The document is fed through stdin (`-`), so nothing is written to disk
/// except the PDF itself.
#[derive(Debug, Clone)]
pub struct WkHtmlToPdf {
    binary: PathBuf,
}

impl WkHtmlToPdf {
    /// Use the binary at exactly this path.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Resolve the binary via [`wkhtmltopdf_locate::locate`].
    pub fn locate(explicit: Option<&Path>) -> Result<Self, Substack2PdfError> {
        let binary = wkhtmltopdf_locate::locate(explicit).map_err(|e| {
            Substack2PdfError::RendererNotFound {
                detail: e.to_string(),
            }
        })?;
        debug!("Using wkhtmltopdf at {}", binary.display());
        Ok(Self::new(binary))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

/// Command-line arguments for one render, input read from stdin.
pub fn build_args(options: &RenderOptions, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--encoding".into(),
        options.encoding.clone().into(),
        "--page-size".into(),
        options.page_size.clone().into(),
    ];
    if options.quiet {
        args.push("--quiet".into());
    }
    if options.delay_ms > 0 {
        args.push("--javascript-delay".into());
        args.push(options.delay_ms.to_string().into());
    }
    args.push("-".into());
    args.push(output.as_os_str().to_owned());
    args
}

impl PdfEngine for WkHtmlToPdf {
    fn render(
        &self,
        html: &str,
        output: &Path,
        options: &RenderOptions,
    ) -> Result<(), Substack2PdfError> {
        let started_at = Instant::now();
        let args = build_args(options, output);

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                warn!(
                    binary = %self.binary.display(),
                    error = %err,
                    "Failed to spawn wkhtmltopdf"
                );
                let detail = if err.kind() == ErrorKind::NotFound {
                    format!("'{}' does not exist", self.binary.display())
                } else {
                    format!("cannot run '{}': {err}", self.binary.display())
                };
                Substack2PdfError::RendererNotFound { detail }
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(html.as_bytes())
                .map_err(|e| Substack2PdfError::RenderFailed {
                    exit_code: None,
                    stderr: format!("writing HTML to wkhtmltopdf: {e}"),
                })?;
            // stdin is dropped here so the engine sees EOF
        }

        let result = child
            .wait_with_output()
            .map_err(|e| Substack2PdfError::RenderFailed {
                exit_code: None,
                stderr: e.to_string(),
            })?;

        if !result.status.success() {
            let exit_code = result.status.code();
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            warn!(
                exit_code = exit_code.unwrap_or(-1),
                stderr = %stderr,
                "wkhtmltopdf invocation failed"
            );
            return Err(Substack2PdfError::RenderFailed { exit_code, stderr });
        }

        info!(
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            html_bytes = html.len(),
            "Rendered PDF to {}",
            output.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args() {
        let args = build_args(&RenderOptions::default(), Path::new("/tmp/out.pdf"));
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "--encoding",
                "UTF-8",
                "--page-size",
                "A4",
                "--quiet",
                "--javascript-delay",
                "3000",
                "-",
                "/tmp/out.pdf",
            ]
        );
    }

    #[test]
    fn zero_delay_and_loud_drop_flags() {
        let options = RenderOptions {
            quiet: false,
            delay_ms: 0,
            ..RenderOptions::default()
        };
        let args = build_args(&options, Path::new("o.pdf"));
        assert!(!args.iter().any(|a| a == "--quiet"));
        assert!(!args.iter().any(|a| a == "--javascript-delay"));
        assert_eq!(args.last().and_then(|a| a.to_str()), Some("o.pdf"));
    }

    #[test]
    fn missing_binary_is_reported_not_panicked() {
        let dir = tempfile::tempdir().unwrap();
        let engine = WkHtmlToPdf::new(dir.path().join("no-such-wkhtmltopdf"));
        let err = engine
            .render(
                "<html></html>",
                &dir.path().join("out.pdf"),
                &RenderOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, Substack2PdfError::RendererNotFound { .. }));
        assert!(!dir.path().join("out.pdf").exists());
    }

    #[test]
    fn locate_reports_missing_explicit_path() {
        let err = WkHtmlToPdf::locate(Some(Path::new("/definitely/not/wkhtmltopdf"))).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/wkhtmltopdf"));
    }
}
