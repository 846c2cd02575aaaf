//! Entry points that drive the pipeline stages in order.
//!
//! The stages can be called one by one ([`fetch_post`], [`prepare_document`],
//! [`render_to_file`]) when a caller wants to report progress between them,
//! or all at once through [`convert_to_file`].

use crate::config::ConversionConfig;
use crate::destination::{DesktopOutput, OutputPathPolicy};
use crate::error::Substack2PdfError;
use crate::output::{ConversionReport, Post};
use crate::pipeline::render::{PdfEngine, WkHtmlToPdf};
use crate::pipeline::template::RenderDocument;
use crate::pipeline::{extract, fetch};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Download a post page and extract it.
///
/// Succeeds even when the content container is missing; the returned
/// [`Post`] then has `content_markup: None`. Only fetch failures (and a
/// rewriter failure during cleanup) are errors here.
pub async fn fetch_post(
    url: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<Post, Substack2PdfError> {
    let url = url.as_ref();
    let html = fetch::fetch_page(url, &config.user_agent).await?;
    let post = extract::extract_post(&html, config.source, config.strip_images)?;
    info!(
        "Extracted \"{}\" ({})",
        post.title,
        if post.has_content() {
            "content found"
        } else {
            "no content"
        }
    );
    Ok(post)
}

/// Fetch, extract and template a post.
///
/// # Errors
/// Fetch errors as in [`fetch_post`], plus
/// [`Substack2PdfError::ContentNotFound`] (carrying the title) when the
/// source's content selector matched nothing. No document exists then.
pub async fn prepare_document(
    url: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<(Post, RenderDocument), Substack2PdfError> {
    let post = fetch_post(url, config).await?;
    match RenderDocument::from_post(&post, config.font_size) {
        Some(document) => {
            debug!(
                "Assembled {} bytes of HTML ({} images)",
                document.len(),
                document.image_count()
            );
            Ok((post, document))
        }
        None => Err(Substack2PdfError::ContentNotFound {
            title: post.title,
            selector: config.source.selectors().content,
        }),
    }
}

/// Where the PDF for `title` goes: `output` if given, else the configured
/// policy, else `~/Desktop/<title>.pdf`.
pub fn resolve_output_path(
    output: Option<&Path>,
    title: &str,
    config: &ConversionConfig,
) -> Result<PathBuf, Substack2PdfError> {
    if let Some(path) = output {
        return Ok(path.to_path_buf());
    }
    match config.output_policy {
        Some(ref policy) => policy.resolve(title),
        None => DesktopOutput::new().resolve(title),
    }
}

/// Render a document to `output`.
///
/// The engine writes into a temporary file in the destination directory,
/// which is renamed onto `output` only after the engine succeeds. A failed
/// render therefore never leaves a partial PDF behind. The destination
/// directory must already exist.
pub async fn render_to_file(
    document: &RenderDocument,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<(), Substack2PdfError> {
    let started_at = Instant::now();
    let output = output.as_ref();

    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.is_dir() {
        warn!("Output directory {} does not exist", dir.display());
        return Err(Substack2PdfError::OutputDirMissing { dir });
    }

    let engine = resolve_engine(config)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(".substack2pdf-").suffix(".pdf");
    // Staging files default to 0600; the saved PDF should be readable like
    // any other file the user writes (still subject to the umask).
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let staging = builder
        .tempfile_in(&dir)
        .map_err(|e| Substack2PdfError::OutputWriteFailed {
            path: output.to_path_buf(),
            source: e,
        })?;
    let staging_path = staging.path().to_path_buf();

    let html = document.as_str().to_owned();
    let options = config.render.clone();
    tokio::task::spawn_blocking(move || engine.render(&html, &staging_path, &options))
        .await
        .map_err(|e| Substack2PdfError::Internal(format!("Render task panicked: {e}")))??;

    staging
        .persist(output)
        .map_err(|e| Substack2PdfError::OutputWriteFailed {
            path: output.to_path_buf(),
            source: e.error,
        })?;

    info!(
        "Saved {} in {}ms",
        output.display(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}

/// Fetch a post and save it as a PDF.
///
/// `output` overrides the default location (see [`resolve_output_path`]).
pub async fn convert_to_file(
    url: impl AsRef<str>,
    output: Option<&Path>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Substack2PdfError> {
    let (post, document) = prepare_document(url, config).await?;
    let path = resolve_output_path(output, &post.title, config)?;
    render_to_file(&document, &path, config).await?;

    Ok(ConversionReport {
        title: post.title,
        output: path,
        html_bytes: document.len(),
        image_count: document.image_count(),
    })
}

/// Synchronous wrapper around [`convert_to_file`].
///
/// Runs on a fresh current-thread tokio runtime.
pub fn convert_sync(
    url: impl AsRef<str>,
    output: Option<&Path>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Substack2PdfError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Substack2PdfError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert_to_file(url, output, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// The injected engine if there is one, otherwise wkhtmltopdf.
fn resolve_engine(config: &ConversionConfig) -> Result<Arc<dyn PdfEngine>, Substack2PdfError> {
    if let Some(ref engine) = config.engine {
        return Ok(Arc::clone(engine));
    }
    let engine = WkHtmlToPdf::locate(config.wkhtmltopdf_path.as_deref())?;
    Ok(Arc::new(engine))
}
