//! CLI binary for substack2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, drives the stages one by one and prints one result
//! line. Fetch, extraction and render failures are reported, not propagated:
//! the process still exits normally.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use substack2pdf::{
    prepare_document, render_to_file, resolve_output_path, ConversionConfig, ConversionReport,
    ErrorKind, FontSize, SourceFormat, Substack2PdfError, MAX_RENDER_DELAY_MS,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Save to ~/Desktop/<title>.pdf
  substack2pdf https://someone.substack.com/p/some-post

  # Explicit output file, smaller type
  substack2pdf https://someone.substack.com/p/some-post -o post.pdf --font-size small

  # Text only
  substack2pdf --no-images https://someone.substack.com/p/some-post

  # Medium article
  substack2pdf --medium https://medium.com/@someone/some-post-1234 -o post.pdf

  # Inspect the HTML that would be rendered
  substack2pdf --html-only https://someone.substack.com/p/some-post > post.html

FONT SIZES:
  Tier    Body   Title
  ─────   ────   ─────
  small   18px   24px
  big     26px   34px   (default)

ENVIRONMENT VARIABLES:
  WKHTMLTOPDF_PATH        Path to the wkhtmltopdf binary
  RUST_LOG                Override log filtering (e.g. substack2pdf=debug)

SETUP:
  Install wkhtmltopdf (https://wkhtmltopdf.org/downloads.html). The binary is
  expected at /usr/local/bin/wkhtmltopdf unless --wkhtmltopdf or
  WKHTMLTOPDF_PATH points elsewhere.
"#;

/// Save a Substack or Medium post as a PDF.
#[derive(Parser, Debug)]
#[command(
    name = "substack2pdf",
    version,
    about = "Convert a Substack (or Medium) post to a PDF with customizable options",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// URL of the post.
    url: String,

    /// Output PDF file. Default: ~/Desktop/<title>.pdf
    #[arg(short, long, env = "SUBSTACK2PDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Exclude images from the output.
    #[arg(long, env = "SUBSTACK2PDF_NO_IMAGES")]
    no_images: bool,

    /// Font size tier.
    #[arg(long, env = "SUBSTACK2PDF_FONT_SIZE", value_enum, default_value = "big")]
    font_size: FontSizeArg,

    /// Use Medium's page structure instead of Substack's.
    #[arg(long, env = "SUBSTACK2PDF_MEDIUM")]
    medium: bool,

    /// Path to the wkhtmltopdf binary.
    #[arg(long, env = "WKHTMLTOPDF_PATH")]
    wkhtmltopdf: Option<PathBuf>,

    /// Milliseconds the engine waits for images before capturing.
    #[arg(
        long,
        env = "SUBSTACK2PDF_RENDER_DELAY",
        default_value_t = 3000,
        value_parser = clap::value_parser!(u64).range(..=MAX_RENDER_DELAY_MS)
    )]
    render_delay: u64,

    /// Print the assembled HTML to stdout instead of rendering a PDF.
    #[arg(long)]
    html_only: bool,

    /// Print the result (or error) as JSON.
    #[arg(long, env = "SUBSTACK2PDF_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SUBSTACK2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress the spinner and logs; only the result line is printed.
    #[arg(short, long, env = "SUBSTACK2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FontSizeArg {
    Small,
    Big,
}

impl From<FontSizeArg> for FontSize {
    fn from(v: FontSizeArg) -> Self {
        match v {
            FontSizeArg::Small => FontSize::Small,
            FontSizeArg::Big => FontSize::Big,
        }
    }
}

/// JSON shape of a failed run.
#[derive(Serialize)]
struct FailureReport<'a> {
    kind: ErrorKind,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters, so library INFO logs
    // stay hidden while it is active.
    let show_spinner = !cli.quiet && !cli.json && !cli.html_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialise logging")?;

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            report_failure(&cli, &e);
            return Ok(());
        }
    };
    let spinner = show_spinner.then(new_spinner);

    // ── Fetch + extract + template ───────────────────────────────────────
    if let Some(ref bar) = spinner {
        bar.set_prefix("Fetching");
        bar.set_message(cli.url.clone());
    }
    let (post, document) = match prepare_document(&cli.url, &config).await {
        Ok(prepared) => prepared,
        Err(e) => {
            finish(&spinner);
            report_failure(&cli, &e);
            return Ok(());
        }
    };

    if cli.html_only {
        println!("{}", document.as_str());
        return Ok(());
    }

    // ── Render ───────────────────────────────────────────────────────────
    let result = async {
        let output = resolve_output_path(cli.output.as_deref(), &post.title, &config)?;
        if let Some(ref bar) = spinner {
            bar.set_prefix("Rendering");
            bar.set_message(post.title.clone());
        }
        render_to_file(&document, &output, &config).await?;
        Ok::<_, Substack2PdfError>(ConversionReport {
            title: post.title.clone(),
            output,
            html_bytes: document.len(),
            image_count: document.image_count(),
        })
    }
    .await;
    finish(&spinner);

    match result {
        Ok(report) => report_success(&cli, &report)?,
        Err(e) => report_failure(&cli, &e),
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig, Substack2PdfError> {
    let mut builder = ConversionConfig::builder()
        .source(if cli.medium {
            SourceFormat::Medium
        } else {
            SourceFormat::Substack
        })
        .font_size(cli.font_size.into())
        .strip_images(cli.no_images)
        .render_delay_ms(cli.render_delay);

    if let Some(ref path) = cli.wkhtmltopdf {
        builder = builder.wkhtmltopdf_path(path);
    }

    builder.build()
}

fn new_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn finish(spinner: &Option<ProgressBar>) {
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
}

fn report_success(cli: &Cli, report: &ConversionReport) -> Result<()> {
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("Failed to serialise report")?
        );
    } else {
        println!("✅ PDF saved as: {}", bold(&report.output.display().to_string()));
        if !cli.quiet {
            eprintln!(
                "   {}",
                dim(&format!(
                    "{} · {} images · {} bytes of HTML",
                    report.title, report.image_count, report.html_bytes
                ))
            );
        }
    }
    Ok(())
}

fn report_failure(cli: &Cli, error: &Substack2PdfError) {
    if cli.json {
        let title = match error {
            Substack2PdfError::ContentNotFound { title, .. } => Some(title.as_str()),
            _ => None,
        };
        let failure = FailureReport {
            kind: error.kind(),
            error: error.to_string(),
            title,
        };
        match serde_json::to_string_pretty(&failure) {
            Ok(json) => println!("{json}"),
            Err(_) => println!("{{\"error\": {:?}}}", error.to_string()),
        }
        return;
    }

    let lead = match error.kind() {
        ErrorKind::Fetch | ErrorKind::Extraction => "Failed to retrieve or parse the post content",
        ErrorKind::Render => "Error during PDF generation",
        ErrorKind::Config => "Error",
    };
    println!("{} {}: {}", red("✘"), lead, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("substack2pdf").chain(args.iter().copied()))
    }

    #[test]
    fn render_delay_over_limit_is_an_argument_error() {
        let err = parse(&["https://x.substack.com/p/y", "--render-delay", "70000"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn render_delay_at_limit_builds() {
        let cli = parse(&["https://x.substack.com/p/y", "--render-delay", "60000"]).unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.render.delay_ms, MAX_RENDER_DELAY_MS);
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = parse(&[
            "https://medium.com/@a/b",
            "--medium",
            "--no-images",
            "--font-size",
            "small",
            "--wkhtmltopdf",
            "/opt/wk/bin/wkhtmltopdf",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.source, SourceFormat::Medium);
        assert!(config.strip_images);
        assert_eq!(config.font_size, FontSize::Small);
        assert_eq!(
            config.wkhtmltopdf_path.as_deref(),
            Some(std::path::Path::new("/opt/wk/bin/wkhtmltopdf"))
        );
    }
}
