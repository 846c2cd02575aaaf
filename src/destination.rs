//! Default output location for a PDF when the caller gives no path.
//!
//! The policy is a trait so the orchestration code never has to touch a real
//! home directory in tests: inject a [`DirectoryOutput`] pointing at a temp
//! dir, or any custom [`OutputPathPolicy`].

use crate::error::Substack2PdfError;
use crate::output::UNTITLED;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Decides where `<title>.pdf` goes.
pub trait OutputPathPolicy: Send + Sync {
    /// Full path of the PDF for a post with this title.
    fn resolve(&self, title: &str) -> Result<PathBuf, Substack2PdfError>;
}

/// `<home>/Desktop/<title>.pdf`.
///
/// The Desktop folder is not created; on systems without one the render
/// step reports a missing output directory.
#[derive(Debug, Clone, Default)]
pub struct DesktopOutput {
    home: Option<PathBuf>,
}

impl DesktopOutput {
    /// Use the current user's home directory.
    pub fn new() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    /// Use an explicit home directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
        }
    }
}

impl OutputPathPolicy for DesktopOutput {
    fn resolve(&self, title: &str) -> Result<PathBuf, Substack2PdfError> {
        let home = self
            .home
            .as_ref()
            .ok_or(Substack2PdfError::NoHomeDirectory)?;
        Ok(pdf_path_in(&home.join("Desktop"), title))
    }
}

/// `<dir>/<title>.pdf` for an arbitrary directory.
#[derive(Debug, Clone)]
pub struct DirectoryOutput {
    dir: PathBuf,
}

impl DirectoryOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl OutputPathPolicy for DirectoryOutput {
    fn resolve(&self, title: &str) -> Result<PathBuf, Substack2PdfError> {
        Ok(pdf_path_in(&self.dir, title))
    }
}

fn pdf_path_in(dir: &Path, title: &str) -> PathBuf {
    dir.join(format!("{}.pdf", sanitize_file_name(title)))
}

static RE_RESERVED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).unwrap());
static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Turn a post title into something every common file system accepts.
///
/// Path separators and characters reserved on Windows become `-`, runs of
/// whitespace collapse to one space, leading dots are dropped so the file is
/// never hidden, and the stem is capped at 200 characters.
pub fn sanitize_file_name(title: &str) -> String {
    let replaced = RE_RESERVED.replace_all(title, "-");
    let collapsed = RE_SPACES.replace_all(&replaced, " ");
    let trimmed = collapsed.trim().trim_start_matches('.').trim();
    let capped: String = trimmed.chars().take(200).collect();
    let capped = capped.trim_end();
    if capped.is_empty() {
        UNTITLED.to_string()
    } else {
        capped.to_string()
    }
}
