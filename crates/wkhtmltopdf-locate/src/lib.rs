//! # wkhtmltopdf-locate
//!
//! Resolve the on-disk location of the
//! [wkhtmltopdf](https://wkhtmltopdf.org/) binary.
//!
//! The binary is never searched for on `PATH`. Resolution is deliberately
//! narrow so the same machine always renders with the same engine:
//!
//! 1. An explicit path handed in by the caller (e.g. a `--wkhtmltopdf` flag).
//! 2. The `WKHTMLTOPDF_PATH` environment variable.
//! 3. The hardcoded install location for the current platform.
//!
//! The first candidate that is set wins; it must then exist on disk.
//!
//! ```rust,no_run
//! let bin = wkhtmltopdf_locate::locate(None).expect("wkhtmltopdf not installed");
//! println!("rendering with {}", bin.display());
//! ```
//!
//! ## Platform defaults
//!
//! | OS      | Path                                                   |
//! |---------|--------------------------------------------------------|
//! | macOS   | `/usr/local/bin/wkhtmltopdf`                           |
//! | Linux   | `/usr/local/bin/wkhtmltopdf`                           |
//! | Windows | `C:\Program Files\wkhtmltopdf\bin\wkhtmltopdf.exe`     |

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable that overrides the platform default.
pub const ENV_OVERRIDE: &str = "WKHTMLTOPDF_PATH";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned while resolving the binary.
#[derive(Error, Debug)]
pub enum LocateError {
    /// No default install location is known for this OS.
    #[error("No default wkhtmltopdf location for platform '{os}'; set {ENV_OVERRIDE}")]
    UnsupportedPlatform { os: String },

    /// A candidate was chosen but nothing exists at that path.
    #[error("wkhtmltopdf not found at '{path}' (from {origin})")]
    NotFound { path: PathBuf, origin: Origin },
}

/// Where a resolved path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Explicit,
    Environment,
    PlatformDefault,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Explicit => f.write_str("explicit path"),
            Origin::Environment => write!(f, "{ENV_OVERRIDE}"),
            Origin::PlatformDefault => f.write_str("platform default"),
        }
    }
}

// ── Platform defaults ────────────────────────────────────────────────────────

/// The hardcoded install location for the current OS.
pub fn default_binary_path() -> Result<PathBuf, LocateError> {
    default_for_os(std::env::consts::OS)
}

fn default_for_os(os: &str) -> Result<PathBuf, LocateError> {
    match os {
        "macos" | "linux" | "freebsd" | "openbsd" | "netbsd" => {
            Ok(PathBuf::from("/usr/local/bin/wkhtmltopdf"))
        }
        "windows" => Ok(PathBuf::from(
            r"C:\Program Files\wkhtmltopdf\bin\wkhtmltopdf.exe",
        )),
        other => Err(LocateError::UnsupportedPlatform {
            os: other.to_string(),
        }),
    }
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Pick the candidate path without touching the file system.
///
/// Returns the path together with the rule that produced it.
pub fn candidate(explicit: Option<&Path>) -> Result<(PathBuf, Origin), LocateError> {
    if let Some(p) = explicit {
        return Ok((p.to_path_buf(), Origin::Explicit));
    }
    if let Ok(env_path) = std::env::var(ENV_OVERRIDE) {
        if !env_path.trim().is_empty() {
            return Ok((PathBuf::from(env_path), Origin::Environment));
        }
    }
    default_binary_path().map(|p| (p, Origin::PlatformDefault))
}

/// Resolve the binary and check that it exists.
pub fn locate(explicit: Option<&Path>) -> Result<PathBuf, LocateError> {
    let (path, origin) = candidate(explicit)?;
    if path.is_file() {
        Ok(path)
    } else {
        Err(LocateError::NotFound { path, origin })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
