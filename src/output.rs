//! Values produced by a run: the extracted [`Post`] and the final
//! [`ConversionReport`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Title used when the page has no (non-empty) heading.
pub const UNTITLED: &str = "Untitled";

/// The title/content pair pulled out of one article page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Text of the first title heading, or [`UNTITLED`].
    pub title: String,
    /// Cleaned-up outer HTML of the content container; `None` when the
    /// container selector matched nothing.
    pub content_markup: Option<String>,
}

impl Post {
    /// Whether a content container was found.
    pub fn has_content(&self) -> bool {
        self.content_markup.is_some()
    }
}

/// Summary of a successful save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub title: String,
    /// Where the PDF was written.
    pub output: PathBuf,
    /// Size of the HTML handed to the engine.
    pub html_bytes: usize,
    /// `<img>` elements left in the rendered content.
    pub image_count: usize,
}
