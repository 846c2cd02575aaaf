//! Stages of a post-to-PDF run.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the engine can be swapped without touching extraction.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ extract ──▶ cleanup ──▶ template ──▶ render
//! (HTTP)    (selectors)  (rewrite)   (HTML doc)   (wkhtmltopdf)
//! ```
//!
//! 1. [`fetch`]    — one GET with a browser-like `User-Agent`
//! 2. [`extract`]  — title and content container via the source's selector pair
//! 3. [`cleanup`]  — drop images on request, strip inline styles, backfill
//!    lazy-loaded image sources
//! 4. [`template`] — wrap the content in a standalone document with the
//!    chosen font tier
//! 5. [`render`]   — hand the document to the external engine; blocking, so
//!    callers run it on the blocking pool

pub mod cleanup;
pub mod extract;
pub mod fetch;
pub mod render;
pub mod template;
