//! mm_report: pure offline report model + renderers (JSON/HTML).
//!
//! Determinism rules:
//! - No network, no I/O here. Callers supply the comparison result in memory.
//! - Percent strings are formatted once, in the model, with one decimal.
//! - Stable section order and field names.

#![forbid(unsafe_code)]

use std::fmt;

pub mod structure;

#[cfg(feature = "render_html")]
pub mod render_html;
#[cfg(feature = "render_json")]
pub mod render_json;

pub use structure::{build_model, ReportModel};

#[cfg(feature = "render_html")]
pub use render_html::render_html;
#[cfg(feature = "render_json")]
pub use render_json::render_json;

// ===== Errors =====
#[derive(Debug)]
pub enum ReportError {
    /// The result references data the model cannot represent.
    Inconsistent(&'static str),
    /// Serialization failed (JSON renderer).
    Render(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Inconsistent(what) => write!(f, "inconsistent result: {what}"),
            ReportError::Render(msg) => write!(f, "render failed: {msg}"),
        }
    }
}

impl std::error::Error for ReportError {}
