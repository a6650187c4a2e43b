//! Per-front-end policy applied at the pipeline boundary.

use serde::{Deserialize, Serialize};

/// The front-end a pipeline instance serves.
///
/// The decode/normalize/infer path is identical for both; only the policies
/// below differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPoint {
    /// Programmatic JSON endpoint.
    Http,
    /// Interactive drawing surface.
    Canvas,
}

impl EntryPoint {
    /// Whether a blank input is reported as empty instead of being classified.
    pub fn checks_empty_input(self) -> bool {
        matches!(self, EntryPoint::Canvas)
    }

    /// Whether a classifier that fails to load stops the front-end.
    ///
    /// The HTTP server refuses to start; the canvas shows a banner and keeps
    /// running so the model can be reloaded.
    pub fn startup_failure_is_fatal(self) -> bool {
        matches!(self, EntryPoint::Http)
    }
}

impl std::fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryPoint::Http => write!(f, "http"),
            EntryPoint::Canvas => write!(f, "canvas"),
        }
    }
}
