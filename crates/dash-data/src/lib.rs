//! Dashboard payload sources and renderer settings
//!
//! Everything that crosses the boundary to the backend lives here: the
//! [`DashboardSource`] trait with its HTTP and file implementations, and the
//! settings file the renderer starts from.

pub mod config;
pub mod sources;

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// Re-exports
pub use config::RendererSettings;
pub use sources::{DashboardSource, FileDashboardSource, HttpDashboardSource};

/// Errors that can occur while fetching a dashboard payload
#[derive(Error, Debug)]
pub enum DataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl DataError {
    /// Whether the failure happened before any response was received
    pub fn is_network(&self) -> bool {
        matches!(self, DataError::Http(_) | DataError::Timeout(_))
    }
}
