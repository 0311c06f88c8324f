//! Recognised failures of a conversion run.
//!
//! Anything that reaches `main` as a [`ProcessingError`] is a failure the tool
//! knows how to describe. Any other error is reported as unexpected.
//! Per-document failures use the same type but are caught by the page
//! assembly loop and never abort the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The remote documentation tree could not be cloned or updated.
    #[error("Git operation failed: {0}")]
    Sync(String),

    /// Discovery or page assembly produced nothing to render.
    #[error("{0}")]
    NoContent(String),

    /// The stylesheet could not be read or created.
    #[error("Stylesheet '{path}' unusable: {reason}")]
    Stylesheet { path: PathBuf, reason: String },

    /// A single document failed to transform.
    #[error("Error processing '{path}': {reason}")]
    Document { path: PathBuf, reason: String },

    /// The headless browser failed to load or print the document.
    #[error("Error generating PDF: {0}")]
    Render(String),

    /// The settings file exists but could not be used.
    #[error("Invalid configuration '{path}': {reason}")]
    Config { path: PathBuf, reason: String },
}

impl ProcessingError {
    pub fn document<P: Into<PathBuf>, S: ToString>(path: P, reason: S) -> ProcessingError {
        ProcessingError::Document {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
