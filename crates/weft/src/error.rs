//! Error types for Weft operations.
//!
//! Reconciliation itself never fails: dangling edges, zero-length edges and
//! degenerate circle constraints are silently omitted. [`WeftError`] covers
//! the surrounding concerns: event registration, configuration and export.

use std::io;

use thiserror::Error;

use weft_core::color::ColorError;

/// The main error type for Weft operations.
#[derive(Debug, Error)]
pub enum WeftError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown event type `{0}`, expected `end` or `end.<name>`")]
    UnknownEvent(String),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for WeftError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
