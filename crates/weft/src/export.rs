//! Document export.
//!
//! [`svg::SvgSurface`] is the reference [`crate::surface::RenderSurface`]:
//! it keeps the keyed elements in memory and serializes them as an SVG
//! document on demand.

pub mod svg;

use std::io;

use thiserror::Error;

/// Errors raised while writing a rendered document.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
