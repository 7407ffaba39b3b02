//! Errors surfaced by the CLI.

use std::io;

use thiserror::Error;

use weft::{WeftError, export};

use crate::graph::GraphError;

/// Anything [`run`](crate::run) can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Weft(#[from] WeftError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Weft(WeftError::Io(err))
    }
}

impl From<export::Error> for CliError {
    fn from(err: export::Error) -> Self {
        Self::Weft(WeftError::from(err))
    }
}
