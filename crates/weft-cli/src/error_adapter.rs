//! Error adapter for converting CliError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Graph file errors
//! carry their source text, so they are rendered with a labeled snippet.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use weft::WeftError;

use crate::{error::CliError, graph::GraphError};

/// Adapter rendering a [`CliError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CliError::Graph(_) => "weft::graph",
            CliError::Weft(WeftError::Io(_)) => "weft::io",
            CliError::Weft(WeftError::Config(_)) => "weft::config",
            CliError::Weft(WeftError::UnknownEvent(_)) => "weft::event",
            CliError::Weft(WeftError::Color(_)) => "weft::color",
            CliError::Weft(WeftError::Export(_)) => "weft::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            CliError::Graph(_) => {
                "a graph file lists [[nodes]] and [[edges]] tables, each with a `key`"
            }
            CliError::Weft(WeftError::Config(_)) => {
                "check the configuration file against the documented sections"
            }
            CliError::Weft(WeftError::Color(_)) => {
                "use a CSS color name or a hex value such as #336699"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            CliError::Graph(GraphError::Parse { src, .. }) => Some(src as &dyn miette::SourceCode),
            CliError::Weft(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let CliError::Graph(err) = &self.0 else {
            return None;
        };
        let span = err.span()?;
        let label = LabeledSpan::new_primary_with_span(
            Some(err.message().to_string()),
            SourceSpan::from(span),
        );
        Some(Box::new(std::iter::once(label)))
    }
}
