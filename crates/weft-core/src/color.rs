//! CSS color handling.
//!
//! Node fills, node strokes and edge strokes are configured as CSS color
//! strings. [`Color`] validates them once so rendering surfaces never emit a
//! malformed attribute.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;
use log::debug;
use thiserror::Error;

/// Error returned when a string is not a recognizable CSS color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color '{input}': {reason}")]
pub struct ColorError {
    input: String,
    reason: String,
}

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Parses CSS color strings such as "#ff0000", "rgb(255, 0, 0)" or "red".
    ///
    /// # Errors
    ///
    /// Returns [`ColorError`] if the string cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use weft_core::color::Color;
    ///
    /// assert!(Color::new("steelblue").is_ok());
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, ColorError> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| {
                debug!(input:? = color_str, err:%; "Failed to parse color");
                ColorError {
                    input: color_str.to_string(),
                    reason: err.to_string(),
                }
            })
    }

    /// Get the sanitized ID-safe string for this color (for use in element ids)
    pub fn to_id_safe_string(&self) -> String {
        let color_str = self.to_string();
        let mut sanitized = color_str
            .replace('#', "hex")
            .replace(['(', ')', ',', ' ', ';', '%', '.'], "_");

        // SVG ids must start with a letter
        if sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            sanitized = format!("c_{sanitized}");
        }

        sanitized
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("black is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        svg::node::Value::from(color.to_string())
    }
}
