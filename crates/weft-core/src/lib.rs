//! Weft Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Weft diagram
//! reconciler and its rendering surfaces. It includes:
//!
//! - **Identifiers**: String-interned stable keys ([`identifier::Key`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, sizes, segments and view transforms ([`geometry`] module)
//! - **Draw**: Stroke, marker and layer definitions ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
