//! Weft - Incremental force-directed diagrams with stable node identity.
//!
//! A [`Diagram`] binds two keyed groupings of user records (nodes and
//! edges) to a rendering surface. Records are wrapped once per key and the
//! wrappers are reused on every redraw, so positions and velocities survive
//! data updates and the layout resumes from where it stopped. Each redraw
//! reconciles the surface against the current data, expands declarative
//! constraints into extra layout edges and starts a steppable solver run.
//!
//! The crate is organized as follows:
//!
//! - [`record`] and [`accessor`]: user data and the attribute accessors
//! - [`cache`] and [`topology`]: keyed wrappers and per-redraw frames
//! - [`constraint`]: constraint requests and their expansion
//! - [`layout`]: the solver contract, the force solver and the coordinator
//! - [`path`]: clipped edge paths and label orientation
//! - [`surface`], [`sync`] and [`export`]: rendering surfaces and reconciliation
//! - [`events`]: the `end` lifecycle event

pub mod accessor;
pub mod cache;
pub mod config;
pub mod constraint;
pub mod diagram;
pub mod events;
pub mod export;
pub mod layout;
pub mod path;
pub mod record;
pub mod surface;
pub mod sync;
pub mod topology;

mod error;

pub use weft_core::{color, draw, geometry, identifier};

pub use diagram::Diagram;
pub use error::WeftError;
