//! Windowing platform integration layer for SnapTile
//!
//! The engine never owns windows. These modules describe what it reads from
//! and requests of the windowing system, plus an in-memory implementation
//! that tests and the `replay` command run against.

pub mod display;
pub mod windowing;

pub use display::*;
pub use windowing::*;
