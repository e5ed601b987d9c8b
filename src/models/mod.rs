//! Data models for SnapTile

pub mod rectangle;
pub mod side;
pub mod tiling_state;
pub mod window;

pub use rectangle::*;
pub use side::*;
pub use tiling_state::*;
pub use window::*;
