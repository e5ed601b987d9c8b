//! Core services for SnapTile

pub mod complementary_resizer;
pub mod event_loop;
pub mod free_space;
pub mod tile_coordinator;
pub mod tile_group_manager;
pub mod tile_group_resolver;
pub mod tile_rect_resolver;

pub use complementary_resizer::*;
pub use event_loop::*;
pub use free_space::*;
pub use tile_coordinator::*;
pub use tile_group_manager::*;
pub use tile_group_resolver::*;
pub use tile_rect_resolver::*;
