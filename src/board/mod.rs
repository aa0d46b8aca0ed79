//! Board system: tiles and the tile registry.
//!
//! ## Key Types
//!
//! - `Location`: Board position, 0 (Go) through 39
//! - `Tile`: Static tile data with a category-specific `TileKind`
//! - `RentTable`: Street rent schedule and house cost
//! - `Board`: Ordered registry with group and nearest-tile queries

pub mod registry;
pub mod tile;

pub use registry::Board;
pub use tile::{ColorGroup, RentTable, TaxRule, Tile, TileCategory, TileKind};

/// A board position (0-39).
pub type Location = u8;

/// Number of tiles on a board.
pub const BOARD_SIZE: usize = 40;

/// Location of Go.
pub const GO_LOCATION: Location = 0;

/// Location of the jail on the standard board.
pub const JAIL_LOCATION: Location = 10;
