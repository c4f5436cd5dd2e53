//! The supercell: a rectangular tile of many lattice cells.
//!
//! A rotated lattice does not repeat on a rectangle of one cell. The Holladay
//! construction finds the smallest `L x H` brick that does (up to a
//! horizontal shift `S` per brick row); [`allocate_supercell`] widens that
//! brick until it repeats without shift and covers the requested size, and
//! [`tile_supercell`] stamps the dot growth order across it.

mod allocate;
mod tile;

pub use allocate::{allocate_supercell, SupercellLayout};
pub use tile::tile_supercell;
