//! ordered-screen: ordered-dither halftone screen generation
//!
//! This library builds the threshold masks a rasterizer uses to turn
//! continuous-tone pixels into printable halftone dots at a given screen
//! angle, frequency and device resolution.
//!
//! # Quick Start
//!
//! ```
//! use ordered_screen::{generate_ordered_screen, OutputFormat, ScreenParams};
//!
//! let params = ScreenParams::new()
//!     .angle(15.0)
//!     .lpi(75.0)
//!     .dpi(300.0)
//!     .output_format(OutputFormat::ThresholdGrid);
//!
//! let screen = generate_ordered_screen(&params).unwrap();
//! let thresholds = screen.mask.thresholds().unwrap();
//! assert_eq!(thresholds.len(), screen.mask.width() * screen.mask.height());
//! ```
//!
//! # Pipeline Overview
//!
//! ```text
//! ScreenParams
//!     |
//!     v
//! solve_cell_shape         (integer lattice (x, y), (u, v) for angle + lpi)
//!     |
//!     v
//! build_dot_mask           (pixels of one cell; count must equal N)
//!     |
//!     v
//! solve_growth_order       (spot function ranks pixels 1..=N)
//!     |
//!     v
//! allocate_supercell       (Holladay brick H x L, shift S, period)
//!     |
//!     v
//! tile_supercell           (stamp ranks by lattice translation)
//!     |
//!     +---> holladay_mask      (H x L brick)
//!     +---> nondithered_mask   (whole supercell)
//!     +---> dithered_mask      (blur-guided dot levels)
//!     |
//!     v
//! ThresholdMask            (thresholds, or turn-on sequence)
//! ```
//!
//! # Gray Levels
//!
//! One cell of `N` pixels renders `N + 1` tones. Requesting more levels
//! through [`ScreenParams::quantization`] makes the generator split the dots
//! of a larger supercell into groups that start growing at slightly
//! different thresholds, which multiplies the number of distinct tones by
//! the number of groups. The supercell must be large enough for that, set
//! with [`ScreenParams::size`].
//!
//! # Determinism
//!
//! Apart from the random draw of the first dither level, every stage is
//! deterministic. Ties are broken by scan order, so the same parameters give
//! the same mask bit for bit. Pass [`ScreenParams::seed`] to pin the random
//! draw as well.

pub mod api;
pub mod cell;
pub mod finalize;
pub mod geometry;
pub mod grid;
pub mod growth;
pub mod output;
pub mod spot;
pub mod supercell;


pub use api::{
    generate_ordered_screen, GeneratedScreen, OutputFormat, ScreenError, ScreenParams,
    ScreenWarning,
};
pub use cell::{solve_cell_shape, CellCandidate, CellSearch, LatticeCell};
pub use finalize::{MaskKind, MAXVAL};
pub use geometry::Vector2;
pub use grid::Grid;
pub use output::{MaskData, ThresholdMask};
pub use spot::{SpotFunction, UnknownSpotFunction};
