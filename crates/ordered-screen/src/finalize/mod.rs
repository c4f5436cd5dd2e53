//! Turning a tiled supercell of ranks into a threshold mask.
//!
//! Three ways out of the pipeline:
//!
//! - [`holladay_mask`]: the `H x L` Holladay brick, one threshold per rank.
//! - [`nondithered_mask`]: the whole supercell, one threshold per rank.
//! - [`dithered_mask`]: the whole supercell, with each dot's thresholds
//!   nudged by the dither level at which the dot starts to grow, spreading
//!   `N · levels` distinct gray levels over the tile.
//!
//! [`MaskKind::select`] decides which one applies.

pub mod blur;
mod dithered;
mod holladay;
pub mod placement;

pub use dithered::{dithered_mask, DitherSettings, DitheredMask};
pub use holladay::{holladay_mask, nondithered_mask};

use crate::api::ScreenWarning;
use crate::geometry::round_half_away;

/// Largest threshold value.
pub const MAXVAL: i32 = 65535;

/// Keeps the lightest threshold just below white.
const WHITE_SCALE: f64 = 253.0 / 255.0;

/// Which finalizer a screen goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    Holladay,
    NonDithered,
    Dithered { levels: u32 },
}

impl MaskKind {
    /// Pick the finalizer.
    ///
    /// A supercell no larger than one dot mask, or a single level, has
    /// nothing to dither. When `levels` dots per cell cannot fit in the
    /// supercell the level count is reduced to what fits and a
    /// [`ScreenWarning::QuantizationReduced`] is pushed.
    pub fn select(
        holladay: bool,
        levels: u32,
        cell_pixels: i64,
        supercell_dims: (usize, usize),
        dot_dims: (usize, usize),
        warnings: &mut Vec<ScreenWarning>,
    ) -> Self {
        if holladay {
            return MaskKind::Holladay;
        }
        if supercell_dims == dot_dims || levels == 1 {
            return MaskKind::NonDithered;
        }

        let pixels = (supercell_dims.0 * supercell_dims.1) as i64;
        let mut levels = levels;
        if i64::from(levels) * cell_pixels > pixels {
            let reduced = round_half_away(pixels as f64 / cell_pixels as f64).max(1) as u32;
            let warning = ScreenWarning::QuantizationReduced {
                from: levels,
                to: reduced,
                effective: pixels as u32,
            };
            tracing::warn!("{warning}");
            warnings.push(warning);
            levels = reduced;
        }

        if levels <= 1 {
            MaskKind::NonDithered
        } else {
            MaskKind::Dithered { levels }
        }
    }
}

/// Thresholds for ranks `1..=points`, darkest rank first.
///
/// Entry `points - k - 1` holds the centre of the `k`-th of `points` equal
/// steps over `0..=MAXVAL`, optionally gamma-remapped, scaled by 253/255
/// and offset by one so that no threshold reaches pure white or zero.
pub fn threshold_table(points: usize, gamma: f64) -> Vec<i32> {
    let step = (f64::from(MAXVAL) + 1.0) / points as f64;
    let half_step = step / 2.0;
    let mut table = vec![0; points];
    for k in 0..points {
        let mut level = ((k + 1) as f64 * step - half_step) / f64::from(MAXVAL);
        if gamma != 1.0 {
            level = level.powf(gamma);
        }
        table[points - k - 1] = round_half_away(level * f64::from(MAXVAL) * WHITE_SCALE + 1.0) as i32;
    }
    table
}

/// Base thresholds of the dithered branch and the per-level offset.
///
/// The table is the unscaled step centres truncated to integers; the offset
/// is the gap between the two darkest ranks split into `levels + 1` parts
/// and is taken before gamma is applied.
pub(crate) fn dither_threshold_table(points: usize, gamma: f64, levels: u32) -> (Vec<i32>, f64) {
    let step = (f64::from(MAXVAL) + 1.0) / points as f64;
    let mut table = vec![0; points];
    for k in 0..points {
        table[points - 1 - k] = ((k + 1) as f64 * step - step / 2.0) as i32;
    }
    let offset = match table.as_slice() {
        [first, second, ..] => f64::from(first - second) / (f64::from(levels) + 1.0),
        _ => 0.0,
    };
    if gamma != 1.0 {
        for t in table.iter_mut() {
            *t = round_half_away((f64::from(*t) / f64::from(MAXVAL)).powf(gamma) * f64::from(MAXVAL)) as i32;
        }
    }
    (table, offset)
}
