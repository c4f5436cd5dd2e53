//! Rational-angle lattice search.
//!
//! A digital screen can only realize angles whose tangent is a ratio of small
//! integers. The solver walks lattice steps of increasing length along the
//! requested direction and keeps the densest lattice whose frequency still
//! reaches the requested LPI.
//!
//! The walk is split into regimes on `ratio = tan(angle) · hdpi / vdpi`:
//!
//! | Regime | Stepped | Bound | Rounds `u`, `v` |
//! |--------|---------|-------|-----------------|
//! | `0 < ratio < 1` | `x` | 10 steps | no |
//! | `ratio >= 1` | `y` | until LPI drops | yes |
//! | `ratio == 0`, `hdpi >= vdpi` | `y` | until LPI drops | yes |
//! | `ratio == 0`, `hdpi < vdpi` | `x` | 10 steps | yes |
//!
//! The regimes differ in small ways (which values get rounded, whether the
//! second candidate rolls back to the first, strict vs. non-strict LPI
//! comparison). These differences are kept as they are so that generated
//! screens stay identical to existing ones.

use super::{achieved_lpi, LatticeCell};
use crate::api::ScreenWarning;
use crate::geometry::round_half_away;

/// Upper bound on the number of `x` steps in the bounded regimes.
const MAX_X_STEPS: i64 = 10;

/// Single-precision pi, widened. Angles are converted with this value so
/// that 45° yields a ratio just above 1 and lands in the `ratio >= 1` regime.
const PI: f64 = std::f32::consts::PI as f64;

/// One row of the lattice search table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellCandidate {
    pub x: f64,
    pub y: f64,
    pub u: f64,
    pub v: f64,
    pub angle: f64,
    pub lpi: f64,
    pub levels: f64,
}

impl CellCandidate {
    fn into_cell(self) -> LatticeCell {
        LatticeCell {
            x: self.x as i64,
            y: self.y as i64,
            u: self.u as i64,
            v: self.v as i64,
            n: self.levels as i64,
            angle: self.angle,
            lpi: self.lpi,
        }
    }
}

/// Outcome of [`solve_cell_shape`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellSearch {
    /// The lattice that was selected.
    pub cell: LatticeCell,
    /// Every candidate examined, in search order; the last row is the selection.
    pub candidates: Vec<CellCandidate>,
    pub warnings: Vec<ScreenWarning>,
}

/// What to do when the second candidate is the first one to undershoot.
#[derive(Clone, Copy)]
enum AtMaximum {
    /// Roll back to the first candidate.
    RollBack,
    /// Keep the undershooting second candidate.
    Keep,
}

struct Walk {
    /// `Some(n)` walks at most `n` steps; `None` walks until the LPI drops.
    bound: Option<i64>,
    strict_prev: bool,
    at_maximum: AtMaximum,
}

/// Find the lattice cell for a screen angle and frequency.
///
/// `angle` is in degrees and expected in `[0, 90)`; `target_lpi`, `hdpi` and
/// `vdpi` must be positive. When `verbose > 0` the candidate table is logged
/// at `info`, otherwise at `trace`.
pub fn solve_cell_shape(
    angle: f64,
    target_lpi: f64,
    hdpi: f64,
    vdpi: f64,
    verbose: u8,
) -> CellSearch {
    let ratio = (angle * PI / 180.0).tan() * hdpi / vdpi;
    let scaled_x = hdpi / vdpi;
    let true_angle = |x: f64, y: f64| 180.0 * ((x / hdpi) / (y / vdpi)).atan() / PI;
    let round = |value: f64| round_half_away(value) as f64;

    let (walk, step): (Walk, Box<dyn Fn(f64) -> CellCandidate>) = if ratio > 0.0 && ratio < 1.0 {
        (
            Walk {
                bound: Some(MAX_X_STEPS),
                strict_prev: false,
                at_maximum: AtMaximum::RollBack,
            },
            Box::new(move |x: f64| {
                let y = round(x / ratio);
                let u = y * scaled_x;
                let v = -x / scaled_x;
                CellCandidate {
                    x,
                    y,
                    u,
                    v,
                    angle: true_angle(x, y),
                    lpi: achieved_lpi(x, y, hdpi, vdpi),
                    levels: y * u - x * v,
                }
            }),
        )
    } else if ratio >= 1.0 {
        (
            Walk {
                bound: None,
                strict_prev: false,
                at_maximum: AtMaximum::Keep,
            },
            Box::new(move |y: f64| {
                let x = round(y * ratio);
                let v = round(-x / scaled_x);
                let u = round(y * scaled_x);
                CellCandidate {
                    x,
                    y,
                    u,
                    v,
                    angle: true_angle(x, y),
                    lpi: achieved_lpi(x, y, hdpi, vdpi),
                    levels: y * u - x * v,
                }
            }),
        )
    } else if scaled_x >= 1.0 {
        (
            Walk {
                bound: None,
                strict_prev: false,
                at_maximum: AtMaximum::Keep,
            },
            Box::new(move |y: f64| {
                let x = round(y * ratio);
                let v = round(-x / scaled_x);
                let u = round(y * scaled_x);
                CellCandidate {
                    x,
                    y,
                    u,
                    v,
                    angle: 0.0,
                    lpi: achieved_lpi(x, y, hdpi, vdpi),
                    levels: y * u - x * v,
                }
            }),
        )
    } else {
        (
            Walk {
                bound: Some(MAX_X_STEPS),
                strict_prev: true,
                at_maximum: AtMaximum::Keep,
            },
            Box::new(move |x: f64| {
                let y = round(x * ratio);
                let v = round(-x / scaled_x);
                let u = round(y * scaled_x);
                CellCandidate {
                    x,
                    y,
                    u,
                    v,
                    angle: 0.0,
                    lpi: achieved_lpi(x, y, hdpi, vdpi),
                    levels: y * u - x * v,
                }
            }),
        )
    };

    let search = walk_lattice(&walk, step.as_ref(), target_lpi, verbose);
    tracing::debug!(
        x = search.cell.x,
        y = search.cell.y,
        u = search.cell.u,
        v = search.cell.v,
        n = search.cell.n,
        angle = search.cell.angle,
        lpi = search.cell.lpi,
        "Selected lattice cell"
    );
    search
}

fn walk_lattice(
    walk: &Walk,
    step: &dyn Fn(f64) -> CellCandidate,
    target_lpi: f64,
    verbose: u8,
) -> CellSearch {
    let mut candidates = Vec::new();
    let mut warnings = Vec::new();
    let mut warn = |warning: ScreenWarning| {
        tracing::warn!("{warning}");
        warnings.push(warning);
    };
    let mut prev_lpi = 0.0;
    let mut max_lpi = 0.0;
    let mut selected = None;
    let mut last = step(1.0);
    let mut index: i64 = 1;

    if verbose > 0 {
        tracing::info!("x\ty\tu\tv\tAngle\tLPI\tLevels");
    }

    loop {
        match walk.bound {
            Some(bound) if index > bound => break,
            None if last.lpi <= target_lpi && index > 1 => break,
            _ => {}
        }

        let mut candidate = step(index as f64);
        let mut stop = false;

        if prev_lpi == 0.0 {
            prev_lpi = candidate.lpi;
            if target_lpi > candidate.lpi {
                warn(ScreenWarning::LpiNotAchievable {
                    target: target_lpi,
                    best: candidate.lpi,
                });
                stop = true;
            }
            max_lpi = candidate.lpi;
        }

        let prev_reaches = if walk.strict_prev {
            prev_lpi > target_lpi
        } else {
            prev_lpi >= target_lpi
        };
        if prev_reaches && candidate.lpi < target_lpi {
            match walk.at_maximum {
                AtMaximum::RollBack => {
                    if prev_lpi == max_lpi {
                        warn(ScreenWarning::LpiAtMaximum { lpi: prev_lpi });
                    }
                    candidate = step((index - 1) as f64);
                }
                AtMaximum::Keep => {
                    if prev_lpi == max_lpi {
                        warn(ScreenWarning::LpiBelowTarget {
                            target: target_lpi,
                            achieved: candidate.lpi,
                        });
                    } else {
                        candidate = step((index - 1) as f64);
                    }
                }
            }
            stop = true;
        }

        log_candidate(&candidate, verbose);
        candidates.push(candidate);
        last = candidate;

        if stop {
            selected = Some(candidate);
            break;
        }
        prev_lpi = candidate.lpi;
        index += 1;
    }

    let chosen = selected.unwrap_or(last);
    CellSearch {
        cell: chosen.into_cell(),
        candidates,
        warnings,
    }
}

fn log_candidate(c: &CellCandidate, verbose: u8) {
    if verbose > 0 {
        tracing::info!(
            "{:3.0}\t{:3.0}\t{:3.0}\t{:3.0}\t{:3.1}\t{:3.1}\t{:3.0}",
            c.x,
            c.y,
            c.u,
            c.v,
            c.angle,
            c.lpi,
            c.levels
        );
    } else {
        tracing::trace!(
            x = c.x,
            y = c.y,
            u = c.u,
            v = c.v,
            angle = c.angle,
            lpi = c.lpi,
            levels = c.levels,
            "Lattice candidate"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifteen_degrees_at_300_dpi() {
        // The first step (x=1, y=4) only reaches ~72.8 lpi, so it is used
        // with a warning.
        let search = solve_cell_shape(15.0, 75.0, 300.0, 300.0, 0);
        let cell = search.cell;
        assert_eq!((cell.x, cell.y, cell.u, cell.v), (1, 4, 4, -1));
        assert_eq!(cell.n, 17);
        assert_eq!(cell.n, cell.area());
        assert!(matches!(
            search.warnings.as_slice(),
            [ScreenWarning::LpiNotAchievable { .. }]
        ));
        assert_eq!(search.candidates.len(), 1);
    }

    #[test]
    fn test_fifteen_degrees_picks_densest_lattice_above_target() {
        // Step 1 gives ~72.8 lpi, step 2 (x=2, y=7) ~41.2 lpi.
        let search = solve_cell_shape(15.0, 50.0, 300.0, 300.0, 0);
        let cell = search.cell;
        assert_eq!((cell.x, cell.y, cell.u, cell.v), (1, 4, 4, -1));
        assert!(cell.lpi >= 50.0);
        // the first step is listed again as the rolled-back selection
        assert_eq!(search.candidates.len(), 2);
        assert!(matches!(
            search.warnings.as_slice(),
            [ScreenWarning::LpiAtMaximum { .. }]
        ));
    }

    #[test]
    fn test_fifteen_degrees_rolls_back_past_first_step() {
        // lpi by step: 72.8, 41.2, 26.3, ... target 30 stops at step 3 and
        // rolls back to step 2.
        let search = solve_cell_shape(15.0, 30.0, 300.0, 300.0, 0);
        let cell = search.cell;
        assert_eq!((cell.x, cell.y), (2, 7));
        assert_eq!((cell.u, cell.v), (7, -2));
        assert_eq!(cell.n, 53);
        assert!(search.warnings.is_empty());
    }

    #[test]
    fn test_zero_degrees_steps_in_y() {
        let search = solve_cell_shape(0.0, 70.0, 300.0, 300.0, 0);
        let cell = search.cell;
        // y=1: 300 lpi, y=2: 150, y=3: 100, y=4: 75, y=5: 60 rolls back to y=4
        assert_eq!((cell.x, cell.y, cell.u, cell.v), (0, 4, 4, 0));
        assert_eq!(cell.n, 16);
        assert_eq!(cell.angle, 0.0);
        assert!((cell.lpi - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_degrees_anisotropic_scales_u() {
        let search = solve_cell_shape(0.0, 70.0, 600.0, 300.0, 0);
        let cell = search.cell;
        assert_eq!((cell.y, cell.u), (4, 8));
        assert_eq!(cell.n, 32);
    }

    #[test]
    fn test_forty_five_degrees_keeps_second_step_when_first_overshoots() {
        // y=1 gives 212 lpi, y=2 gives 106 lpi (< 150). The second step is
        // kept with a below-target warning.
        let search = solve_cell_shape(45.0, 150.0, 300.0, 300.0, 0);
        let cell = search.cell;
        assert_eq!((cell.x, cell.y, cell.u, cell.v), (2, 2, 2, -2));
        assert_eq!(cell.n, 8);
        assert!(matches!(
            search.warnings.as_slice(),
            [ScreenWarning::LpiBelowTarget { .. }]
        ));
    }

    #[test]
    fn test_forty_five_degrees_rolls_back_later_steps() {
        // 212, 106, 70.7, 53.0 ... target 60 stops at y=4 and rolls back to y=3.
        let search = solve_cell_shape(45.0, 60.0, 300.0, 300.0, 0);
        let cell = search.cell;
        assert_eq!((cell.x, cell.y, cell.u, cell.v), (3, 3, 3, -3));
        assert_eq!(cell.n, 18);
    }

    #[test]
    fn test_candidate_table_ends_with_selection() {
        let search = solve_cell_shape(30.0, 40.0, 300.0, 300.0, 1);
        let last = search.candidates.last().unwrap();
        assert_eq!(last.x as i64, search.cell.x);
        assert_eq!(last.y as i64, search.cell.y);
        assert_eq!(last.levels as i64, search.cell.n);
    }
}
