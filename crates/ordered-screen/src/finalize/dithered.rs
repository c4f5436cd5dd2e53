use rand::rngs::StdRng;
use rand::SeedableRng;

use super::blur::GaussianFilter;
use super::placement::{add_level_dots, relocate_seed_dots, DotField, Relocation};
use super::{dither_threshold_table, MAXVAL};
use crate::api::ScreenError;
use crate::cell::{achieved_lpi, LatticeCell};
use crate::geometry::round_half_away;
use crate::growth::GrowthOrder;
use crate::grid::Grid;

/// Relocation pass limit per dot site.
const RELOCATION_PASSES_PER_DOT: usize = 4;

/// Inputs of the dithered finalizer beyond the supercell itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherSettings {
    pub levels: u32,
    pub hdpi: f64,
    pub vdpi: f64,
    pub gamma: f64,
    /// Seed for the level-0 dot draw; `None` draws from system entropy.
    pub seed: Option<u64>,
    pub verbose: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DitheredMask {
    pub mask: Grid<i32>,
    /// Level-0 relocation outcome, `None` when fewer than two dots were seeded.
    pub relocation: Option<Relocation>,
}

/// Threshold mask over the whole supercell with dither-level offsets.
///
/// The dot sites are split into `levels` groups by a blur-driven placement.
/// Every dot then gets the base thresholds of the growth order, raised by
/// `offset · (level + 1)` for the level its site joined, so dots of lower
/// levels start to grow first.
pub fn dithered_mask(
    supercell: &Grid<i32>,
    order: &GrowthOrder,
    cell: &LatticeCell,
    settings: &DitherSettings,
) -> Result<DitheredMask, ScreenError> {
    let levels = settings.levels.max(1);
    let mut field = DotField::from_supercell(supercell, levels as usize)?;
    let num_dots = field.sites().len();
    if num_dots == 0 {
        return Err(ScreenError::grid("supercell holds no dot sites"));
    }

    // Cumulative dot counts per level.
    let share = 1.0 / (f64::from(levels) + 1.0);
    let dot_levels: Vec<usize> = (0..levels)
        .map(|k| round_half_away(num_dots as f64 * f64::from(k + 1) * share) as usize)
        .collect();

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    field.seed_random(dot_levels[0], &mut rng)?;

    let lpi = achieved_lpi(cell.x as f64, cell.y as f64, settings.hdpi, settings.vdpi);
    let sigma_y = settings.vdpi / lpi;
    let sigma_x = sigma_y * settings.hdpi / settings.vdpi;
    let filter = GaussianFilter::new(sigma_x, sigma_y)?;

    let relocation = if dot_levels[0] > 1 {
        let outcome = relocate_seed_dots(
            &mut field,
            &filter,
            RELOCATION_PASSES_PER_DOT * num_dots,
        )?;
        tracing::debug!(
            passes = outcome.passes,
            converged = outcome.converged,
            "Relocated level-0 dots"
        );
        Some(outcome)
    } else {
        None
    };

    for level in 1..levels as usize {
        let count = dot_levels[level].saturating_sub(dot_levels[level - 1]);
        add_level_dots(&mut field, &filter, level, count)?;
    }

    if settings.verbose > 0 {
        for level in 0..levels as usize {
            let dots = field.level(level);
            tracing::debug!(level, points = dots.len(), "Dot positions");
            for (i, &site) in dots.iter().enumerate() {
                let (x, y) = field.sites()[site];
                tracing::debug!(level, point = i, location = x + y * supercell.width(), x, y);
            }
        }
    }

    let points = usize::try_from(cell.n)
        .map_err(|_| ScreenError::grid(format!("cell area {} is negative", cell.n)))?;
    let (thresholds, offset) = dither_threshold_table(points, settings.gamma, levels);

    let (width, height) = (supercell.width() as i64, supercell.height() as i64);
    let (one_x, one_y) = (order.first_on.0 as i64, order.first_on.1 as i64);
    let mut mask = Grid::try_new(supercell.width(), supercell.height(), 0)?;

    for (site, &(px, py)) in field.sites().iter().enumerate() {
        let level_offset = offset * f64::from(field.level_rank(site));
        for j in 0..order.grid.height() {
            for k in 0..order.grid.width() {
                let rank = order.grid.at(k, j);
                if rank == 0 {
                    continue;
                }
                let base = usize::try_from(rank - 1)
                    .ok()
                    .and_then(|i| thresholds.get(i).copied())
                    .ok_or_else(|| {
                        ScreenError::InternalConsistency(format!("rank {rank} exceeds cell size"))
                    })?;
                let row = (py as i64 + j as i64 - one_y).rem_euclid(height) as usize;
                let col = (px as i64 + k as i64 - one_x).rem_euclid(width) as usize;
                let value = (f64::from(base) + level_offset) as i32;
                mask.set(col, row, value.clamp(0, MAXVAL));
            }
        }
    }

    Ok(DitheredMask { mask, relocation })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::build_dot_mask;
    use crate::growth::solve_growth_order;
    use crate::spot::SpotFunction;
    use crate::supercell::{allocate_supercell, tile_supercell};

    fn dither(size: u32, levels: u32, seed: u64) -> (DitheredMask, LatticeCell) {
        let cell = LatticeCell::from_basis(0, 4, 4, 0, 300.0, 300.0);
        let mask = build_dot_mask(&cell, 0.0).unwrap();
        let order = solve_growth_order(mask, &cell, SpotFunction::Circle).unwrap();
        let dims = (order.grid.width(), order.grid.height());
        let mut layout = allocate_supercell(&cell, size, false, dims).unwrap();
        tile_supercell(&mut layout.grid, &order.grid, &cell).unwrap();
        let settings = DitherSettings {
            levels,
            hdpi: 300.0,
            vdpi: 300.0,
            gamma: 1.0,
            seed: Some(seed),
            verbose: 0,
        };
        (dithered_mask(&layout.grid, &order, &cell, &settings).unwrap(), cell)
    }

    #[test]
    fn test_mask_covers_supercell_in_range() {
        let (out, _) = dither(16, 3, 1);
        assert_eq!((out.mask.width(), out.mask.height()), (16, 16));
        assert!(out.mask.as_slice().iter().all(|&v| (1..=MAXVAL).contains(&v)));
    }

    #[test]
    fn test_same_seed_same_mask() {
        let (a, _) = dither(16, 3, 99);
        let (b, _) = dither(16, 3, 99);
        assert_eq!(a.mask, b.mask);
    }

    #[test]
    fn test_levels_multiply_distinct_values() {
        let (out, cell) = dither(16, 3, 5);
        let mut values = out.mask.as_slice().to_vec();
        values.sort_unstable();
        values.dedup();
        // 16 dots: 4 per level for three levels, 4 never placed. The two
        // largest offsets of rank 1 both clamp to MAXVAL.
        assert_eq!(values.len(), cell.n as usize * 4 - 1);
    }

    #[test]
    fn test_relocation_runs_for_seeded_dots() {
        let (out, _) = dither(16, 3, 3);
        let relocation = out.relocation.unwrap();
        assert!(relocation.passes >= 1);
    }
}
