//! The screen generation pipeline.

use super::{OutputFormat, ScreenError, ScreenParams, ScreenWarning};
use crate::cell::{build_dot_mask, solve_cell_shape, LatticeCell};
use crate::finalize::{
    dithered_mask, holladay_mask, nondithered_mask, DitherSettings, MaskKind,
};
use crate::geometry::round_half_away;
use crate::growth::solve_growth_order;
use crate::output::ThresholdMask;
use crate::supercell::{allocate_supercell, tile_supercell};

/// A generated screen and how it was built.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedScreen {
    /// Horizontal shift `S` between consecutive Holladay brick rows.
    pub shift: i64,
    /// The lattice cell the screen is built from.
    pub cell: LatticeCell,
    /// Dither levels actually used, after any reduction.
    pub num_levels: u32,
    /// Which finalizer produced the mask.
    pub kind: MaskKind,
    pub mask: ThresholdMask,
    pub warnings: Vec<ScreenWarning>,
}

/// Build a halftone screen.
///
/// Runs every stage in order: lattice search, dot mask, growth order,
/// supercell allocation and tiling, and finally one of the three mask
/// finalizers. Warnings are logged as they occur and returned with the
/// screen.
///
/// # Example
///
/// ```
/// use ordered_screen::{generate_ordered_screen, OutputFormat, ScreenParams};
///
/// let params = ScreenParams::new()
///     .angle(15.0)
///     .lpi(75.0)
///     .output_format(OutputFormat::ThresholdGrid);
/// let screen = generate_ordered_screen(&params).unwrap();
///
/// assert_eq!(screen.cell.n, 17);
/// assert_eq!(screen.num_levels, 1);
/// ```
pub fn generate_ordered_screen(params: &ScreenParams) -> Result<GeneratedScreen, ScreenError> {
    params.validate()?;
    let angle = params.wrapped_angle();

    let search = solve_cell_shape(angle, params.lpi, params.hdpi, params.vdpi, params.verbose);
    let mut warnings = search.warnings;
    let cell = search.cell;
    if cell.n <= 0 {
        return Err(ScreenError::grid(format!(
            "lattice ({}, {}), ({}, {}) has no area",
            cell.x, cell.y, cell.u, cell.v
        )));
    }

    let mut num_levels = if params.quantization_specified {
        round_half_away(f64::from(params.quantization) / cell.n as f64)
    } else {
        1
    }
    .max(1) as u32;
    let target_size = if num_levels == 1 {
        tracing::debug!("No additional dithering, creating minimal periodic screen");
        1
    } else {
        params.size
    };

    let mask = build_dot_mask(&cell, angle)?;
    let order = solve_growth_order(mask, &cell, params.spot)?;
    let dot_dims = (order.grid.width(), order.grid.height());

    let mut layout = allocate_supercell(&cell, target_size, params.holladay, dot_dims)?;

    if target_size == 1 && num_levels > 1 {
        let warning = ScreenWarning::SupercellTooSmall {
            requested: params.quantization,
            minimum_size: (f64::from(params.quantization) / cell.n as f64).ceil() as u32,
            levels: cell.n as u32,
        };
        tracing::warn!("{warning}");
        warnings.push(warning);
    }

    tile_supercell(&mut layout.grid, &order.grid, &cell)?;

    let supercell_dims = (layout.grid.width(), layout.grid.height());
    let kind = MaskKind::select(
        params.holladay,
        num_levels,
        cell.n,
        supercell_dims,
        dot_dims,
        &mut warnings,
    );

    let grid = match kind {
        MaskKind::Holladay => holladay_mask(&layout.grid, layout.h, layout.l, params.gamma)?,
        MaskKind::NonDithered => {
            nondithered_mask(&layout.grid, layout.h, layout.l, params.gamma)?
        }
        MaskKind::Dithered { levels } => {
            num_levels = levels;
            let settings = DitherSettings {
                levels,
                hdpi: params.hdpi,
                vdpi: params.vdpi,
                gamma: params.gamma,
                seed: params.seed,
                verbose: params.verbose,
            };
            let dithered = dithered_mask(&layout.grid, &order, &cell, &settings)?;
            if let Some(relocation) = dithered.relocation.filter(|r| !r.converged) {
                let warning = ScreenWarning::RelocationCapped {
                    passes: relocation.passes,
                };
                tracing::warn!("{warning}");
                warnings.push(warning);
            }
            dithered.mask
        }
    };
    if kind == MaskKind::NonDithered && num_levels > 1 {
        num_levels = 1;
    }

    let mut mask = ThresholdMask::from_grid(grid, order.bin_center)?;
    if params.output_format == OutputFormat::TurnOnSequence {
        mask = mask.to_turn_on_sequence();
    }

    tracing::info!(
        width = mask.width(),
        height = mask.height(),
        shift = layout.shift,
        levels = num_levels,
        n = cell.n,
        "Generated screen"
    );

    Ok(GeneratedScreen {
        shift: layout.shift,
        cell,
        num_levels,
        kind,
        mask,
        warnings,
    })
}
