//! Rasterization of one lattice cell into a pixel mask.

use super::LatticeCell;
use crate::api::ScreenError;
use crate::geometry::Vector2;
use crate::grid::Grid;

/// Mask value of a pixel inside the cell that has no rank yet.
pub const INSIDE: i32 = -1;

/// The pixels of one repeat cell.
///
/// Cells are [`INSIDE`] for pixels of the cell and `0` elsewhere. The grid
/// covers the bounding box of the parallelogram: columns `0..x+u` and rows
/// `min(0, v)..y`, so row index `r` corresponds to lattice row
/// `r + min(0, v)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DotMask {
    pub grid: Grid<i32>,
    /// Half the extent of the inside pixels; the tie-break reference for
    /// turn-on sequences.
    pub bin_center: Vector2,
    /// Lattice row of grid row 0, `min(0, v)`.
    pub row_offset: i64,
}

/// Rasterize the parallelogram of `cell` and verify its pixel count.
///
/// For a nonzero `angle` every pixel center `(k + 0.5, j + 0.5)` of the
/// bounding box is classified with four half-plane tests against the cell
/// edges. At 0° the cell is the axis-aligned `u x y` rectangle.
///
/// Fails with [`ScreenError::GridConstruction`] when the number of inside
/// pixels differs from `cell.n`.
pub fn build_dot_mask(cell: &LatticeCell, angle: f64) -> Result<DotMask, ScreenError> {
    let (x, y, u, v) = (cell.x, cell.y, cell.u, cell.v);

    let (grid, row_offset) = if angle != 0.0 {
        if x + u <= 0 || y - v.min(0) <= 0 {
            return Err(ScreenError::grid(format!(
                "degenerate cell ({x}, {y}), ({u}, {v})"
            )));
        }
        let slope1 = y as f64 / x as f64;
        let slope2 = v as f64 / u as f64;
        let upper_left = cell.upper_left();
        let lower_right = cell.lower_right();
        // Lines through the far vertices, parallel to the two edges.
        let b3 = upper_left.y - slope2 * upper_left.x;
        let b4 = lower_right.y - slope1 * lower_right.x;

        let val_min = v.min(0);
        let width = (x + u) as usize;
        let height = (val_min.abs() + y) as usize;
        let mut grid = Grid::try_new(width, height, 0i32)?;

        for k in 0..(x + u) {
            for j in val_min..y {
                let px = k as f64 + 0.5;
                let py = j as f64 + 0.5;
                let t1 = slope1 * px >= py;
                let t2 = slope2 * px <= py;
                let t3 = slope2 * px + b3 > py;
                let t4 = slope1 * px + b4 < py;
                if t1 && t2 && t3 && t4 {
                    grid.set(k as usize, (j - val_min) as usize, INSIDE);
                }
            }
        }
        (grid, val_min)
    } else {
        if y < 0 || u < 0 {
            return Err(ScreenError::grid(format!(
                "degenerate axis-aligned cell {u}x{y}"
            )));
        }
        (Grid::try_new(u as usize, y as usize, INSIDE)?, 0)
    };

    let inside = grid.count_eq(INSIDE);
    if inside as i64 != cell.n {
        return Err(ScreenError::grid(format!(
            "dot mask has {inside} cells inside, lattice area is {}",
            cell.n
        )));
    }

    let bin_center = find_bin_center(&grid);
    tracing::debug!(
        width = grid.width(),
        height = grid.height(),
        inside,
        "Built dot mask"
    );

    Ok(DotMask {
        grid,
        bin_center,
        row_offset,
    })
}

/// Half the width and height of the bounding box of the [`INSIDE`] pixels.
///
/// This is an extent, not a position: the turn-on sequence measures pixel
/// distances against it as if it were a coordinate.
pub fn find_bin_center(grid: &Grid<i32>) -> Vector2 {
    let mut min_x = grid.width() as i64 + 1;
    let mut min_y = grid.height() as i64 + 1;
    let mut max_x = -1i64;
    let mut max_y = -1i64;

    for x in 0..grid.width() {
        for y in 0..grid.height() {
            if grid.at(x, y) == INSIDE {
                let (xi, yi) = (x as i64, y as i64);
                min_x = min_x.min(xi);
                max_x = max_x.max(xi);
                min_y = min_y.min(yi);
                max_y = max_y.max(yi);
            }
        }
    }

    Vector2::new((max_x - min_x) as f64 / 2.0, (max_y - min_y) as f64 / 2.0)
}
