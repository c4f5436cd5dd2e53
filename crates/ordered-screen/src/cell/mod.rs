//! The repeat cell of the screen: lattice search and pixel mask.
//!
//! [`solve_cell_shape`] picks the integer lattice `(x, y), (u, v)` that best
//! approximates the requested angle and frequency; [`build_dot_mask`] then
//! rasterizes the parallelogram spanned by those vectors.

mod mask;
mod shape;

pub use mask::{build_dot_mask, find_bin_center, DotMask, INSIDE};
pub use shape::{solve_cell_shape, CellCandidate, CellSearch};

use crate::geometry::{Matrix2, Vector2};

/// One repeat cell of the screen lattice.
///
/// The cell is the parallelogram with vertices `(0, 0)`, `(x, y)`,
/// `(x + u, y + v)` and `(u, v)`. Its area `n = y·u − x·v` is the number of
/// pixels in one cell and therefore the number of gray levels one cell can
/// render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeCell {
    pub x: i64,
    pub y: i64,
    pub u: i64,
    pub v: i64,
    /// Pixels per cell, as reported by the lattice search.
    pub n: i64,
    /// Screen angle actually realized by the lattice, in degrees.
    pub angle: f64,
    /// Screen frequency actually realized by the lattice, in lines per inch.
    pub lpi: f64,
}

impl LatticeCell {
    /// Build a cell directly from its basis vectors, computing `n` as the area.
    pub fn from_basis(x: i64, y: i64, u: i64, v: i64, hdpi: f64, vdpi: f64) -> Self {
        let (xf, yf) = (x as f64, y as f64);
        let angle = if y == 0 {
            0.0
        } else {
            ((xf / hdpi) / (yf / vdpi)).atan().to_degrees()
        };
        Self {
            x,
            y,
            u,
            v,
            n: y * u - x * v,
            angle,
            lpi: achieved_lpi(xf, yf, hdpi, vdpi),
        }
    }

    /// Signed area of the cell parallelogram.
    #[inline]
    pub fn area(&self) -> i64 {
        self.y * self.u - self.x * self.v
    }

    /// Map from unit-square coordinates into cell pixel coordinates.
    ///
    /// The columns are the basis vectors `(u, v)` and `(x, y)`; the inverse of
    /// this matrix takes a pixel back into the unit square, where the spot
    /// function is evaluated.
    pub fn unit_to_pixel(&self) -> Matrix2 {
        Matrix2::new(self.u as f64, self.x as f64, self.v as f64, self.y as f64)
    }

    /// The shift matrix `[[x, u], [y, v]]` of the Holladay construction.
    pub fn shift_matrix(&self) -> Matrix2 {
        Matrix2::new(self.x as f64, self.u as f64, self.y as f64, self.v as f64)
    }

    /// Lattice translations that map the screen onto itself.
    pub fn translations(&self) -> [(i64, i64); 4] {
        [
            (-self.x, -self.y),
            (self.x, self.y),
            (-self.u, -self.v),
            (self.u, self.v),
        ]
    }

    pub(crate) fn upper_left(&self) -> Vector2 {
        Vector2::new(self.x as f64, self.y as f64)
    }

    pub(crate) fn lower_right(&self) -> Vector2 {
        Vector2::new(self.u as f64, self.v as f64)
    }
}

/// Lines per inch of a lattice step of `x` device pixels across and `y` down.
#[inline]
pub fn achieved_lpi(x: f64, y: f64, hdpi: f64, vdpi: f64) -> f64 {
    let ys = y / vdpi;
    let xs = x / hdpi;
    1.0 / (ys * ys + xs * xs).sqrt()
}
