//! Periodic Gaussian blur of a binary dot bitmap.
//!
//! The dithered finalizer places dots where the blurred bitmap is darkest
//! and removes them where it is brightest. Only the positions of those
//! extremes are needed, so [`GaussianFilter::apply`] reports them without
//! keeping the blurred image.

use crate::api::ScreenError;
use crate::geometry::round_half_away;
use crate::grid::Grid;

/// A normalized 2-D Gaussian kernel with odd side lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianFilter {
    kernel: Grid<f64>,
}

/// Extremes of one blur pass. Positions are `(column, row)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurExtrema {
    pub max: f64,
    pub max_pos: (usize, usize),
    pub min: f64,
    pub min_pos: (usize, usize),
}

impl GaussianFilter {
    /// Kernel for blur radii `sigma_x`, `sigma_y` in pixels.
    ///
    /// Each side is `4σ` rounded, bumped to the next odd number. The
    /// Gaussian's standard deviation along each axis is the side length
    /// itself, which makes the kernel close to a box filter.
    pub fn new(sigma_x: f64, sigma_y: f64) -> Result<Self, ScreenError> {
        let width = odd_side(sigma_x)?;
        let height = odd_side(sigma_y)?;
        let (std_x, std_y) = (width as f64, height as f64);
        let half_x = (width as i64 - 1) / 2;
        let half_y = (height as i64 - 1) / 2;

        let mut kernel = Grid::try_new(width, height, 0.0)?;
        let mut sum = 0.0;
        for j in -half_y..=half_y {
            for k in -half_x..=half_x {
                let arg = -((k * k) as f64 / (std_x * std_x) + (j * j) as f64 / (std_y * std_y)) / 2.0;
                let value = arg.exp();
                sum += value;
                kernel.set((k + half_x) as usize, (j + half_y) as usize, value);
            }
        }
        for w in kernel.as_mut_slice() {
            *w /= sum;
        }

        tracing::debug!(width, height, "Built Gaussian filter");
        Ok(Self { kernel })
    }

    pub fn width(&self) -> usize {
        self.kernel.width()
    }

    pub fn height(&self) -> usize {
        self.kernel.height()
    }

    /// Correlate `bitmap` with the kernel, wrapping at the edges.
    ///
    /// Rows are scanned in the outer loop; the first pixel reaching a new
    /// maximum (or minimum) wins ties.
    pub fn apply(&self, bitmap: &Grid<u8>) -> BlurExtrema {
        let cols = bitmap.width() as i64;
        let rows = bitmap.height() as i64;
        let half_x = (self.kernel.width() as i64 - 1) / 2;
        let half_y = (self.kernel.height() as i64 - 1) / 2;

        let mut extrema = BlurExtrema {
            max: -1.0,
            max_pos: (0, 0),
            min: 100_000_000.0,
            min_pos: (0, 0),
        };

        for j in 0..rows {
            for k in 0..cols {
                let mut sum = 0.0;
                for jj in -half_y..=half_y {
                    let row = (j + jj).rem_euclid(rows) as usize;
                    for kk in -half_x..=half_x {
                        let col = (k + kk).rem_euclid(cols) as usize;
                        let on = bitmap.at(col, row);
                        if on != 0 {
                            sum += f64::from(on)
                                * self.kernel.at((kk + half_x) as usize, (jj + half_y) as usize);
                        }
                    }
                }
                if sum > extrema.max {
                    extrema.max = sum;
                    extrema.max_pos = (k as usize, j as usize);
                }
                if sum < extrema.min {
                    extrema.min = sum;
                    extrema.min_pos = (k as usize, j as usize);
                }
            }
        }
        extrema
    }
}

fn odd_side(sigma: f64) -> Result<usize, ScreenError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(ScreenError::InvalidParameter(format!(
            "blur radius {sigma} is not a finite non-negative number"
        )));
    }
    let size = round_half_away(sigma * 4.0);
    Ok(if size % 2 == 0 { size + 1 } else { size } as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides_are_odd() {
        let f = GaussianFilter::new(1.0, 1.1).unwrap();
        assert_eq!((f.width(), f.height()), (5, 5));
        let f = GaussianFilter::new(2.0, 0.5).unwrap();
        assert_eq!((f.width(), f.height()), (9, 3));
    }

    #[test]
    fn test_kernel_is_normalized() {
        let f = GaussianFilter::new(2.0, 3.0).unwrap();
        let sum: f64 = f.kernel.as_slice().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_dot_is_brightest_at_itself() {
        let mut bitmap = Grid::try_new(8, 6, 0u8).unwrap();
        bitmap.set(5, 2, 1);
        let f = GaussianFilter::new(1.0, 1.0).unwrap();
        let e = f.apply(&bitmap);
        assert_eq!(e.max_pos, (5, 2));
        // Zero blur away from the kernel footprint; the first such pixel wins.
        assert_eq!(e.min, 0.0);
        assert_eq!(e.min_pos, (0, 0));
    }

    #[test]
    fn test_blur_wraps_around_edges() {
        let mut bitmap = Grid::try_new(3, 3, 0u8).unwrap();
        bitmap.set(0, 0, 1);
        let f = GaussianFilter::new(0.5, 0.5).unwrap();
        let e = f.apply(&bitmap);
        assert_eq!(e.max_pos, (0, 0));
        // (2, 2) only sees the dot across both seams.
        assert!(e.min > 0.0);
        assert_eq!(e.min_pos, (1, 1));
    }

    #[test]
    fn test_negative_sigma_is_rejected() {
        assert!(GaussianFilter::new(-1.0, 1.0).is_err());
    }
}
