use crate::api::ScreenError;
use crate::cell::LatticeCell;
use crate::geometry::{gcd, lcm, round_half_away, Vector2};
use crate::grid::Grid;

/// Tolerance for accepting a solved lattice coordinate as an integer.
const INTEGER_TOLERANCE: f64 = 1e-8;

/// Geometry of an allocated supercell.
#[derive(Debug, Clone, PartialEq)]
pub struct SupercellLayout {
    /// Zero-filled supercell, ready for tiling.
    pub grid: Grid<i32>,
    /// Holladay brick height, `gcd(|y|, |v|)`.
    pub h: i64,
    /// Holladay brick width, `N / H`.
    pub l: i64,
    /// Horizontal shift between consecutive brick rows.
    pub shift: i64,
}

/// Size the supercell for `cell` and allocate it.
///
/// In Holladay mode the result is just large enough to hold one brick and one
/// dot mask (`dot_dims` is the mask's `(width, height)`). Otherwise the
/// width is a multiple of `lcm(L, S)` and the height a multiple of
/// `H · lcm(L, S) / S`, each the smallest multiple at least `target_size`,
/// so that the tile repeats without shift.
pub fn allocate_supercell(
    cell: &LatticeCell,
    target_size: u32,
    holladay: bool,
    dot_dims: (usize, usize),
) -> Result<SupercellLayout, ScreenError> {
    let h = gcd(cell.y.abs(), cell.v.abs());
    if h == 0 {
        return Err(ScreenError::grid("Holladay brick height is zero"));
    }
    let l = cell.n / h;

    let inverse = cell
        .shift_matrix()
        .inverse()
        .ok_or(ScreenError::SingularMatrix("Holladay shift matrix"))?;

    // Smallest horizontal step along brick height H that lands on a lattice
    // point.
    let d_final = (1..=l)
        .find(|&k| {
            let m_n = inverse * Vector2::new(k as f64, h as f64);
            is_integer(m_n.x) && is_integer(m_n.y)
        })
        .ok_or_else(|| ScreenError::grid("no lattice point found for the Holladay brick"))?;
    let shift = l - d_final;

    let (period, min_vert) = if shift != 0 {
        let period = lcm(l, shift)
            .filter(|&p| p > 0)
            .ok_or_else(|| ScreenError::grid(format!("no positive period for L={l} S={shift}")))?;
        (period, h * period / shift)
    } else {
        (l, h)
    };

    let (width, height) = if holladay {
        (
            (l as usize).max(dot_dims.0),
            (h as usize).max(dot_dims.1),
        )
    } else {
        let target = f64::from(target_size.max(1));
        let a = (target / period as f64).ceil() as i64;
        let b = (target / min_vert as f64).ceil() as i64;
        let width = a * period;
        let height = b * min_vert;
        if width <= 0 || height <= 0 {
            return Err(ScreenError::grid(format!(
                "supercell size {width}x{height} is not positive"
            )));
        }
        (width as usize, height as usize)
    };

    tracing::debug!(h, l, shift, width, height, holladay, "Allocated supercell");

    Ok(SupercellLayout {
        grid: Grid::try_new(width, height, 0)?,
        h,
        l,
        shift,
    })
}

#[inline]
fn is_integer(value: f64) -> bool {
    (value - round_half_away(value) as f64).abs() < INTEGER_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_15() -> LatticeCell {
        LatticeCell::from_basis(1, 4, 4, -1, 300.0, 300.0)
    }

    #[test]
    fn test_rotated_cell_brick_and_shift() {
        let layout = allocate_supercell(&cell_15(), 1, false, (5, 5)).unwrap();
        assert_eq!((layout.h, layout.l, layout.shift), (1, 17, 4));
        // lcm(17, 4) = 68 columns, 1 * 68 / 4 = 17 rows.
        assert_eq!((layout.grid.width(), layout.grid.height()), (68, 17));
        assert!(layout.grid.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_target_size_rounds_up_to_period() {
        let layout = allocate_supercell(&cell_15(), 100, false, (5, 5)).unwrap();
        assert_eq!((layout.grid.width(), layout.grid.height()), (136, 102));
    }

    #[test]
    fn test_holladay_mode_covers_brick_and_mask() {
        let layout = allocate_supercell(&cell_15(), 1, true, (5, 5)).unwrap();
        assert_eq!((layout.grid.width(), layout.grid.height()), (17, 5));
    }

    #[test]
    fn test_axis_aligned_cell_has_no_shift() {
        let cell = LatticeCell::from_basis(0, 4, 4, 0, 300.0, 300.0);
        let layout = allocate_supercell(&cell, 1, false, (4, 4)).unwrap();
        assert_eq!((layout.h, layout.l, layout.shift), (4, 4, 0));
        assert_eq!((layout.grid.width(), layout.grid.height()), (4, 4));
    }

    #[test]
    fn test_zero_height_brick_is_an_error() {
        let cell = LatticeCell::from_basis(3, 0, 0, 0, 300.0, 300.0);
        let err = allocate_supercell(&cell, 1, false, (0, 0)).unwrap_err();
        assert!(matches!(err, ScreenError::GridConstruction { .. }));
    }
}
