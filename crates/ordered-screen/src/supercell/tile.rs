use crate::api::ScreenError;
use crate::cell::LatticeCell;
use crate::grid::Grid;

/// Fill `supercell` by repeating the growth order of one cell.
///
/// The positive ranks of `dot_order` are copied to the top-left corner, then
/// every filled pixel copies its rank to the empty pixels one lattice
/// translation away, pass after pass, until the supercell is full. A pass
/// that fills nothing means the lattice cannot reach the remaining pixels and
/// is reported as [`ScreenError::GridConstruction`].
pub fn tile_supercell(
    supercell: &mut Grid<i32>,
    dot_order: &Grid<i32>,
    cell: &LatticeCell,
) -> Result<(), ScreenError> {
    let (width, height) = (supercell.width() as i64, supercell.height() as i64);
    let total = supercell.len();
    let mut filled = 0usize;

    for k in 0..dot_order.width() {
        for j in 0..dot_order.height() {
            let value = dot_order.at(k, j);
            if value > 0 && k < supercell.width() && j < supercell.height() {
                supercell.set(k, j, value);
                filled += 1;
            }
        }
    }

    let translations = cell.translations();
    let mut passes = 0usize;
    while filled < total {
        let before = filled;
        for k in 0..width {
            for j in 0..height {
                let value = supercell.at(k as usize, j as usize);
                if value == 0 {
                    continue;
                }
                for (dx, dy) in translations {
                    let (nk, nj) = (k + dx, j + dy);
                    if supercell.get_signed(nk, nj) == Some(0) {
                        supercell.set(nk as usize, nj as usize, value);
                        filled += 1;
                    }
                }
            }
        }
        passes += 1;
        if filled == before {
            return Err(ScreenError::grid(format!(
                "tiling stalled with {filled} of {total} supercell pixels filled"
            )));
        }
    }

    tracing::debug!(passes, pixels = total, "Tiled supercell");
    Ok(())
}
