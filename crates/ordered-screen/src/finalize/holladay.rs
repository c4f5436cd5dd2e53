use super::threshold_table;
use crate::api::ScreenError;
use crate::grid::Grid;

/// The `L` wide, `H` tall Holladay brick of `supercell`, as thresholds.
///
/// The brick repeats with a horizontal shift of `S` per brick row, so it is
/// a complete description of the screen together with that shift.
pub fn holladay_mask(
    supercell: &Grid<i32>,
    h: i64,
    l: i64,
    gamma: f64,
) -> Result<Grid<i32>, ScreenError> {
    if h <= 0 || l <= 0 || h as usize > supercell.height() || l as usize > supercell.width() {
        return Err(ScreenError::grid(format!(
            "Holladay brick {l}x{h} does not fit the {}x{} supercell",
            supercell.width(),
            supercell.height()
        )));
    }
    let (width, height) = (l as usize, h as usize);
    let table = threshold_table(width * height, gamma);
    let mut mask = Grid::try_new(width, height, 0)?;
    for j in 0..height {
        for k in 0..width {
            mask.set(k, j, lookup(&table, supercell.at(k, j))?);
        }
    }
    Ok(mask)
}

/// The whole `supercell` as thresholds, one per rank.
pub fn nondithered_mask(
    supercell: &Grid<i32>,
    h: i64,
    l: i64,
    gamma: f64,
) -> Result<Grid<i32>, ScreenError> {
    let points = (h * l).max(0) as usize;
    let table = threshold_table(points, gamma);
    let mut mask = Grid::try_new(supercell.width(), supercell.height(), 0)?;
    for j in 0..supercell.height() {
        for k in 0..supercell.width() {
            mask.set(k, j, lookup(&table, supercell.at(k, j))?);
        }
    }
    Ok(mask)
}

fn lookup(table: &[i32], rank: i32) -> Result<i32, ScreenError> {
    usize::try_from(rank - 1)
        .ok()
        .and_then(|i| table.get(i).copied())
        .ok_or_else(|| {
            ScreenError::InternalConsistency(format!(
                "rank {rank} outside threshold table of {}",
                table.len()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranks_4x4() -> Grid<i32> {
        Grid::from_vec(4, 4, (1..=16).collect()).unwrap()
    }

    #[test]
    fn test_holladay_mask_is_the_brick() {
        let supercell = Grid::from_vec(3, 2, vec![1, 2, 3, 3, 1, 2]).unwrap();
        let mask = holladay_mask(&supercell, 1, 3, 1.0).unwrap();
        assert_eq!((mask.width(), mask.height()), (3, 1));
        let table = threshold_table(3, 1.0);
        assert_eq!(mask.as_slice(), table.as_slice());
    }

    #[test]
    fn test_nondithered_mask_covers_supercell() {
        let mask = nondithered_mask(&ranks_4x4(), 4, 4, 1.0).unwrap();
        assert_eq!((mask.width(), mask.height()), (4, 4));
        // Rank 1 turns on first, so it carries the highest threshold.
        assert!(mask.as_slice().windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_unranked_pixel_is_rejected() {
        let mut supercell = ranks_4x4();
        supercell.set(2, 2, 0);
        let err = nondithered_mask(&supercell, 4, 4, 1.0).unwrap_err();
        assert!(matches!(err, ScreenError::InternalConsistency(_)));
    }
}
