use std::cmp::Ordering;

use super::{MaskData, ThresholdMask};

struct Ranked {
    value: u16,
    x: u32,
    y: u32,
    dist: f64,
}

impl ThresholdMask {
    /// Convert threshold data into a turn-on sequence.
    ///
    /// Pixels are sorted by threshold, ties broken by squared distance to the
    /// bin center, and emitted highest first. A mask that already holds a
    /// sequence is returned unchanged.
    pub fn to_turn_on_sequence(&self) -> ThresholdMask {
        let thresholds = match &self.data {
            MaskData::Thresholds(t) => t,
            MaskData::TurnOnSequence(_) => return self.clone(),
        };

        let center = self.bin_center;
        let mut ranked: Vec<Ranked> = thresholds
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let x = i % self.width.max(1);
                let y = i / self.width.max(1);
                let dx = x as f64 - center.x;
                let dy = y as f64 - center.y;
                Ranked {
                    value,
                    x: x as u32,
                    y: y as u32,
                    dist: dx * dx + dy * dy,
                }
            })
            .collect();

        ranked.sort_by(|a, b| match a.value.cmp(&b.value) {
            Ordering::Equal => a.dist.total_cmp(&b.dist),
            other => other,
        });

        let sequence = ranked.iter().rev().map(|r| (r.x, r.y)).collect();
        ThresholdMask {
            width: self.width,
            height: self.height,
            bin_center: self.bin_center,
            data: MaskData::TurnOnSequence(sequence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector2;
    use crate::grid::Grid;

    fn mask(width: usize, height: usize, values: Vec<i32>, center: Vector2) -> ThresholdMask {
        let grid = Grid::from_vec(width, height, values).unwrap();
        ThresholdMask::from_grid(grid, center).unwrap()
    }

    #[test]
    fn test_highest_threshold_comes_first() {
        let m = mask(2, 2, vec![10, 40, 30, 20], Vector2::new(0.0, 0.0));
        let tos = m.to_turn_on_sequence();
        assert_eq!(tos.sequence().unwrap(), &[(1, 0), (0, 1), (1, 1), (0, 0)]);
        assert_eq!(tos.interleaved_sequence().unwrap(), vec![1, 0, 0, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_ties_put_farthest_pixel_first() {
        let m = mask(3, 1, vec![5, 5, 5], Vector2::new(1.0, 0.0));
        let tos = m.to_turn_on_sequence();
        // (1, 0) is nearest the center; (0, 0) and (2, 0) tie and keep scan
        // order through the stable sort before reversal.
        assert_eq!(tos.sequence().unwrap(), &[(2, 0), (0, 0), (1, 0)]);
    }

    #[test]
    fn test_sequence_keeps_dimensions() {
        let m = mask(3, 2, vec![1, 2, 3, 4, 5, 6], Vector2::new(1.0, 0.5));
        let tos = m.to_turn_on_sequence();
        assert_eq!((tos.width(), tos.height()), (3, 2));
        assert!(tos.thresholds().is_none());
        assert_eq!(tos.to_turn_on_sequence(), tos);
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let grid = Grid::from_vec(1, 1, vec![70_000]).unwrap();
        assert!(ThresholdMask::from_grid(grid, Vector2::default()).is_err());
    }
}
