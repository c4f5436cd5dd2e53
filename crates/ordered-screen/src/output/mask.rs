use crate::api::ScreenError;
use crate::geometry::Vector2;
use crate::grid::Grid;

/// Contents of a [`ThresholdMask`].
#[derive(Debug, Clone, PartialEq)]
pub enum MaskData {
    /// Row-major thresholds in `0..=65535`.
    Thresholds(Vec<u16>),
    /// Pixel coordinates `(x, y)`, last pixel to turn on first.
    TurnOnSequence(Vec<(u32, u32)>),
}

/// A finished halftone screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdMask {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) bin_center: Vector2,
    pub(crate) data: MaskData,
}

impl ThresholdMask {
    /// Wrap a finalized threshold grid.
    ///
    /// Fails with [`ScreenError::InternalConsistency`] if a value falls
    /// outside `0..=65535`.
    pub fn from_grid(grid: Grid<i32>, bin_center: Vector2) -> Result<Self, ScreenError> {
        let (width, height) = (grid.width(), grid.height());
        let thresholds = grid
            .into_vec()
            .into_iter()
            .map(|v| {
                u16::try_from(v).map_err(|_| {
                    ScreenError::InternalConsistency(format!("threshold {v} out of range"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            width,
            height,
            bin_center,
            data: MaskData::Thresholds(thresholds),
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tie-break reference of the turn-on sequence.
    #[inline]
    pub fn bin_center(&self) -> Vector2 {
        self.bin_center
    }

    #[inline]
    pub fn data(&self) -> &MaskData {
        &self.data
    }

    /// Thresholds, if this mask has not been converted to a sequence.
    pub fn thresholds(&self) -> Option<&[u16]> {
        match &self.data {
            MaskData::Thresholds(t) => Some(t.as_slice()),
            MaskData::TurnOnSequence(_) => None,
        }
    }

    /// Turn-on sequence, if this mask has been converted.
    pub fn sequence(&self) -> Option<&[(u32, u32)]> {
        match &self.data {
            MaskData::TurnOnSequence(s) => Some(s.as_slice()),
            MaskData::Thresholds(_) => None,
        }
    }

    /// The sequence flattened to `x0, y0, x1, y1, ...`.
    pub fn interleaved_sequence(&self) -> Option<Vec<u32>> {
        self.sequence()
            .map(|s| s.iter().flat_map(|&(x, y)| [x, y]).collect())
    }
}
