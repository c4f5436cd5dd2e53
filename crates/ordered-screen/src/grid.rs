//! Row-major 2-D grids with a single backing allocation.
//!
//! Every stage of the generator (dot mask, dot-order grid, supercell, final
//! mask, dither bitmap, blur buffer) stores its data in a [`Grid`]. The grid
//! owns one contiguous `Vec`, allocated fallibly so that an oversized screen
//! request surfaces as [`ScreenError::OutOfMemory`] instead of aborting.

use crate::api::ScreenError;

/// A `width x height` grid stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Allocate a grid filled with `fill`.
    pub fn try_new(width: usize, height: usize, fill: T) -> Result<Self, ScreenError> {
        let data = try_filled_vec(width, height, fill)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, ScreenError> {
        if data.len() != width * height {
            return Err(ScreenError::grid(format!(
                "buffer of {} values cannot back a {}x{} grid",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
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

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Value at signed coordinates, or `None` outside the grid.
    #[inline]
    pub fn get_signed(&self, x: i64, y: i64) -> Option<T> {
        if x < 0 || y < 0 {
            return None;
        }
        self.get(x as usize, y as usize)
    }

    /// Value at `(x, y)`. Debug-asserts the coordinates are in range.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) outside grid");
        self.data[y * self.width + x]
    }

    /// Store `value` at `(x, y)`. Debug-asserts the coordinates are in range.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) outside grid");
        self.data[y * self.width + x] = value;
    }

    /// Flat row-major index of `(x, y)`.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Coordinates of a flat row-major index.
    #[inline]
    pub fn index_to_xy(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|v| *v = value);
    }
}

impl<T: Copy + PartialEq> Grid<T> {
    /// Number of cells equal to `value`.
    pub fn count_eq(&self, value: T) -> usize {
        self.data.iter().filter(|&&v| v == value).count()
    }
}

/// Allocate a `width * height` vector filled with `fill`, reporting failure.
pub(crate) fn try_filled_vec<T: Copy>(
    width: usize,
    height: usize,
    fill: T,
) -> Result<Vec<T>, ScreenError> {
    let count = width.checked_mul(height).ok_or(ScreenError::OutOfMemory {
        bytes: usize::MAX,
    })?;
    try_vec(count, fill)
}

/// Allocate a vector of `count` copies of `fill`, reporting failure.
pub(crate) fn try_vec<T: Copy>(count: usize, fill: T) -> Result<Vec<T>, ScreenError> {
    let bytes = count.saturating_mul(std::mem::size_of::<T>());
    let mut data = Vec::new();
    data.try_reserve_exact(count)
        .map_err(|_| ScreenError::OutOfMemory { bytes })?;
    data.resize(count, fill);
    Ok(data)
}
