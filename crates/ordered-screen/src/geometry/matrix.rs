//! 2x2 matrices and 2-vectors in double precision.

use std::ops::Mul;

/// A 2-vector of doubles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A row-major 2x2 matrix `[[a, b], [c, d]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Matrix2 {
    #[inline]
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse of the matrix, or `None` when the determinant is exactly zero.
    ///
    /// Only an exact zero is rejected: the lattice matrices are built from
    /// small integers, so a nonzero determinant is never close to zero.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
        })
    }

    #[inline]
    pub fn mul_vec(&self, v: Vector2) -> Vector2 {
        Vector2 {
            x: self.a * v.x + self.b * v.y,
            y: self.c * v.x + self.d * v.y,
        }
    }
}

impl Mul<Vector2> for Matrix2 {
    type Output = Vector2;

    #[inline]
    fn mul(self, rhs: Vector2) -> Vector2 {
        self.mul_vec(rhs)
    }
}

impl Mul for Matrix2 {
    type Output = Matrix2;

    fn mul(self, rhs: Matrix2) -> Matrix2 {
        Matrix2 {
            a: self.a * rhs.a + self.b * rhs.c,
            b: self.a * rhs.b + self.b * rhs.d,
            c: self.c * rhs.a + self.d * rhs.c,
            d: self.c * rhs.b + self.d * rhs.d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_times_matrix_is_identity() {
        let m = Matrix2::new(4.0, 1.0, -1.0, 4.0);
        let inv = m.inverse().unwrap();
        let id = m * inv;
        assert!((id.a - 1.0).abs() < 1e-12);
        assert!(id.b.abs() < 1e-12);
        assert!(id.c.abs() < 1e-12);
        assert!((id.d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_matrix_has_no_inverse() {
        let m = Matrix2::new(2.0, 4.0, 1.0, 2.0);
        assert_eq!(m.determinant(), 0.0);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_mul_vec() {
        let m = Matrix2::new(1.0, 2.0, 3.0, 4.0);
        let v = m * Vector2::new(1.0, -1.0);
        assert_eq!(v, Vector2::new(-1.0, -1.0));
    }
}
