//! Small-integer lattice math shared by every screen construction stage.
//!
//! The screen generator works on integer lattices described by two basis
//! vectors `(x, y)` and `(u, v)`, so it needs only a handful of primitives:
//! a 2x2 matrix with inverse and matrix-vector product, integer GCD/LCM,
//! and the half-away-from-zero rounding the construction was tuned with.

mod lattice;
mod matrix;

pub use lattice::{gcd, lcm, round_half_away};
pub use matrix::{Matrix2, Vector2};
