//! Integer helpers for lattice sizing.

/// Round half away from zero and truncate to `i64`.
///
/// `2.5 -> 3`, `-2.5 -> -3`, `-0.4 -> 0`.
#[inline]
pub fn round_half_away(value: f64) -> i64 {
    if value < 0.0 {
        (value - 0.5) as i64
    } else {
        (value + 0.5) as i64
    }
}

/// Greatest common divisor of two integers.
///
/// `gcd(0, 0)` is 0; a zero argument returns the other one. Callers pass
/// absolute values when the sign matters.
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a, b);
    if a == 0 {
        return b;
    }
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple, or `None` when both arguments are zero.
pub fn lcm(a: i64, b: i64) -> Option<i64> {
    let g = gcd(a, b);
    if g == 0 {
        return None;
    }
    Some(a / g * b)
}
