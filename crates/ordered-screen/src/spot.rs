//! Spot functions: the dot shape of a halftone cell.
//!
//! A spot function maps a point of the normalized cell `[-1, 1]²` to a
//! growth priority. The growth-order solver turns pixels on in decreasing
//! priority, so the level sets of the function are the dot outlines as the
//! dot grows from the cell center to full coverage.
//!
//! | Name | Shape |
//! |------|-------|
//! | `circle` | `1 - (x² + y²)` |
//! | `redbook` | `(180 cos x + 180 cos y) / 2` |
//! | `inverted-round` | `(x² + y²) - 1` (grows from the corners) |
//! | `rhomboid` | `1 - (0.8 abs(y) + abs(x)) / 2` |
//! | `line-x` | `1 - abs(y)` |
//! | `line-y` | `1 - abs(x)` |
//! | `diamond1` | circle, then rhomboid, then inverted corner, by `abs(x) + abs(y)` |
//! | `diamond2` | smooth diamond |
//! | `round-spot` | circle inside the diamond, inverted corner outside |
//! | `custom` | currently the circle |

use std::fmt;
use std::str::FromStr;

/// Selectable dot shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpotFunction {
    #[default]
    Circle,
    Redbook,
    InvertedRound,
    Rhomboid,
    LineX,
    LineY,
    Diamond1,
    Diamond2,
    RoundSpot,
    /// Extension point for a user-defined shape. Evaluates as [`SpotFunction::Circle`].
    Custom,
}

impl SpotFunction {
    /// Every spot function, in display order.
    pub const ALL: [SpotFunction; 10] = [
        SpotFunction::Circle,
        SpotFunction::Redbook,
        SpotFunction::InvertedRound,
        SpotFunction::Rhomboid,
        SpotFunction::LineX,
        SpotFunction::LineY,
        SpotFunction::Diamond1,
        SpotFunction::Diamond2,
        SpotFunction::RoundSpot,
        SpotFunction::Custom,
    ];

    /// Canonical name used in configuration files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            SpotFunction::Circle => "circle",
            SpotFunction::Redbook => "redbook",
            SpotFunction::InvertedRound => "inverted-round",
            SpotFunction::Rhomboid => "rhomboid",
            SpotFunction::LineX => "line-x",
            SpotFunction::LineY => "line-y",
            SpotFunction::Diamond1 => "diamond1",
            SpotFunction::Diamond2 => "diamond2",
            SpotFunction::RoundSpot => "round-spot",
            SpotFunction::Custom => "custom",
        }
    }

    /// Growth priority at normalized cell coordinates `(x, y)` in `[-1, 1]`.
    #[inline]
    pub fn value(self, x: f64, y: f64) -> f64 {
        match self {
            SpotFunction::Circle | SpotFunction::Custom => circle(x, y),
            SpotFunction::Redbook => (180.0 * x.cos() + 180.0 * y.cos()) / 2.0,
            SpotFunction::InvertedRound => (x * x + y * y) - 1.0,
            SpotFunction::Rhomboid => 1.0 - (y.abs() * 0.8 + x.abs()) / 2.0,
            SpotFunction::LineX => 1.0 - y.abs(),
            SpotFunction::LineY => 1.0 - x.abs(),
            SpotFunction::Diamond1 => diamond1(x, y),
            SpotFunction::Diamond2 => diamond2(x, y),
            SpotFunction::RoundSpot => round_spot(x, y),
        }
    }
}

#[inline]
fn circle(x: f64, y: f64) -> f64 {
    1.0 - (x * x + y * y)
}

/// Inverted distance to the nearest cell corner.
#[inline]
fn corner(abs_x: f64, abs_y: f64) -> f64 {
    (abs_x - 1.0) * (abs_x - 1.0) + (abs_y - 1.0) * (abs_y - 1.0) - 1.0
}

fn diamond1(x: f64, y: f64) -> f64 {
    let abs_x = x.abs();
    let abs_y = y.abs();
    let sum = abs_x + abs_y;

    if sum <= 0.75 {
        1.0 - (abs_x * abs_x + abs_y * abs_y)
    } else if sum <= 1.23 {
        1.0 - (0.76 * abs_y + abs_x)
    } else {
        corner(abs_x, abs_y)
    }
}

fn diamond2(x: f64, y: f64) -> f64 {
    let xy = x.abs() + y.abs();
    if xy <= 1.0 {
        1.0 - xy * xy / 2.0
    } else {
        1.0 - (2.0 * xy * xy - 4.0 * (xy - 1.0) * (xy - 1.0)) / 4.0
    }
}

fn round_spot(x: f64, y: f64) -> f64 {
    let abs_x = x.abs();
    let abs_y = y.abs();
    if abs_x + abs_y <= 1.0 {
        circle(x, y)
    } else {
        corner(abs_x, abs_y)
    }
}

impl fmt::Display for SpotFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a spot function name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown spot function '{0}'")]
pub struct UnknownSpotFunction(pub String);

impl FromStr for SpotFunction {
    type Err = UnknownSpotFunction;

    /// Parse a spot name. Case, `_` and `-` are ignored, so `ROUND_SPOT`,
    /// `roundspot` and `round-spot` are equivalent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let spot = match key.as_str() {
            "circle" => SpotFunction::Circle,
            "redbook" => SpotFunction::Redbook,
            "invertedround" | "inverted" => SpotFunction::InvertedRound,
            "rhomboid" => SpotFunction::Rhomboid,
            "linex" => SpotFunction::LineX,
            "liney" => SpotFunction::LineY,
            "diamond1" | "diamond" => SpotFunction::Diamond1,
            "diamond2" => SpotFunction::Diamond2,
            "roundspot" => SpotFunction::RoundSpot,
            "custom" => SpotFunction::Custom,
            _ => return Err(UnknownSpotFunction(s.to_string())),
        };
        Ok(spot)
    }
}
