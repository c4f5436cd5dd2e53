//! Error and warning types for screen generation.

use thiserror::Error;

/// Fatal failures of [`generate_ordered_screen`](crate::generate_ordered_screen).
///
/// Each stage of the pipeline checks its numeric preconditions explicitly and
/// reports a violation here instead of panicking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreenError {
    /// A lattice matrix has a zero determinant.
    #[error("singular matrix: {0}")]
    SingularMatrix(&'static str),

    /// The lattice does not produce a consistent grid.
    #[error("grid construction failed: {reason}")]
    GridConstruction { reason: String },

    /// A working buffer could not be allocated.
    #[error("out of memory allocating {bytes} bytes")]
    OutOfMemory { bytes: usize },

    /// Dot bookkeeping of the dithered branch lost track of a dot.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),

    /// A parameter is outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ScreenError {
    pub(crate) fn grid(reason: impl Into<String>) -> Self {
        ScreenError::GridConstruction {
            reason: reason.into(),
        }
    }
}

/// Non-fatal conditions noticed while building a screen.
///
/// Warnings never change the returned mask beyond what is described on the
/// variant; they are logged and handed back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenWarning {
    /// Even the coarsest lattice step is below the requested LPI.
    LpiNotAchievable { target: f64, best: f64 },
    /// The chosen lattice is the first candidate; finer steps undershoot.
    LpiAtMaximum { lpi: f64 },
    /// The chosen lattice runs slightly below the requested LPI.
    LpiBelowTarget { target: f64, achieved: f64 },
    /// Extra quantization levels were requested without a supercell size.
    SupercellTooSmall {
        requested: u32,
        minimum_size: u32,
        levels: u32,
    },
    /// The supercell cannot hold the requested number of dither levels.
    QuantizationReduced { from: u32, to: u32, effective: u32 },
    /// Level-0 dot relocation stopped at its pass limit before settling.
    RelocationCapped { passes: usize },
}

impl std::fmt::Display for ScreenWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenWarning::LpiNotAchievable { target, best } => write!(
                f,
                "{target} lpi is not achievable (best {best:.1}); screen will be poorly quantized or stochastic"
            ),
            ScreenWarning::LpiAtMaximum { lpi } => write!(
                f,
                "lpi is at the maximum level possible ({lpi:.1}); this may result in poor quantization"
            ),
            ScreenWarning::LpiBelowTarget { target, achieved } => write!(
                f,
                "lpi will be slightly lower than target ({achieved:.1} < {target})"
            ),
            ScreenWarning::SupercellTooSmall {
                requested,
                minimum_size,
                levels,
            } => write!(
                f,
                "{requested} quantization levels need a supercell size of at least {minimum_size}; \
                 creating the minimal screen with {levels} levels"
            ),
            ScreenWarning::QuantizationReduced {
                from,
                to,
                effective,
            } => write!(
                f,
                "{from} dither levels do not fit the supercell; reduced to {to} \
                 (effective quantization {effective})"
            ),
            ScreenWarning::RelocationCapped { passes } => write!(
                f,
                "dot relocation stopped after {passes} passes without settling"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ScreenError::SingularMatrix("cell basis").to_string(),
            "singular matrix: cell basis"
        );
        assert_eq!(
            ScreenError::grid("dot mask has 16 cells, expected 17").to_string(),
            "grid construction failed: dot mask has 16 cells, expected 17"
        );
        assert_eq!(
            ScreenError::OutOfMemory { bytes: 64 }.to_string(),
            "out of memory allocating 64 bytes"
        );
    }

    #[test]
    fn test_warning_display() {
        let w = ScreenWarning::QuantizationReduced {
            from: 40,
            to: 3,
            effective: 68,
        };
        assert_eq!(
            w.to_string(),
            "40 dither levels do not fit the supercell; reduced to 3 (effective quantization 68)"
        );
    }
}
