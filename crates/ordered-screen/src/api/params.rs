//! Screen parameters.

use super::ScreenError;
use crate::spot::SpotFunction;

/// Shape of the returned mask data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Row-major thresholds.
    ThresholdGrid,
    /// Pixel coordinates in turn-on order.
    #[default]
    TurnOnSequence,
}

/// Everything [`generate_ordered_screen`](super::generate_ordered_screen)
/// needs to build one screen.
///
/// # Defaults
///
/// - angle 0°, 75 lpi, 300 × 300 dpi, circle spot
/// - no quantization or supercell size requested
/// - Holladay mode off, gamma 1.0, turn-on-sequence output
///
/// # Example
///
/// ```
/// use ordered_screen::{OutputFormat, ScreenParams, SpotFunction};
///
/// let params = ScreenParams::new()
///     .angle(15.0)
///     .lpi(75.0)
///     .dpi(300.0)
///     .spot(SpotFunction::Circle)
///     .output_format(OutputFormat::ThresholdGrid);
///
/// assert_eq!(params.hdpi, 300.0);
/// assert!(!params.quantization_specified);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenParams {
    /// Screen angle in degrees; wrapped into `[0, 90)`.
    pub angle: f64,
    /// Target screen frequency in lines per inch.
    pub lpi: f64,
    pub hdpi: f64,
    pub vdpi: f64,
    pub spot: SpotFunction,
    /// Requested number of gray levels.
    ///
    /// Only used when [`quantization_specified`](Self::quantization_specified)
    /// is set.
    pub quantization: u32,
    pub quantization_specified: bool,
    /// Requested minimum supercell side in pixels.
    ///
    /// Only used when [`size_specified`](Self::size_specified) is set.
    pub size: u32,
    pub size_specified: bool,
    /// Emit only the Holladay brick, with no dithering.
    pub holladay: bool,
    /// Exponent applied to normalized thresholds.
    pub gamma: f64,
    pub output_format: OutputFormat,
    /// Seed for the dithered branch's random dot draw.
    pub seed: Option<u64>,
    /// Values above 0 log the lattice search and dot positions.
    pub verbose: u8,
}

impl Default for ScreenParams {
    fn default() -> Self {
        Self {
            angle: 0.0,
            lpi: 75.0,
            hdpi: 300.0,
            vdpi: 300.0,
            spot: SpotFunction::Circle,
            quantization: 256,
            quantization_specified: false,
            size: 1,
            size_specified: false,
            holladay: false,
            gamma: 1.0,
            output_format: OutputFormat::TurnOnSequence,
            seed: None,
            verbose: 0,
        }
    }
}

impl ScreenParams {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn angle(mut self, degrees: f64) -> Self {
        self.angle = degrees;
        self
    }

    #[inline]
    pub fn lpi(mut self, lpi: f64) -> Self {
        self.lpi = lpi;
        self
    }

    /// Set both resolutions.
    #[inline]
    pub fn dpi(mut self, dpi: f64) -> Self {
        self.hdpi = dpi;
        self.vdpi = dpi;
        self
    }

    #[inline]
    pub fn hdpi(mut self, dpi: f64) -> Self {
        self.hdpi = dpi;
        self
    }

    #[inline]
    pub fn vdpi(mut self, dpi: f64) -> Self {
        self.vdpi = dpi;
        self
    }

    #[inline]
    pub fn spot(mut self, spot: SpotFunction) -> Self {
        self.spot = spot;
        self
    }

    /// Request a number of gray levels.
    #[inline]
    pub fn quantization(mut self, levels: u32) -> Self {
        self.quantization = levels;
        self.quantization_specified = true;
        self
    }

    /// Request a minimum supercell size.
    #[inline]
    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self.size_specified = true;
        self
    }

    #[inline]
    pub fn holladay(mut self, enabled: bool) -> Self {
        self.holladay = enabled;
        self
    }

    #[inline]
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    #[inline]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// The angle wrapped into `[0, 90)`.
    pub fn wrapped_angle(&self) -> f64 {
        self.angle.rem_euclid(90.0)
    }

    /// Check the numeric parameters.
    pub fn validate(&self) -> Result<(), ScreenError> {
        positive("lpi", self.lpi)?;
        positive("hdpi", self.hdpi)?;
        positive("vdpi", self.vdpi)?;
        positive("gamma", self.gamma)?;
        if !self.angle.is_finite() {
            return Err(ScreenError::InvalidParameter(format!(
                "angle must be finite, got {}",
                self.angle
            )));
        }
        if self.quantization_specified && self.quantization == 0 {
            return Err(ScreenError::InvalidParameter(
                "quantization must be at least 1".to_string(),
            ));
        }
        if self.size_specified && self.size == 0 {
            return Err(ScreenError::InvalidParameter(
                "supercell size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<(), ScreenError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScreenError::InvalidParameter(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}
