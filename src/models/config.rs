use crate::assets::AssetLoader;
use crate::error::ConfigError;
use ordered_screen::{ScreenParams, SpotFunction};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Preset configuration loaded from screens.yaml
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Named screen presets
    #[serde(default)]
    pub screens: BTreeMap<String, ScreenConfig>,

    /// Preset used when none is named on the command line
    #[serde(default)]
    pub default_screen: Option<String>,
}

/// One screen preset. Every field is optional; unset fields keep the
/// generator defaults.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ScreenConfig {
    /// Screen angle in degrees
    pub angle: Option<f64>,

    /// Target lines per inch
    pub lpi: Option<f64>,

    /// Sets both resolutions; `hdpi`/`vdpi` win over it
    pub dpi: Option<f64>,
    pub hdpi: Option<f64>,
    pub vdpi: Option<f64>,

    /// Spot function name, e.g. `round-spot`
    pub spot: Option<String>,

    /// Requested gray levels
    pub quantization: Option<u32>,

    /// Minimum supercell side in pixels
    pub size: Option<u32>,

    pub holladay: Option<bool>,
    pub gamma: Option<f64>,

    /// Seed for the random dot draw of dithered screens
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Load presets from the AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Result<Self, ConfigError> {
        let content = loader.read_config_string()?;
        let config: Self = serde_yaml::from_str(&content)?;
        tracing::debug!(
            screens = config.screens.len(),
            source = %loader.source(),
            "Loaded presets"
        );
        Ok(config)
    }

    /// Get the preset with the given name, or the default preset
    ///
    /// With no name and no `default_screen`, an empty preset is returned.
    pub fn resolve(&self, name: Option<&str>) -> Result<ScreenConfig, ConfigError> {
        let Some(name) = name.or(self.default_screen.as_deref()) else {
            return Ok(ScreenConfig::default());
        };
        self.screens
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }
}

impl ScreenConfig {
    /// Overlay the fields set in `other` onto this preset
    pub fn merge(mut self, other: &ScreenConfig) -> Self {
        // An explicit dpi on top resets resolutions inherited from below.
        if other.dpi.is_some() {
            self.hdpi = None;
            self.vdpi = None;
        }
        self.angle = other.angle.or(self.angle);
        self.lpi = other.lpi.or(self.lpi);
        self.dpi = other.dpi.or(self.dpi);
        self.hdpi = other.hdpi.or(self.hdpi);
        self.vdpi = other.vdpi.or(self.vdpi);
        self.spot = other.spot.clone().or(self.spot);
        self.quantization = other.quantization.or(self.quantization);
        self.size = other.size.or(self.size);
        self.holladay = other.holladay.or(self.holladay);
        self.gamma = other.gamma.or(self.gamma);
        self.seed = other.seed.or(self.seed);
        self
    }

    /// Turn the preset into generator parameters
    pub fn to_params(&self) -> Result<ScreenParams, ConfigError> {
        let mut params = ScreenParams::new();

        if let Some(angle) = self.angle {
            params = params.angle(angle);
        }
        if let Some(lpi) = self.lpi {
            params = params.lpi(positive("lpi", lpi)?);
        }
        if let Some(dpi) = self.dpi {
            params = params.dpi(positive("dpi", dpi)?);
        }
        if let Some(hdpi) = self.hdpi {
            params = params.hdpi(positive("hdpi", hdpi)?);
        }
        if let Some(vdpi) = self.vdpi {
            params = params.vdpi(positive("vdpi", vdpi)?);
        }
        if let Some(ref spot) = self.spot {
            let spot: SpotFunction = spot.parse().map_err(|e| ConfigError::InvalidValue {
                field: "spot",
                message: format!("{e}"),
            })?;
            params = params.spot(spot);
        }
        if let Some(levels) = self.quantization {
            if levels == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "quantization",
                    message: "must be at least 1".to_string(),
                });
            }
            params = params.quantization(levels);
        }
        if let Some(size) = self.size {
            params = params.size(size);
        }
        if let Some(holladay) = self.holladay {
            params = params.holladay(holladay);
        }
        if let Some(gamma) = self.gamma {
            params = params.gamma(positive("gamma", gamma)?);
        }
        if let Some(seed) = self.seed {
            params = params.seed(seed);
        }

        Ok(params)
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            field,
            message: format!("{value} is not a positive number"),
        })
    }
}
