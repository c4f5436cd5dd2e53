//! Test fixtures and constants.

/// Preset file exercising every preset field
pub const PRESETS_YAML: &str = r#"
screens:
  coarse:
    angle: 15
    lpi: 75
    dpi: 300
  brick:
    angle: 15
    lpi: 75
    dpi: 300
    holladay: true
  diagonal:
    angle: 45
    lpi: 60
    dpi: 300
    spot: round-spot
  dithered:
    angle: 0
    lpi: 70
    dpi: 300
    quantization: 48
    size: 16
    seed: 3
  anisotropic:
    angle: 15
    lpi: 75
    hdpi: 600
    vdpi: 300
default_screen: coarse
"#;

/// Preset names defined in `PRESETS_YAML`
pub mod presets {
    pub const COARSE: &str = "coarse";
    pub const BRICK: &str = "brick";
    pub const DIAGONAL: &str = "diagonal";
    pub const DITHERED: &str = "dithered";
    pub const ANISOTROPIC: &str = "anisotropic";
}
