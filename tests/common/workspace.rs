//! Temporary directory with a preset file, driving the same steps as the CLI.

use htscreen::assets::AssetLoader;
use htscreen::models::{AppConfig, ScreenConfig};
use htscreen::rendering::{default_file_name, encode, ScreenFormat};
use ordered_screen::{generate_ordered_screen, GeneratedScreen};
use std::path::PathBuf;
use tempfile::TempDir;

use super::fixtures::PRESETS_YAML;

pub struct TestWorkspace {
    pub dir: TempDir,
    pub config_path: PathBuf,
}

impl TestWorkspace {
    /// Create a workspace with the fixture presets
    pub fn new() -> Self {
        Self::with_presets(PRESETS_YAML)
    }

    pub fn with_presets(yaml: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = dir.path().join("screens.yaml");
        std::fs::write(&config_path, yaml).expect("Failed to write presets");
        Self { dir, config_path }
    }

    pub fn loader(&self) -> AssetLoader {
        AssetLoader::new(Some(self.config_path.clone()))
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::load_from_assets(&self.loader()).expect("Failed to load presets")
    }

    /// Resolve a preset, apply overrides and generate the screen
    pub fn generate(
        &self,
        preset: Option<&str>,
        overrides: &ScreenConfig,
        format: ScreenFormat,
        sequence: bool,
    ) -> GeneratedScreen {
        let params = self
            .config()
            .resolve(preset)
            .expect("Unknown preset")
            .merge(overrides)
            .to_params()
            .expect("Invalid preset")
            .output_format(format.data_shape(sequence).expect("Bad format"));
        generate_ordered_screen(&params).expect("Generation failed")
    }

    /// Encode a screen and write it under its default file name
    pub fn write(&self, screen: &GeneratedScreen, format: ScreenFormat) -> PathBuf {
        let bytes = encode(screen, format).expect("Encoding failed");
        let path = self.dir.path().join(default_file_name(screen, format));
        std::fs::write(&path, bytes).expect("Failed to write screen");
        path
    }
}
