//! Preset loading with an embedded fallback
//!
//! - If no external file is configured: use the embedded presets only
//! - If an external file is configured and exists: use it
//! - If an external file is configured but missing: fall back to embedded presets

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded default presets
#[derive(RustEmbed)]
#[folder = "presets/"]
#[include = "*.yaml"]
struct EmbeddedPresets;

const PRESET_FILE: &str = "screens.yaml";

/// Environment variable naming an external preset file
pub const CONFIG_ENV: &str = "HTSCREEN_CONFIG";

/// Where the active preset file came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for PresetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetSource::Embedded => f.write_str("embedded presets"),
            PresetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Preset loader with optional filesystem override
pub struct AssetLoader {
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a loader. `None` means embedded presets only.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self { config_file }
    }

    /// Create a loader from an explicit path, or from `HTSCREEN_CONFIG` if unset
    pub fn from_env(explicit: Option<PathBuf>) -> Self {
        let config_file = explicit.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        Self::new(config_file)
    }

    /// The source `read_config` will use
    pub fn source(&self) -> PresetSource {
        match self.config_file {
            Some(ref path) if path.exists() => PresetSource::File(path.clone()),
            _ => PresetSource::Embedded,
        }
    }

    /// Read the preset file
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading presets from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
            tracing::warn!(path = %path.display(), "Preset file not found, using embedded presets");
        }

        EmbeddedPresets::get(PRESET_FILE)
            .map(|f| {
                tracing::trace!("Loading presets from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Embedded {PRESET_FILE} not found"),
                )
            })
    }

    /// Read the preset file as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write the embedded preset file to `path` so it can be customized
    pub fn extract_default(path: &Path, force: bool) -> io::Result<bool> {
        if !force && path.exists() {
            return Ok(false);
        }
        let data = EmbeddedPresets::get(PRESET_FILE).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("Embedded {PRESET_FILE} not found"),
            )
        })?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, &*data.data)?;
        tracing::info!(path = %path.display(), "Wrote default presets");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_presets_present() {
        let loader = AssetLoader::new(None);
        let content = loader.read_config_string().unwrap();
        assert!(content.contains("screens:"));
        assert_eq!(loader.source(), PresetSource::Embedded);
    }

    #[test]
    fn test_missing_file_falls_back_to_embedded() {
        let loader = AssetLoader::new(Some(PathBuf::from("/nonexistent/presets.yaml")));
        assert_eq!(loader.source(), PresetSource::Embedded);
        assert!(loader.read_config_string().is_ok());
    }

    #[test]
    fn test_external_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.yaml");
        fs::write(&path, "screens: {}\n").unwrap();

        let loader = AssetLoader::new(Some(path.clone()));
        assert_eq!(loader.source(), PresetSource::File(path));
        assert_eq!(loader.read_config_string().unwrap(), "screens: {}\n");
    }

    #[test]
    fn test_extract_default_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("screens.yaml");

        assert!(AssetLoader::extract_default(&path, false).unwrap());
        fs::write(&path, "changed").unwrap();
        assert!(!AssetLoader::extract_default(&path, false).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "changed");
        assert!(AssetLoader::extract_default(&path, true).unwrap());
        assert!(fs::read_to_string(&path).unwrap().contains("screens:"));
    }
}
