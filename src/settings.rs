use crate::anim::mapper::MappingMode;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_FPS: u32 = 30;
pub const MIN_FPS: u32 = 10;
pub const MAX_FPS: u32 = 120;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fps: u32,
    pub seed: Option<u64>,
    /// Entry id shown at startup
    pub start: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub presets_path: Option<PathBuf>,
    pub composite: CompositeSettings,
    pub mandelbrot: MandelbrotSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompositeSettings {
    /// Overrides every fusion's strength when set
    pub strength: Option<f64>,
    /// Overrides every fusion's mapping when set
    pub mapping: Option<MappingMode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MandelbrotSettings {
    pub deep_zoom: bool,
    pub zoom_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            seed: None,
            start: None,
            log_file: None,
            log_level: None,
            presets_path: None,
            composite: CompositeSettings::default(),
            mandelbrot: MandelbrotSettings::default(),
        }
    }
}

impl Default for MandelbrotSettings {
    fn default() -> Self {
        Self {
            deep_zoom: true,
            zoom_threshold: 10.0,
        }
    }
}

impl Settings {
    /// Load from the default location, falling back to defaults on any problem
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(%err, "ignoring settings file");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let settings: Self = toml::from_str(&content).map_err(|source| Error::SettingsParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(settings)
    }

    pub fn fps(&self) -> u32 {
        self.fps.clamp(MIN_FPS, MAX_FPS)
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termfuse")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn presets_path(&self) -> PathBuf {
        self.presets_path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("presets.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.fps, DEFAULT_FPS);
        assert!(settings.mandelbrot.deep_zoom);
        assert!(settings.composite.mapping.is_none());
    }

    #[test]
    fn parses_nested_tables() {
        let settings: Settings = toml::from_str(
            r#"
            fps = 500
            start = "fluid-spiral"

            [composite]
            strength = 1.5
            mapping = "quadratic"

            [mandelbrot]
            deep_zoom = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.fps(), MAX_FPS);
        assert_eq!(settings.start.as_deref(), Some("fluid-spiral"));
        assert_eq!(settings.composite.strength, Some(1.5));
        assert_eq!(settings.composite.mapping, Some(MappingMode::Quadratic));
        assert!(!settings.mandelbrot.deep_zoom);
        assert_eq!(settings.mandelbrot.zoom_threshold, 10.0);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("termfuse-settings-{}.toml", std::process::id()));
        fs::write(&path, "fps = \"fast\"").unwrap();
        let result = Settings::load_from(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(Error::SettingsParse { .. })));
    }
}
