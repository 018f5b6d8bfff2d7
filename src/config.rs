use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
/// Persisted UI/application settings for Floorplan.
pub struct AppConfig {
    pub window_width: Option<f32>,
    pub window_height: Option<f32>,
    /// Directory the open dialog starts in; updated after each open.
    pub open_dir: Option<PathBuf>,
    /// Opened instead of showing the dialog, for scripted runs.
    pub test_image: Option<PathBuf>,
    pub preview_max_edge: Option<u32>,
}

impl AppConfig {
    /// Returns the user config file path, if a config directory is available.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("floorplan").join("config.toml"))
    }

    /// Loads config from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let Ok(contents) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        Self::parse(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), "ignoring unreadable config: {err}");
            Self::default()
        })
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Writes config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path().context("no config directory available")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self)?;
        std::fs::write(&path, s).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::AppConfig;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert!(config.window_width.is_none());
        assert!(config.test_image.is_none());
    }

    #[test]
    fn parses_known_keys() {
        let config = AppConfig::parse(
            r#"
window_width = 1024.0
open_dir = "/plans"
preview_max_edge = 4096
"#,
        )
        .unwrap();
        assert_eq!(config.window_width, Some(1024.0));
        assert_eq!(config.open_dir, Some(PathBuf::from("/plans")));
        assert_eq!(config.preview_max_edge, Some(4096));
    }

    #[test]
    fn serialized_config_parses_back() {
        let config = AppConfig {
            window_height: Some(700.0),
            test_image: Some(PathBuf::from("tests/floorplan.jpg")),
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back = AppConfig::parse(&text).unwrap();
        assert_eq!(back.window_height, Some(700.0));
        assert_eq!(back.test_image, config.test_image);
    }
}
