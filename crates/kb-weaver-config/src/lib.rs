use std::path::{Path, PathBuf};

use kb_weaver_engine::sync::Theme;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file at {settings_path}: {source}")]
    SettingsReadError {
        settings_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file at {settings_path}: {source}")]
    SettingsParseError {
        settings_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Editor theme; applied when the editor surface is (re)built.
    pub theme: Theme,
    /// Where saved article markdown lands.
    pub articles_path: PathBuf,
    /// Quiescence window before a quality-scoring request, in milliseconds.
    pub quality_debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            articles_path: PathBuf::from("~/.local/share/kb-weaver/articles"),
            quality_debounce_ms: 500,
        }
    }
}

impl Settings {
    pub fn load_from_path<P: AsRef<Path>>(settings_path: P) -> Result<Option<Self>, SettingsError> {
        let settings_path = settings_path.as_ref();
        if !settings_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(settings_path).map_err(|source| {
            SettingsError::SettingsReadError {
                settings_path: settings_path.to_path_buf(),
                source,
            }
        })?;

        let mut settings: Settings =
            toml::from_str(&content).map_err(|source| SettingsError::SettingsParseError {
                settings_path: settings_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the configured articles path
        settings.articles_path =
            Self::expand_path(&settings.articles_path).unwrap_or(settings.articles_path);

        Ok(Some(settings))
    }

    pub fn load() -> Result<Option<Self>, SettingsError> {
        let settings_path = Self::settings_path();
        Self::load_from_path(&settings_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, settings_path: P) -> anyhow::Result<()> {
        let settings_path = settings_path.as_ref();
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(settings_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let settings_path = Self::settings_path();
        self.save_to_path(&settings_path)
    }

    pub fn settings_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/kb-weaver");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn settings_path_is_expanded() {
        let settings_path = Settings::settings_path();
        let path_str = settings_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/kb-weaver/config.toml"));
    }

    #[test]
    fn serialization_round_trip() {
        let original = Settings {
            theme: Theme::Dark,
            articles_path: PathBuf::from("/tmp/articles"),
            quality_debounce_ms: 250,
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Settings = toml::from_str(&toml_str).unwrap();

        assert_eq!(deserialized.theme, Theme::Dark);
        assert_eq!(deserialized.articles_path, original.articles_path);
        assert_eq!(deserialized.quality_debounce_ms, 250);
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let loaded = Settings::load_from_path(dir.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn save_then_load_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");

        let settings = Settings {
            theme: Theme::Dark,
            articles_path: PathBuf::from("/srv/articles"),
            quality_debounce_ms: 750,
        };
        settings.save_to_path(&path).unwrap();

        let loaded = Settings::load_from_path(&path).unwrap().unwrap();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.articles_path, PathBuf::from("/srv/articles"));
        assert_eq!(loaded.quality_debounce_ms, 750);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = \"dark\"\n").unwrap();

        let loaded = Settings::load_from_path(&path).unwrap().unwrap();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.quality_debounce_ms, 500);
    }

    #[test]
    fn malformed_toml_reports_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = [not toml").unwrap();

        let err = Settings::load_from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::SettingsParseError { .. }));
    }

    #[test]
    fn tilde_in_articles_path_is_expanded_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "articles_path = \"~/kb\"\n").unwrap();

        let loaded = Settings::load_from_path(&path).unwrap().unwrap();
        assert!(!loaded.articles_path.to_string_lossy().starts_with('~'));
    }
}
