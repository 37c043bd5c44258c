use serde::Deserialize;
use std::path::{Path, PathBuf};

/// User configuration, loaded from `~/.lector/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct LectorConfig {
    pub app: Option<AppConfig>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Display-refresh cadence in milliseconds. Default: 500. Zero is
    /// rejected at load time and falls back to the default.
    pub tick_interval_ms: Option<u64>,
    /// Use ASCII-only glyphs for the spinner and markers.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

impl LectorConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        Self::load_from(&path)
    }

    /// Load from an explicit path. `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".lector").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::{LectorConfig, ConfigError};

    #[test]
    fn parse_empty_config() {
        let config: LectorConfig = toml::from_str("").unwrap();
        assert!(config.app.is_none());
    }

    #[test]
    fn parse_app_config() {
        let toml_str = r"
[app]
tick_interval_ms = 250
ascii_only = true
high_contrast = false
";
        let config: LectorConfig = toml::from_str(toml_str).unwrap();
        let app = config.app.unwrap();
        assert_eq!(app.tick_interval_ms, Some(250));
        assert!(app.ascii_only);
        assert!(!app.high_contrast);
    }

    #[test]
    fn app_fields_default_when_absent() {
        let config: LectorConfig = toml::from_str("[app]\n").unwrap();
        let app = config.app.unwrap();
        assert_eq!(app.tick_interval_ms, None);
        assert!(!app.ascii_only);
        assert!(!app.high_contrast);
    }

    #[test]
    fn load_from_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let loaded = LectorConfig::load_from(&path).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[app]\ntick_interval_ms = 100\n").unwrap();

        let loaded = LectorConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.app.unwrap().tick_interval_ms, Some(100));
    }

    #[test]
    fn load_from_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[app\n").unwrap();

        let err = LectorConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), &path);
    }
}
