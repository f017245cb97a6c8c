//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the directory holding local configuration
pub const LOCAL_CONFIG_DIR: &str = ".wvw";

/// WVW configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Directory of `*.html` templates overriding the embedded ones
    pub template_dir: Option<PathBuf>,

    /// Default output format (text, json, yaml)
    pub default_format: Option<String>,

    /// Log output format (pretty, compact, json)
    pub log_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        Self::load_layers(true)
    }

    /// Load configuration without emitting log events
    ///
    /// Used before the tracing subscriber is installed; malformed files are
    /// reported by the next [`Config::load`].
    pub fn load_quiet() -> Self {
        Self::load_layers(false)
    }

    fn load_layers(report: bool) -> Self {
        // 1. Built-in defaults (already in Default impl)
        // 2. Global user config (~/.config/wvw/config.yaml)
        // 3. Local config (./.wvw/config.yaml)
        let files = Self::global_config_path()
            .into_iter()
            .chain(std::iter::once(Self::local_config_path()));
        let mut config = Self::from_files(files, report);

        // 4. Environment variables
        config.merge(Self::from_env());

        config
    }

    fn from_files(paths: impl IntoIterator<Item = PathBuf>, report: bool) -> Self {
        let mut config = Config::default();
        for path in paths {
            match Self::read(&path) {
                Ok(Some(layer)) => config.merge(layer),
                Ok(None) => {}
                Err(e) if report => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                }
                Err(_) => {}
            }
        }
        config
    }

    /// Read one config file; a missing or unreadable file contributes nothing
    fn read(path: &std::path::Path) -> Result<Option<Config>, serde_yml::Error> {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Ok(None);
        };
        serde_yml::from_str(&contents).map(Some)
    }

    fn from_env() -> Self {
        Config {
            template_dir: std::env::var_os("WVW_TEMPLATE_DIR").map(PathBuf::from),
            default_format: std::env::var("WVW_FORMAT").ok(),
            log_format: std::env::var("WVW_LOG_FORMAT").ok(),
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "wvw")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to the local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(LOCAL_CONFIG_DIR).join("config.yaml")
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.template_dir.is_some() {
            self.template_dir = other.template_dir;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.log_format.is_some() {
            self.log_format = other.log_format;
        }
    }

    /// Output format, defaulting to text
    pub fn format(&self) -> &str {
        self.default_format.as_deref().unwrap_or("text")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            template_dir: Some(PathBuf::from("/base")),
            default_format: Some("json".to_string()),
            log_format: None,
        };
        base.merge(Config {
            template_dir: None,
            default_format: Some("yaml".to_string()),
            log_format: Some("compact".to_string()),
        });
        assert_eq!(base.template_dir, Some(PathBuf::from("/base")));
        assert_eq!(base.format(), "yaml");
        assert_eq!(base.log_format.as_deref(), Some("compact"));
    }

    #[test]
    fn test_default_format() {
        assert_eq!(Config::default().format(), "text");
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "default_format: json\ntemplate_dir: /tmp/templates\n").unwrap();

        let config = Config::read(&path).unwrap().unwrap();
        assert_eq!(config.format(), "json");
        assert_eq!(config.template_dir, Some(PathBuf::from("/tmp/templates")));
    }

    #[test]
    fn test_read_missing_or_malformed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::read(&dir.path().join("missing.yaml")).unwrap().is_none());

        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "default_format: [unclosed").unwrap();
        assert!(Config::read(&path).is_err());
    }

    #[test]
    fn test_malformed_layer_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.yaml");
        let local = dir.path().join("local.yaml");
        std::fs::write(&global, "default_format: yaml\nlog_format: json\n").unwrap();
        std::fs::write(&local, "default_format: [unclosed").unwrap();

        for report in [true, false] {
            let config = Config::from_files([global.clone(), local.clone()], report);
            assert_eq!(config.format(), "yaml");
            assert_eq!(config.log_format.as_deref(), Some("json"));
        }
    }
}
