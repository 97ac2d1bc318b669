use anyhow::{Context, Result};
use canvas::{MinimapConfig, NodeStyle};
use layout::LayoutConfig;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// User configuration. Every field falls back to its default when absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub minimap: MinimapConfig,
    pub style: NodeStyle,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".mindmap").join("config.json"))
    }

    /// Read settings from `path`, or from the default location if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Log level from `-v` count, falling back to the configured level, then `warn`.
    pub fn level_filter(&self, verbose: u8) -> LevelFilter {
        match verbose {
            0 => self
                .log_level
                .as_deref()
                .and_then(|level| LevelFilter::from_str(level).ok())
                .unwrap_or(LevelFilter::Warn),
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "layout": {{ "level_distance": 200.0 }}, "log_level": "debug" }}"#).unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.layout.level_distance, 200.0);
        assert_eq!(settings.minimap, MinimapConfig::default());
        assert_eq!(settings.level_filter(0), LevelFilter::Debug);
        assert_eq!(settings.level_filter(2), LevelFilter::Debug);
        assert_eq!(settings.level_filter(3), LevelFilter::Trace);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.json"))).is_err());
    }

    #[test]
    fn unknown_level_falls_back_to_warn() {
        let settings = Settings {
            log_level: Some("loud".into()),
            ..Default::default()
        };
        assert_eq!(settings.level_filter(0), LevelFilter::Warn);
    }
}
