use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::report::DEFAULT_SHARE_BASE_URL;
use crate::week::WeekKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub data_file: PathBuf,
    pub share_base_url: String,
    /// Week the board opens on; the current week when unset.
    pub default_week: Option<WeekKey>,
    pub limit: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("church.json"),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            default_week: None,
            limit: 10,
        }
    }
}

/// Reads a TOML config. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<BoardConfig, BoardError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(BoardConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| BoardError::Config {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    toml::from_str(&content).map_err(|e| BoardError::Config {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("board.toml")).unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        std::fs::write(
            &path,
            "data_file = \"grace.json\"\ndefault_week = { year = 2024, week = 30 }\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.data_file, PathBuf::from("grace.json"));
        assert_eq!(config.default_week, Some(WeekKey::new(2024, 30)));
        assert_eq!(config.share_base_url, "https://wa.me/");
        assert_eq!(config.limit, 10);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        std::fs::write(&path, "limit = \"ten\"").unwrap();
        assert!(matches!(load_config(&path), Err(BoardError::Config { .. })));
    }
}
