//! Game and self-play configuration.
//!
//! `GameConfig` is loadable from a JSON file; every field has a default so a
//! partial file only overrides what it names. CLI flags are applied on top.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::board::state::MAX_BOARD_SIZE;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Settings for playing games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square board.
    pub board_size: i32,
    /// Pursuer search depth in plies.
    pub search_depth: u32,
    /// Maximum number of full turns (evader move + pursuer move).
    pub max_turns: u32,
    /// Completed turns at or above which an uncaptured evader counts as
    /// having escaped.
    pub escape_threshold: u32,
    /// Number of games to play in self-play.
    pub num_games: usize,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: 7,
            search_depth: 3,
            max_turns: 10,
            escape_threshold: 7,
            num_games: 10,
            threads: 4,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Loads configuration from a JSON file and validates it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Loads configuration from a JSON file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parses and validates configuration from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::Validation(format!(
                "board_size must be between 2 and {}",
                MAX_BOARD_SIZE
            )));
        }
        if self.search_depth == 0 {
            return Err(ConfigError::Validation("search_depth must be > 0".into()));
        }
        if self.max_turns == 0 {
            return Err(ConfigError::Validation("max_turns must be > 0".into()));
        }
        if self.num_games == 0 {
            return Err(ConfigError::Validation("num_games must be > 0".into()));
        }
        if self.threads == 0 {
            return Err(ConfigError::Validation("threads must be > 0".into()));
        }
        Ok(())
    }
}
