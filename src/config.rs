//! Start-up configuration, passed by the host page as JSON.
//!
//! Every field has a default, so `{}` (or an empty string) is a complete
//! configuration:
//!
//! ```json
//! { "logLevel": "info", "lang": "ru", "gameId": 1, "gridSize": 10,
//!   "words": [], "wordsPerGrid": 5, "candidates": 8 }
//! ```

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::locale::Lang;

pub const MIN_GRID_SIZE: usize = 4;
pub const MAX_GRID_SIZE: usize = 20;
pub const MAX_WORDS_PER_GRID: usize = 20;
pub const MAX_CANDIDATES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AppConfig {
    /// `log` level name: `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    pub lang: Lang,
    /// Catalog id of the game to start.
    pub game_id: u32,
    /// Cells per grid side.
    pub grid_size: usize,
    /// Word list; empty means the built-in dictionary.
    pub words: Vec<String>,
    /// Words to hide in one grid.
    pub words_per_grid: usize,
    /// Grids generated per game; the fullest one is played.
    pub candidates: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            lang: Lang::Ru,
            game_id: 1,
            grid_size: 10,
            words: Vec::new(),
            words_per_grid: 5,
            candidates: 8,
        }
    }
}

impl AppConfig {
    /// Parse and validate. Blank input yields the defaults.
    ///
    /// # Errors
    ///
    /// [`AppError::Config`] for malformed JSON, [`AppError::InvalidConfig`]
    /// for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let config: Self = if json.trim().is_empty() { Self::default() } else { serde_json::from_str(json)? };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// [`AppError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), AppError> {
        self.log_level()?;
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(AppError::InvalidConfig(format!(
                "gridSize must be between {MIN_GRID_SIZE} and {MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        if !(1..=MAX_WORDS_PER_GRID).contains(&self.words_per_grid) {
            return Err(AppError::InvalidConfig(format!(
                "wordsPerGrid must be between 1 and {MAX_WORDS_PER_GRID}, got {}",
                self.words_per_grid
            )));
        }
        if !(1..=MAX_CANDIDATES).contains(&self.candidates) {
            return Err(AppError::InvalidConfig(format!(
                "candidates must be between 1 and {MAX_CANDIDATES}, got {}",
                self.candidates
            )));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// [`AppError::InvalidConfig`] for an unknown level name.
    pub fn log_level(&self) -> Result<log::Level, AppError> {
        self.log_level
            .parse()
            .map_err(|_| AppError::InvalidConfig(format!("unknown logLevel {:?}", self.log_level)))
    }
}
