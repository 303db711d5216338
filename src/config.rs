//! Rota tunables.
//!
//! All fields have defaults, so a TOML file only needs the values it
//! changes:
//!
//! ```
//! use u_rota::config::RotaConfig;
//! use u_rota::models::Weekday;
//!
//! let config = RotaConfig::from_toml_str("num_writes = 2\nbeyond_day = \"Thursday\"").unwrap();
//! assert_eq!(config.num_writes, 2);
//! assert_eq!(config.block_size(), 7);
//! assert_eq!(config.beyond_day, Weekday::Thursday);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::models::{CalendarLayout, Weekday};

/// Scheduling, selection, and layout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotaConfig {
    /// Posts each author writes (and edits).
    pub num_writes: usize,
    /// Regular posts per full block.
    pub num_regular: usize,
    /// Queue posts per full block.
    pub num_queue: usize,
    /// Beyond posts per full block.
    pub num_beyond: usize,
    /// Whole-schedule generation attempts.
    pub max_trials: usize,
    /// Resampling budget per attempt (also the selection budget).
    pub max_iter: usize,
    /// First day of each block.
    pub first_day: Weekday,
    /// Day for beyond posts.
    pub beyond_day: Weekday,
    /// RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Emit per-trial and per-block diagnostics.
    pub verbose: bool,
}

impl Default for RotaConfig {
    fn default() -> Self {
        Self {
            num_writes: 3,
            num_regular: 5,
            num_queue: 1,
            num_beyond: 1,
            max_trials: 1000,
            max_iter: 200_000,
            first_day: Weekday::Sunday,
            beyond_day: Weekday::Friday,
            seed: None,
            verbose: false,
        }
    }
}

impl RotaConfig {
    /// Nominal posts per block: regular + queue + beyond.
    /// Saturates instead of overflowing.
    pub fn block_size(&self) -> usize {
        self.num_regular
            .saturating_add(self.num_queue)
            .saturating_add(self.num_beyond)
    }

    /// Calendar layout for exports.
    pub fn layout(&self) -> CalendarLayout {
        CalendarLayout::new(self.first_day, self.beyond_day)
    }

    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Loads a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
