//! Session configuration and its validation.
//!
//! A [`GameConfig`] is supplied when an engine is built and never changes for
//! the lifetime of that engine. Every field has a default, so a JSON config
//! file only needs to name what it overrides:
//!
//! ```json
//! { "tick_interval_ms": 500, "shapes": ["i", "o"], "seed": 7 }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Color, PieceKind, DEFAULT_COLS, DEFAULT_PALETTE, DEFAULT_ROWS, DEFAULT_TICK_MS};

/// Narrowest grid that still fits the 4-wide spawn box.
pub const MIN_COLS: u16 = 4;

/// Shortest grid that still fits the 2-tall spawn box.
pub const MIN_ROWS: u16 = 2;

/// Largest supported grid dimension (coordinates are `i16`).
pub const MAX_DIM: u16 = 1024;

/// Reasons a configuration is rejected at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid width {cols} is outside {min}..={max}")]
    GridTooNarrow { cols: u16, min: u16, max: u16 },

    #[error("grid height {rows} is outside {min}..={max}")]
    GridTooShort { rows: u16, min: u16, max: u16 },

    #[error("tick interval must be positive")]
    ZeroTickInterval,

    #[error("color palette is empty")]
    EmptyPalette,

    #[error("piece shape set is empty")]
    EmptyShapeSet,

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable per-session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid width in columns
    pub cols: u16,
    /// Grid height in rows
    pub rows: u16,
    /// Gravity interval in milliseconds
    pub tick_interval_ms: u64,
    /// Colors a spawned piece may take
    pub palette: Vec<Color>,
    /// Shapes a spawned piece may take (duplicates weight the draw)
    pub shapes: Vec<PieceKind>,
    /// Treat row 1 as clearable. Off by default: the spawn row never clears.
    pub clear_spawn_row: bool,
    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            tick_interval_ms: DEFAULT_TICK_MS,
            palette: DEFAULT_PALETTE.to_vec(),
            shapes: PieceKind::ALL.to_vec(),
            clear_spawn_row: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_shapes(mut self, shapes: &[PieceKind]) -> Self {
        self.shapes = shapes.to_vec();
        self
    }

    pub fn with_palette(mut self, palette: &[Color]) -> Self {
        self.palette = palette.to_vec();
        self
    }

    pub fn with_grid(mut self, cols: u16, rows: u16) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }

    /// Apply `BLOCKFALL_TICK_MS`, `BLOCKFALL_SEED`, `BLOCKFALL_COLS` and
    /// `BLOCKFALL_ROWS` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Values that fail to
    /// parse are ignored; the result is not validated.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
            lookup(key).and_then(|s| s.trim().parse().ok())
        }

        self.tick_interval_ms = parsed(&lookup, "BLOCKFALL_TICK_MS").unwrap_or(self.tick_interval_ms);
        self.cols = parsed(&lookup, "BLOCKFALL_COLS").unwrap_or(self.cols);
        self.rows = parsed(&lookup, "BLOCKFALL_ROWS").unwrap_or(self.rows);
        if let Some(seed) = parsed(&lookup, "BLOCKFALL_SEED") {
            self.seed = Some(seed);
        }
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Topmost row the line-clear scan visits.
    pub fn top_clearable_row(&self) -> i16 {
        if self.clear_spawn_row {
            1
        } else {
            2
        }
    }

    /// Check every precondition the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_COLS..=MAX_DIM).contains(&self.cols) {
            return Err(ConfigError::GridTooNarrow {
                cols: self.cols,
                min: MIN_COLS,
                max: MAX_DIM,
            });
        }
        if !(MIN_ROWS..=MAX_DIM).contains(&self.rows) {
            return Err(ConfigError::GridTooShort {
                rows: self.rows,
                min: MIN_ROWS,
                max: MAX_DIM,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.shapes.is_empty() {
            return Err(ConfigError::EmptyShapeSet);
        }
        Ok(())
    }
}
