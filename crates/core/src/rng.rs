//! RNG module - random piece generation
//!
//! Shapes are drawn uniformly from the configured shape set (no bag, repeats
//! allowed). Colors are drawn uniformly from the palette minus the color of
//! the most recently spawned piece, so two consecutive spawns never look alike.
//!
//! A configured seed makes the whole sequence reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, GameConfig};
use crate::pieces::Piece;
use crate::types::{Color, PieceKind};

/// Piece factory with color-repeat avoidance
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: StdRng,
    shapes: Vec<PieceKind>,
    palette: Vec<Color>,
    cols: u16,
    /// Color of the last piece handed out
    last_color: Option<Color>,
}

impl Spawner {
    /// Build from a configuration. Uses `config.seed` when present,
    /// OS entropy otherwise.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    /// Build with an explicit seed, ignoring `config.seed`
    pub fn with_seed(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Result<Self, ConfigError> {
        if config.shapes.is_empty() {
            return Err(ConfigError::EmptyShapeSet);
        }
        if config.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self {
            rng,
            shapes: config.shapes.clone(),
            palette: config.palette.clone(),
            cols: config.cols,
            last_color: None,
        })
    }

    /// Draw a shape uniformly from the shape set
    pub fn pick_kind(&mut self) -> PieceKind {
        self.shapes[self.rng.random_range(0..self.shapes.len())]
    }

    /// Draw a color, avoiding the previous spawn's color when the palette allows
    pub fn pick_color(&mut self) -> Color {
        let last = self.last_color;
        let candidates: Vec<Color> = self
            .palette
            .iter()
            .copied()
            .filter(|c| Some(*c) != last)
            .collect();
        let pool = if candidates.is_empty() {
            &self.palette
        } else {
            &candidates
        };
        let color = pool[self.rng.random_range(0..pool.len())];
        self.last_color = Some(color);
        color
    }

    /// Spawn a fresh piece at the top of the grid
    pub fn next_piece(&mut self) -> Piece {
        let kind = self.pick_kind();
        let color = self.pick_color();
        Piece::spawn(kind, color, self.cols)
    }

    /// Forget the last color (new session)
    pub fn reset_history(&mut self) {
        self.last_color = None;
    }

    pub fn last_color(&self) -> Option<Color> {
        self.last_color
    }
}
