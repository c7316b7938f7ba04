//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the game rules and session state. It has no
//! dependencies on terminals, timers or threads, making it:
//!
//! - **Deterministic**: A fixed seed produces identical piece sequences
//! - **Testable**: Every rule is exercised by unit tests
//! - **Portable**: The same state drives the terminal front-end and headless runs
//!
//! # Module Structure
//!
//! - [`config`]: Grid size, tick interval, palette and shape set, with validation
//! - [`field`]: Sparse grid of locked blocks with collision and line clearing
//! - [`pieces`]: Shape templates, spawning and pivot rotation
//! - [`rng`]: Uniform shape draw and color-repeat avoidance
//! - [`game_state`]: Gravity tick, locking, promotion and game over
//! - [`snapshot`]: Read-only copy of the state for renderers
//!
//! # Game Rules
//!
//! | Rule | Behavior |
//! |------|----------|
//! | Gravity | Each tick moves the active piece down one row |
//! | Lock | A tick on a piece resting on the floor or a block merges it into the field |
//! | Line clear | Full rows are removed bottom-up; rows above shift down by one |
//! | Spawn row | Row 1 is never cleared unless `clear_spawn_row` is set |
//! | Score | +1 per processed tick, +100 per cleared row |
//! | Game over | The promoted piece overlaps the field at spawn |
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameConfig, GameState, TickOutcome};
//!
//! let mut game = GameState::with_seed(&GameConfig::default(), 12345).unwrap();
//! game.start();
//!
//! game.try_move(1);
//! game.try_rotate();
//! assert_ne!(game.tick(), TickOutcome::Ignored);
//! assert!(game.score() > 0);
//! ```

pub mod config;
pub mod field;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, GameConfig};
pub use field::Field;
pub use game_state::{GameState, TickOutcome};
pub use pieces::{rotate_cw, spawn_origin, template, Piece, ShapeTemplate};
pub use rng::Spawner;
pub use snapshot::GameSnapshot;
