//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Command`] values. It holds
//! no state: every key press becomes at most one command, and terminal
//! auto-repeat is left to the caller to filter.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, is_inspect_key, should_quit};
