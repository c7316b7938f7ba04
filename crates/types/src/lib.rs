//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the game core, the engine,
//! the terminal renderer and the key mapper alike.
//!
//! # Grid Coordinates
//!
//! Cells are addressed as `(column, row)`, **1-indexed**:
//!
//! - **Columns**: 1..=COLS (left to right), default 10
//! - **Rows**: 1..=ROWS (top to bottom), default 20
//! - **Spawn rows**: pieces appear in rows 1 and 2
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_COLS` | 10 | Grid width |
//! | `DEFAULT_ROWS` | 20 | Grid height |
//! | `DEFAULT_TICK_MS` | 700 | Gravity interval |
//! | `TICK_SCORE` | 1 | Survival score per processed tick |
//! | `LINE_CLEAR_BONUS` | 100 | Score per cleared row |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Color, Command, PieceKind, DEFAULT_PALETTE};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
//! assert_eq!(Color::from_hex("#d67070"), Some(DEFAULT_PALETTE[0]));
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid width in cells (10 columns)
pub const DEFAULT_COLS: u16 = 10;

/// Grid height in cells (20 rows)
pub const DEFAULT_ROWS: u16 = 20;

/// Default gravity interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 700;

/// Score awarded for every processed gravity tick
pub const TICK_SCORE: u32 = 1;

/// Score awarded for every cleared row
pub const LINE_CLEAR_BONUS: u32 = 100;

/// A cell coordinate on the grid (1-indexed).
///
/// Cells order row-major: first by row, then by column. Sparse maps keyed by
/// `Cell` therefore iterate top-to-bottom, left-to-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i16,
    pub y: i16,
}

impl Cell {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`.
    pub const fn offset(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}

/// 24-bit RGB color of a block.
///
/// Serialized as a `"#rrggbb"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Color;
    ///
    /// assert_eq!(Color::from_hex("#70acd6"), Some(Color::new(0x70, 0xac, 0xd6)));
    /// assert_eq!(Color::from_hex("e5e507"), Some(Color::new(0xe5, 0xe5, 0x07)));
    /// assert_eq!(Color::from_hex("#fff"), None);
    /// ```
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb` representation
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color {value:?}, expected #rrggbb"))
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub const RED: Color = Color::new(0xd6, 0x70, 0x70);
pub const GREEN: Color = Color::new(0x70, 0xd6, 0x78);
pub const BLUE: Color = Color::new(0x70, 0xac, 0xd6);
pub const YELLOW: Color = Color::new(0xe5, 0xe5, 0x07);

/// Default block palette: red, green, blue, yellow
pub const DEFAULT_PALETTE: [Color; 4] = [RED, GREEN, BLUE, YELLOW];

/// The seven tetromino shapes
///
/// - **I**: line, 4 in a row
/// - **O**: 2x2 square (no pivot, never rotates)
/// - **T**: T-shaped
/// - **S**: S-shaped
/// - **Z**: Z-shaped (mirror of S)
/// - **J**: L-shape with the corner block top-left
/// - **L**: L-shape with the corner block top-right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All seven kinds, in template order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::J,
        PieceKind::L,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::T,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Commands delivered by an input source.
///
/// The first four are play commands and only apply while the engine is
/// running. The rest are control commands accepted in every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Shift the active piece one column left
    MoveLeft,
    /// Shift the active piece one column right
    MoveRight,
    /// Run one gravity tick immediately
    SoftDrop,
    /// Rotate the active piece 90° about its pivot
    Rotate,
    /// Leave the idle state and begin a session
    Start,
    /// Pause a running session or resume a paused one
    TogglePauseResume,
    /// Begin a fresh session from any state
    Restart,
    /// Stop the session and return to idle
    Quit,
}

impl Command {
    /// Parse command from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Command;
    ///
    /// assert_eq!(Command::from_str("rotate"), Some(Command::Rotate));
    /// assert_eq!(Command::from_str("togglePause"), Some(Command::TogglePauseResume));
    /// assert_eq!(Command::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "rotate" => Some(Command::Rotate),
            "start" => Some(Command::Start),
            "togglepause" | "togglepauseresume" => Some(Command::TogglePauseResume),
            "restart" => Some(Command::Restart),
            "quit" => Some(Command::Quit),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::Rotate => "rotate",
            Command::Start => "start",
            Command::TogglePauseResume => "togglePause",
            Command::Restart => "restart",
            Command::Quit => "quit",
        }
    }

    /// Whether this command manipulates the active piece.
    pub fn is_play(&self) -> bool {
        matches!(
            self,
            Command::MoveLeft | Command::MoveRight | Command::SoftDrop | Command::Rotate
        )
    }
}

/// Engine run state
///
/// - **Idle**: constructed or quit, no session
/// - **Running**: ticks fire, play commands apply
/// - **Paused**: ticks stopped, pieces retained, can resume
/// - **GameOver**: ticks stopped, pieces frozen, only restart (or quit) applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::GameOver => "gameOver",
        }
    }
}
