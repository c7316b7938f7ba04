//! Game state module - field, pieces and counters of one session
//!
//! This module ties together the field, the spawner and the two in-flight
//! pieces. It implements the gravity tick (fall or lock), line clearing,
//! promotion of the look-ahead piece and spawn-collision game over.
//!
//! It knows nothing about timing or run states: the engine decides when a
//! tick happens and which commands may reach this type.

use log::{debug, info, trace};

use crate::config::{ConfigError, GameConfig};
use crate::field::Field;
use crate::pieces::Piece;
use crate::rng::Spawner;
use crate::snapshot::GameSnapshot;
use crate::types::{RunState, LINE_CLEAR_BONUS, TICK_SCORE};

/// What a gravity tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The active piece moved down one row
    Fell,
    /// The active piece locked and the look-ahead piece took its place
    Locked { rows_cleared: u32 },
    /// The active piece locked and its successor collided at spawn
    GameOver { rows_cleared: u32 },
    /// Nothing to do (not started or already over)
    Ignored,
}

impl TickOutcome {
    /// Whether the tick changed any state
    pub fn changed(&self) -> bool {
        !matches!(self, TickOutcome::Ignored)
    }
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    field: Field,
    active: Option<Piece>,
    next: Option<Piece>,
    spawner: Spawner,
    /// Topmost row line clears look at
    top_clearable_row: i16,
    score: u32,
    breaks: u32,
    game_over: bool,
    started: bool,
}

impl GameState {
    /// Create an unstarted session. The configuration is validated here.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_spawner(config, Spawner::new(config)?))
    }

    /// Create an unstarted session with a fixed seed
    pub fn with_seed(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_spawner(config, Spawner::with_seed(config, seed)?))
    }

    fn with_spawner(config: &GameConfig, spawner: Spawner) -> Self {
        Self {
            field: Field::new(config.cols, config.rows),
            active: None,
            next: None,
            spawner,
            top_clearable_row: config.top_clearable_row(),
            score: 0,
            breaks: 0,
            game_over: false,
            started: false,
        }
    }

    /// Spawn the active and look-ahead pieces
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let active = self.spawner.next_piece();
        let next = self.spawner.next_piece();
        debug!("spawned {:?} ({}) with {:?} next", active.kind, active.color, next.kind);
        self.active = Some(active);
        self.next = Some(next);
    }

    /// Drop everything and return to the unstarted state
    pub fn reset(&mut self) {
        self.field.clear();
        self.active = None;
        self.next = None;
        self.score = 0;
        self.breaks = 0;
        self.game_over = false;
        self.started = false;
        self.spawner.reset_history();
    }

    /// Fresh field and counters with two new pieces
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn breaks(&self) -> u32 {
        self.breaks
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next(&self) -> Option<Piece> {
        self.next
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Direct field access for setting up scenarios (puzzles, tests, tools).
    pub fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }

    /// Replace the active piece (scenario setup)
    pub fn set_active(&mut self, piece: Piece) {
        self.active = Some(piece);
    }

    /// Collision predicate shared by every movement check
    pub fn is_blocked(&self, x: i16, y: i16) -> bool {
        self.field.is_blocked(x, y)
    }

    fn playable_piece(&self) -> Option<Piece> {
        if self.game_over {
            return None;
        }
        self.active
    }

    /// Shift the active piece horizontally; all or nothing
    pub fn try_move(&mut self, dx: i16) -> bool {
        let Some(active) = self.playable_piece() else {
            return false;
        };

        let moved = active.translated(dx, 0);
        if moved.fits(&self.field) {
            self.active = Some(moved);
            true
        } else {
            trace!("move by {dx} rejected");
            false
        }
    }

    /// Rotate the active piece about its pivot; all or nothing.
    ///
    /// Pieces without a pivot never rotate.
    pub fn try_rotate(&mut self) -> bool {
        let Some(active) = self.playable_piece() else {
            return false;
        };
        if active.pivot.is_none() {
            return false;
        }

        let rotated = active.rotated();
        if rotated.fits(&self.field) {
            self.active = Some(rotated);
            true
        } else {
            trace!("rotation of {:?} rejected", active.kind);
            false
        }
    }

    /// Soft drop is one gravity tick delivered early
    pub fn soft_drop(&mut self) -> TickOutcome {
        self.tick()
    }

    /// One gravity step: fall one row, or lock and promote the look-ahead.
    ///
    /// Every processed tick adds [`TICK_SCORE`], whichever branch it took.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(active) = self.playable_piece() else {
            return TickOutcome::Ignored;
        };

        let outcome = if active.is_touching(&self.field) {
            self.lock_and_promote(active)
        } else {
            self.active = Some(active.translated(0, 1));
            TickOutcome::Fell
        };

        self.score = self.score.saturating_add(TICK_SCORE);
        outcome
    }

    fn lock_and_promote(&mut self, piece: Piece) -> TickOutcome {
        self.field.lock_cells(&piece.cells, piece.color);

        let cleared = self.field.clear_full_rows(self.top_clearable_row);
        let rows_cleared = cleared.len() as u32;
        if rows_cleared > 0 {
            self.breaks = self.breaks.saturating_add(rows_cleared);
            self.score = self
                .score
                .saturating_add(rows_cleared.saturating_mul(LINE_CLEAR_BONUS));
            debug!("cleared rows {:?}, breaks now {}", cleared, self.breaks);
        }

        let promoted = match self.next.take() {
            Some(next) => next,
            None => self.spawner.next_piece(),
        };
        let next = self.spawner.next_piece();
        debug!(
            "locked {:?}; promoted {:?} ({}), next {:?}",
            piece.kind, promoted.kind, promoted.color, next.kind
        );
        self.active = Some(promoted);
        self.next = Some(next);

        if !promoted.fits(&self.field) {
            self.game_over = true;
            info!("spawn blocked for {:?}: game over at score {}", promoted.kind, self.score);
            return TickOutcome::GameOver { rows_cleared };
        }

        TickOutcome::Locked { rows_cleared }
    }

    /// Copy the state for a renderer
    pub fn snapshot(&self, run_state: RunState) -> GameSnapshot {
        GameSnapshot {
            field: self.field.clone(),
            active: self.active,
            next: self.next,
            score: self.score,
            breaks: self.breaks,
            run_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, PieceKind, BLUE, GREEN, RED};

    fn started(config: &GameConfig) -> GameState {
        let mut state = GameState::with_seed(config, 12345).unwrap();
        state.start();
        state
    }

    fn line_only() -> GameConfig {
        GameConfig::default().with_shapes(&[PieceKind::I])
    }

    fn fill_row_except(state: &mut GameState, y: i16, gaps: &[i16]) {
        for x in 1..=10 {
            if !gaps.contains(&x) {
                state.field_mut().insert(Cell::new(x, y), BLUE);
            }
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::with_seed(&GameConfig::default(), 1).unwrap();
        assert!(!state.started());
        assert!(!state.game_over());
        assert_eq!(state.score(), 0);
        assert_eq!(state.breaks(), 0);
        assert!(state.active().is_none());
        assert!(state.next().is_none());
        assert!(state.field().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GameConfig::default().with_grid(0, 20);
        assert!(GameState::new(&config).is_err());
    }

    #[test]
    fn test_start_spawns_two_pieces() {
        let state = started(&GameConfig::default());
        let active = state.active().unwrap();
        let next = state.next().unwrap();
        assert_ne!(active.color, next.color);
        assert!(active.fits(state.field()));
    }

    #[test]
    fn test_tick_gravity_moves_everything_down() {
        let mut state = started(&GameConfig::default());
        let before = state.active().unwrap();

        assert_eq!(state.tick(), TickOutcome::Fell);
        assert_eq!(state.active().unwrap(), before.translated(0, 1));
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_line_piece_falls_to_floor_and_locks() {
        let mut state = started(&line_only());

        for _ in 0..19 {
            assert_eq!(state.tick(), TickOutcome::Fell);
        }
        let landed = state.active().unwrap();
        assert!(landed.cells.iter().all(|c| c.y == 20));
        let lookahead = state.next().unwrap();

        assert_eq!(state.tick(), TickOutcome::Locked { rows_cleared: 0 });
        assert_eq!(state.score(), 20);
        assert_eq!(state.field().len(), 4);
        assert_eq!(state.field().row_len(20), 4);
        for c in landed.cells {
            assert_eq!(state.field().get(c.x, c.y), Some(landed.color));
        }
        assert_eq!(state.active().unwrap(), lookahead);
        assert!(state.next().is_some());
    }

    #[test]
    fn test_lock_on_block_below() {
        let mut state = started(&line_only());
        state.field_mut().insert(Cell::new(4, 6), RED);

        for _ in 0..4 {
            assert_eq!(state.tick(), TickOutcome::Fell);
        }
        assert_eq!(state.tick(), TickOutcome::Locked { rows_cleared: 0 });
        assert_eq!(state.field().row_len(5), 4);
        assert_eq!(state.score(), 5);
    }

    #[test]
    fn test_line_clear_scores_and_shifts() {
        let mut state = started(&line_only());
        fill_row_except(&mut state, 20, &[4, 5, 6, 7]);
        state.field_mut().insert(Cell::new(1, 19), GREEN);

        for _ in 0..19 {
            state.tick();
        }
        assert_eq!(state.tick(), TickOutcome::Locked { rows_cleared: 1 });

        assert_eq!(state.breaks(), 1);
        assert_eq!(state.score(), 20 + 100);
        assert_eq!(state.field().len(), 1);
        assert_eq!(state.field().get(1, 20), Some(GREEN));
    }

    #[test]
    fn test_spawn_row_clears_when_enabled() {
        let config = GameConfig {
            clear_spawn_row: true,
            ..line_only()
        };
        let mut state = started(&config);
        fill_row_except(&mut state, 1, &[4, 5, 6, 7]);
        // Support under the line piece so the first tick locks it on row 1.
        state.field_mut().insert(Cell::new(4, 2), GREEN);

        assert_eq!(state.tick(), TickOutcome::Locked { rows_cleared: 1 });
        assert_eq!(state.breaks(), 1);
        assert_eq!(state.score(), 1 + 100);
        assert_eq!(state.field().len(), 1);
        assert_eq!(state.field().get(4, 2), Some(GREEN));
        assert!(!state.game_over());
    }

    #[test]
    fn test_horizontal_move_is_atomic() {
        let mut state = started(&line_only());
        // Line spawns at x 4..=7; three moves left reach the wall.
        assert!(state.try_move(-1));
        assert!(state.try_move(-1));
        assert!(state.try_move(-1));
        let at_wall = state.active().unwrap();
        assert!(!state.try_move(-1));
        assert_eq!(state.active().unwrap(), at_wall);
        assert_eq!(at_wall.pivot, Some(Cell::new(2, 1)));
    }

    #[test]
    fn test_move_blocked_by_field_cell() {
        let mut state = started(&line_only());
        state.field_mut().insert(Cell::new(8, 1), RED);
        let before = state.active().unwrap();
        assert!(!state.try_move(1));
        assert_eq!(state.active().unwrap(), before);
    }

    #[test]
    fn test_rotation_rejected_out_of_bounds() {
        let mut state = started(&line_only());
        // Pivot at row 1: a vertical line would reach row 0.
        let before = state.active().unwrap();
        assert!(!state.try_rotate());
        assert_eq!(state.active().unwrap(), before);

        state.tick();
        state.tick();
        assert!(state.try_rotate());
        let vertical = state.active().unwrap();
        assert!(vertical.cells.iter().all(|c| c.x == 5));
    }

    #[test]
    fn test_square_never_rotates() {
        let config = GameConfig::default().with_shapes(&[PieceKind::O]);
        let mut state = started(&config);
        state.tick();
        let before = state.active().unwrap();
        assert!(!state.try_rotate());
        assert_eq!(state.active().unwrap(), before);
    }

    #[test]
    fn test_soft_drop_is_a_tick() {
        let mut state = started(&GameConfig::default());
        let before = state.active().unwrap();
        assert_eq!(state.soft_drop(), TickOutcome::Fell);
        assert_eq!(state.active().unwrap(), before.translated(0, 1));
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_game_over_on_spawn_collision() {
        let mut state = started(&line_only());
        let active = state.active().unwrap().translated(0, 2);
        state.set_active(active);
        // Blocks the spawn box of the successor.
        state.field_mut().insert(Cell::new(6, 1), RED);

        let mut outcome = state.tick();
        while outcome == TickOutcome::Fell {
            outcome = state.tick();
        }

        assert_eq!(outcome, TickOutcome::GameOver { rows_cleared: 0 });
        assert!(state.game_over());
        // The frozen piece stays visible.
        assert!(state.active().is_some());
        let frozen_score = state.score();
        assert_eq!(state.tick(), TickOutcome::Ignored);
        assert_eq!(state.score(), frozen_score);
        assert!(!state.try_move(1));
        assert!(!state.try_rotate());
    }

    #[test]
    fn test_restart_clears_session() {
        let mut state = started(&line_only());
        for _ in 0..25 {
            state.tick();
        }
        assert!(state.score() > 0);
        assert!(!state.field().is_empty());

        state.restart();
        assert!(state.started());
        assert_eq!(state.score(), 0);
        assert_eq!(state.breaks(), 0);
        assert!(state.field().is_empty());
        assert!(state.active().is_some());
        assert!(state.next().is_some());
    }

    #[test]
    fn test_unstarted_tick_is_ignored() {
        let mut state = GameState::with_seed(&GameConfig::default(), 1).unwrap();
        assert_eq!(state.tick(), TickOutcome::Ignored);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_snapshot_copies_counters() {
        let mut state = started(&GameConfig::default());
        state.tick();
        let snap = state.snapshot(RunState::Running);
        assert_eq!(snap.score, 1);
        assert_eq!(snap.active, state.active());
        assert_eq!(snap.next, state.next());
        assert_eq!(snap.run_state, RunState::Running);
    }
}
