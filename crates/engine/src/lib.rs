//! Engine module - run state machine, tick source and renderer contract
//!
//! The [`Engine`] owns one [`GameState`] and decides which commands and ticks
//! reach it:
//!
//! | From \ Command | Start | TogglePauseResume | Restart | Quit | Play commands |
//! |----------------|-------|-------------------|---------|------|---------------|
//! | Idle           | Running | - | Running | - | ignored |
//! | Running        | - | Paused | Running | Idle | applied |
//! | Paused         | - | Running | Running | Idle | ignored |
//! | GameOver       | - | - | Running | Idle | ignored |
//!
//! `-` is a no-op that returns `false`. A spawn collision during a tick moves
//! Running to GameOver.
//!
//! Time enters through [`Engine::advance`]; commands enter through
//! [`Engine::handle`] or the queue drained by [`Engine::pump`]. After every
//! committed change the injected [`Renderer`] receives a fresh snapshot.

pub mod queue;
pub mod ticker;

use std::time::Duration;

use log::{info, trace};

use blockfall_core::config::{ConfigError, GameConfig};
use blockfall_core::game_state::{GameState, TickOutcome};
use blockfall_core::snapshot::GameSnapshot;

pub use blockfall_types as types;
pub use queue::{CommandQueue, CommandSender};
pub use ticker::Ticker;

use crate::types::{Command, RunState};

/// Receives a snapshot after every committed state change.
pub trait Renderer {
    fn on_state_changed(&mut self, snapshot: &GameSnapshot);
}

/// Renderer that discards every snapshot (headless runs, benches).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn on_state_changed(&mut self, _snapshot: &GameSnapshot) {}
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn on_state_changed(&mut self, snapshot: &GameSnapshot) {
        (**self).on_state_changed(snapshot);
    }
}

pub struct Engine<R: Renderer> {
    config: GameConfig,
    game: GameState,
    run_state: RunState,
    ticker: Ticker,
    queue: CommandQueue,
    renderer: R,
}

impl<R: Renderer> Engine<R> {
    /// Validate `config` and build an idle engine.
    pub fn new(config: GameConfig, renderer: R) -> Result<Self, ConfigError> {
        let game = GameState::new(&config)?;
        Ok(Self {
            ticker: Ticker::new(config.tick_interval()),
            config,
            game,
            run_state: RunState::Idle,
            queue: CommandQueue::new(),
            renderer,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Mutable access to the session, for setting up scenarios.
    ///
    /// Only built for tests (`test-util` feature); hosts drive the session
    /// through commands and read it back through [`Engine::snapshot`].
    #[cfg(any(test, feature = "test-util"))]
    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot(self.run_state)
    }

    /// Push the current snapshot to the renderer unconditionally.
    pub fn render(&mut self) {
        let snapshot = self.snapshot();
        self.renderer.on_state_changed(&snapshot);
    }

    /// Handle for queueing commands from elsewhere (possibly another thread).
    pub fn sender(&self) -> CommandSender {
        self.queue.sender()
    }

    fn transition(&mut self, to: RunState) {
        info!("run state {} -> {}", self.run_state.as_str(), to.as_str());
        self.run_state = to;
    }

    pub fn start(&mut self) -> bool {
        if self.run_state != RunState::Idle {
            return false;
        }
        self.game.reset();
        self.game.start();
        self.ticker.start();
        self.transition(RunState::Running);
        self.render();
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.run_state != RunState::Running {
            return false;
        }
        self.ticker.cancel();
        self.transition(RunState::Paused);
        self.render();
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.run_state != RunState::Paused {
            return false;
        }
        self.ticker.start();
        self.transition(RunState::Running);
        self.render();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.run_state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            _ => false,
        }
    }

    /// Fresh field, counters and pieces; valid from every state.
    pub fn restart(&mut self) -> bool {
        self.game.restart();
        self.ticker.start();
        self.transition(RunState::Running);
        self.render();
        true
    }

    /// Stop ticking and clear the session. A second quit is a no-op.
    pub fn quit(&mut self) -> bool {
        self.ticker.cancel();
        if self.run_state == RunState::Idle {
            return false;
        }
        self.game.reset();
        self.transition(RunState::Idle);
        self.render();
        true
    }

    /// Apply one command. Returns whether it changed anything.
    pub fn handle(&mut self, command: Command) -> bool {
        let accepted = match command {
            Command::Start => self.start(),
            Command::TogglePauseResume => self.toggle_pause(),
            Command::Restart => self.restart(),
            Command::Quit => self.quit(),
            play => self.apply_play(play),
        };
        if !accepted {
            trace!("{} ignored in state {}", command.as_str(), self.run_state.as_str());
        }
        accepted
    }

    fn apply_play(&mut self, command: Command) -> bool {
        if !command.is_play() || self.run_state != RunState::Running {
            return false;
        }
        let changed = match command {
            Command::MoveLeft => self.game.try_move(-1),
            Command::MoveRight => self.game.try_move(1),
            Command::Rotate => self.game.try_rotate(),
            Command::SoftDrop => {
                let outcome = self.game.soft_drop();
                self.after_tick(outcome);
                return outcome.changed();
            }
            _ => false,
        };
        if changed {
            self.render();
        }
        changed
    }

    /// Process one gravity tick. Ignored unless running.
    pub fn tick(&mut self) -> bool {
        if self.run_state != RunState::Running {
            return false;
        }
        let outcome = self.game.tick();
        self.after_tick(outcome);
        outcome.changed()
    }

    fn after_tick(&mut self, outcome: TickOutcome) {
        if let TickOutcome::GameOver { .. } = outcome {
            self.ticker.cancel();
            self.transition(RunState::GameOver);
        }
        if outcome.changed() {
            self.render();
        }
    }

    /// Feed elapsed time to the ticker and process the ticks that fall due,
    /// one at a time. Stops early when a tick ends the game.
    ///
    /// Returns the number of ticks processed.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let due = self.ticker.advance(elapsed);
        let mut processed = 0;
        for _ in 0..due {
            if !self.tick() {
                break;
            }
            processed += 1;
        }
        processed
    }

    /// Apply every queued command in arrival order. Returns how many changed state.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(command) = self.queue.try_recv() {
            if self.handle(command) {
                applied += 1;
            }
        }
        applied
    }

    /// Time until the ticker next fires; `None` when no ticks are scheduled.
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.ticker.time_until_next_tick()
    }
}
