//! Terminal blockfall runner (default binary).
//!
//! Usage: `blockfall [config.json]`
//!
//! Press `i` to write the current game state to the log as JSON.
//!
//! It uses crossterm for input and the framebuffer-based renderer from
//! `blockfall-term`. Logs go to a file because the terminal belongs to the
//! renderer.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::{info, LevelFilter};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;

use blockfall::core::GameConfig;
use blockfall::engine::Engine;
use blockfall::input::{handle_key_event, is_inspect_key};
use blockfall::term::{GameView, ScreenRenderer};
use blockfall::types::Command;

/// Upper bound on how long the loop blocks waiting for a key while idle.
const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    init_log()?;

    let config = load_config()?;
    info!("starting with {:?}", config);

    let mut engine = Engine::new(config, ScreenRenderer::new(GameView::default()))
        .context("invalid game configuration")?;
    engine.renderer_mut().enter()?;

    let result = run(&mut engine);

    // Always try to restore terminal state.
    let _ = engine.renderer_mut().exit();
    result
}

fn log_snapshot(engine: &Engine<ScreenRenderer>, label: &str) {
    match serde_json::to_string(&engine.snapshot()) {
        Ok(json) => info!("{label} snapshot {json}"),
        Err(e) => info!("{label} snapshot unavailable: {e}"),
    }
}

/// Config file from the first argument (if any), then environment overrides.
fn load_config() -> Result<GameConfig> {
    let base = match std::env::args().nth(1) {
        Some(path) => GameConfig::from_path(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => GameConfig::default(),
    };
    let config = base.with_env_overrides();
    config.validate().context("invalid environment overrides")?;
    Ok(config)
}

fn init_log() -> Result<()> {
    let path = std::env::var("BLOCKFALL_LOG").unwrap_or_else(|_| "blockfall.log".to_string());
    let level = std::env::var("BLOCKFALL_LOG_LEVEL")
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}",
        )))
        .build(&path)
        .with_context(|| format!("failed to open log file {path}"))?;
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn run(engine: &mut Engine<ScreenRenderer>) -> Result<()> {
    engine.render();
    let mut last = Instant::now();

    loop {
        if let Some(e) = engine.renderer_mut().take_error() {
            return Err(e.context("terminal draw failed"));
        }

        // Input with timeout until next tick.
        let timeout = engine.time_until_next_tick().unwrap_or(IDLE_POLL);
        if event::poll(timeout)? {
            match event::read()? {
                // Terminal auto-repeat is ignored; only presses count.
                Event::Key(key) if key.kind == KeyEventKind::Press && is_inspect_key(key) => {
                    log_snapshot(engine, "current");
                }
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match handle_key_event(key) {
                        Some(Command::Quit) => {
                            log_snapshot(engine, "final");
                            engine.quit();
                            return Ok(());
                        }
                        Some(command) => {
                            engine.handle(command);
                        }
                        None => {}
                    }
                }
                Event::Resize(_, _) => engine.renderer_mut().redraw(),
                _ => {}
            }
        }

        let now = Instant::now();
        engine.advance(now - last);
        last = now;
    }
}
