//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The first frame (and any frame after a resize or [`TerminalRenderer::invalidate`])
//! is a full redraw; later frames only emit the runs of glyphs that changed.
//!
//! [`ScreenRenderer`] plugs the whole pipeline into the engine's renderer
//! contract: snapshot -> [`GameView`] -> framebuffer -> terminal.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::core::GameSnapshot;
use crate::engine::Renderer;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::game_view::{GameView, Viewport};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a framebuffer, swapping it into internal state.
    ///
    /// Callers should keep one `FrameBuffer` and pass it in every frame.
    /// The renderer diffs against the previous frame and then swaps buffers
    /// so the caller can reuse the old one without cloning.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.encode_swap(fb)?;
        self.flush_buf()
    }

    /// Encode `fb` into the pending output and keep it as the diff base.
    fn encode_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        match self.last.take() {
            Some(mut prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(&prev, fb, &mut self.buf)?;
                std::mem::swap(&mut prev, fb);
                self.last = Some(prev);
            }
            // First frame, invalidated, or resized: the screen content is unknown.
            stale => {
                encode_full_into(fb, &mut self.buf)?;
                let mut prev = stale.unwrap_or_else(|| FrameBuffer::new(0, 0));
                prev.resize(fb.width(), fb.height());
                std::mem::swap(&mut prev, fb);
                self.last = Some(prev);
            }
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine renderer that draws every snapshot to the terminal.
///
/// `on_state_changed` cannot fail, so the first I/O error is kept and
/// later frames are skipped until the host collects it with [`take_error`].
///
/// [`take_error`]: ScreenRenderer::take_error
pub struct ScreenRenderer {
    term: TerminalRenderer,
    view: GameView,
    fb: FrameBuffer,
    last: Option<GameSnapshot>,
    error: Option<anyhow::Error>,
}

impl ScreenRenderer {
    pub fn new(view: GameView) -> Self {
        Self {
            term: TerminalRenderer::new(),
            view,
            fb: FrameBuffer::new(0, 0),
            last: None,
            error: None,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        self.term.enter()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.term.exit()
    }

    /// Redraw the last snapshot from scratch (terminal resize).
    pub fn redraw(&mut self) {
        self.term.invalidate();
        if let Some(snap) = self.last.take() {
            self.draw(&snap);
            self.last = Some(snap);
        }
    }

    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn draw(&mut self, snap: &GameSnapshot) {
        if self.error.is_some() {
            return;
        }
        let (w, h) = terminal::size().unwrap_or((80, 24));
        self.view.render_into(snap, Viewport::new(w, h), &mut self.fb);
        if let Err(e) = self.term.draw_swap(&mut self.fb) {
            self.error = Some(e);
        }
    }
}

impl Renderer for ScreenRenderer {
    fn on_state_changed(&mut self, snapshot: &GameSnapshot) {
        self.draw(snapshot);
        self.last = Some(snapshot.clone());
    }
}

/// Encode a full-frame redraw into `out`: clear, then every row.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = Pen::default();
    for y in 0..fb.height() {
        pen.write_run(out, fb, 0, y, fb.width())?;
    }
    Pen::finish(out)
}

/// Encode only the glyph runs that differ between two same-sized frames.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = Pen::default();
    for (x, y, len) in changed_runs(prev, next) {
        pen.write_run(out, next, x, y, len)?;
    }
    Pen::finish(out)
}

/// Tracks the last emitted style so runs only switch colors when needed.
#[derive(Default)]
struct Pen {
    style: Option<CellStyle>,
}

impl Pen {
    fn write_run(&mut self, out: &mut Vec<u8>, fb: &FrameBuffer, x: u16, y: u16, len: u16) -> Result<()> {
        out.queue(cursor::MoveTo(x, y))?;
        for glyph in (x..x.saturating_add(len)).map(|gx| fb.get(gx, y).unwrap_or_default()) {
            if self.style != Some(glyph.style) {
                set_style(out, glyph.style)?;
                self.style = Some(glyph.style);
            }
            out.queue(Print(glyph.ch))?;
        }
        Ok(())
    }

    fn finish(out: &mut Vec<u8>) -> Result<()> {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn set_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(Color::from(style.fg)))?;
    out.queue(SetBackgroundColor(Color::from(style.bg)))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    }
}

/// Maximal runs `(x, y, len)` of differing glyphs, row by row.
///
/// Both frames must have the same size.
fn changed_runs(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<(u16, u16, u16)> {
    let mut runs = Vec::new();
    for y in 0..next.height() {
        let mut start = None;
        for x in 0..=next.width() {
            let differs = x < next.width() && prev.get(x, y) != next.get(x, y);
            match (start, differs) {
                (None, true) => start = Some(x),
                (Some(s), false) => {
                    runs.push((s, y, x - s));
                    start = None;
                }
                _ => {}
            }
        }
    }
    runs
}
