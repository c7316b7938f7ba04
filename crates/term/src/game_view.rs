//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::pieces::spawn_origin;
use crate::core::{GameSnapshot, Piece};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::RunState;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// A lightweight terminal view of one game.
pub struct GameView {
    /// Field cell width in terminal columns.
    cell_w: u16,
    /// Field cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Play frame (border included) in framebuffer coordinates.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    /// Cell dimensions are clamped to `1..=MAX_CELL`.
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.clamp(1, MAX_CELL),
            cell_h: cell_h.clamp(1, MAX_CELL),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().glyph(' '));

        let field_w = snap.cols().saturating_mul(self.cell_w);
        let field_h = snap.rows().saturating_mul(self.cell_h);
        let (frame_w, frame_h) = (field_w.saturating_add(2), field_h.saturating_add(2));
        let frame = Frame {
            x: viewport.width.saturating_sub(frame_w.saturating_add(PANEL_W)) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
                AnchorY::Top => 0,
            },
            w: frame_w,
            h: frame_h,
        };

        let bg = CellStyle::new(Rgb::new(80, 80, 90), PLAY_BG);
        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        fb.fill_rect(frame.x + 1, frame.y + 1, field_w, field_h, ' ', bg);
        self.draw_border(fb, frame, border);

        for y in 1..=snap.rows() as i16 {
            for x in 1..=snap.cols() as i16 {
                match snap.field.get(x, y) {
                    Some(color) => self.draw_block(fb, frame, x, y, color.into()),
                    None => self.draw_empty_cell(fb, frame, x, y),
                }
            }
        }

        if let Some(active) = snap.active {
            for c in active.cells {
                if !snap.field.is_out_of_bounds(c.x, c.y) {
                    self.draw_block(fb, frame, c.x, c.y, active.color.into());
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        match snap.run_state {
            RunState::Idle => self.draw_overlay_text(fb, frame, "PRESS ENTER"),
            RunState::Paused => self.draw_overlay_text(fb, frame, "PAUSED"),
            RunState::GameOver => self.draw_overlay_text(fb, frame, "GAME OVER"),
            RunState::Running => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
        let Frame { x, y, w, h } = frame;
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i16, y: i16) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
        self.fill_cell_rect(fb, frame, x, y, '·', style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Frame, x: i16, y: i16, fg: Rgb) {
        let style = CellStyle::new(fg, PLAY_BG).bold();
        self.fill_cell_rect(fb, frame, x, y, '█', style);
    }

    /// Fill the terminal rectangle of field cell (x, y); both 1-indexed.
    fn fill_cell_rect(&self, fb: &mut FrameBuffer, frame: Frame, x: i16, y: i16, ch: char, style: CellStyle) {
        let px = (frame.x + 1).saturating_add((x as u16 - 1).saturating_mul(self.cell_w));
        let py = (frame.y + 1).saturating_add((y as u16 - 1).saturating_mul(self.cell_h));
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "BREAKS", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.breaks, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        match snap.next {
            Some(next) => self.draw_preview(fb, panel_x, y, snap.cols(), next),
            None => fb.put_str(panel_x, y, "-", value),
        }
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "STATE", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, state_label(snap.run_state), value);
    }

    /// Draw a piece still sitting in its spawn box as a small 4x2 preview.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, cols: u16, piece: Piece) {
        let origin = spawn_origin(cols);
        let style = CellStyle::new(piece.color.into(), PANEL_BG).bold();
        for c in piece.cells {
            let dx = c.x - origin.x;
            let dy = c.y - origin.y;
            if (0..4).contains(&dx) && (0..2).contains(&dy) {
                fb.fill_rect(x + dx as u16 * self.cell_w, y + dy as u16, self.cell_w, 1, '█', style);
            }
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, frame: Frame, text: &str) {
        let mid_y = frame.y.saturating_add(frame.h / 2);
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

/// Columns reserved to the right of the play frame.
const PANEL_W: u16 = 14;

/// Largest cell width or height, in terminal glyphs.
pub const MAX_CELL: u16 = 8;

fn state_label(state: RunState) -> &'static str {
    match state {
        RunState::Idle => "IDLE",
        RunState::Running => "RUNNING",
        RunState::Paused => "PAUSED",
        RunState::GameOver => "GAME OVER",
    }
}
