//! Pieces module - tetromino templates, spawning and pivot rotation
//!
//! Each shape is an immutable template: four cells inside a 4x2 spawn box
//! plus an optional pivot. Spawning copies a template into a fresh [`Piece`]
//! with absolute coordinates, so pieces never share mutable state.
//!
//! On a 10-wide grid the spawn box starts at column 4, row 1.

use serde::Serialize;

use crate::field::Field;
use crate::types::{Cell, Color, PieceKind};

/// Offset of a single block inside the 4x2 spawn box (0-based)
pub type BoxOffset = (i16, i16);

/// Immutable blueprint of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeTemplate {
    pub cells: [BoxOffset; 4],
    /// Rotation center; `None` for rotation-invariant shapes
    pub pivot: Option<BoxOffset>,
}

/// Get the spawn template for a piece kind
pub const fn template(kind: PieceKind) -> ShapeTemplate {
    match kind {
        PieceKind::I => ShapeTemplate {
            cells: [(0, 0), (1, 0), (2, 0), (3, 0)],
            pivot: Some((1, 0)),
        },
        PieceKind::O => ShapeTemplate {
            cells: [(1, 0), (1, 1), (2, 0), (2, 1)],
            pivot: None,
        },
        PieceKind::J => ShapeTemplate {
            cells: [(0, 0), (0, 1), (1, 1), (2, 1)],
            pivot: Some((1, 1)),
        },
        PieceKind::L => ShapeTemplate {
            cells: [(2, 0), (0, 1), (1, 1), (2, 1)],
            pivot: Some((1, 1)),
        },
        PieceKind::Z => ShapeTemplate {
            cells: [(0, 0), (1, 0), (1, 1), (2, 1)],
            pivot: Some((1, 1)),
        },
        PieceKind::S => ShapeTemplate {
            cells: [(2, 0), (1, 0), (1, 1), (0, 1)],
            pivot: Some((1, 1)),
        },
        PieceKind::T => ShapeTemplate {
            cells: [(1, 0), (0, 1), (1, 1), (2, 1)],
            pivot: Some((0, 1)),
        },
    }
}

/// Top-left corner of the spawn box for a grid `cols` wide
pub fn spawn_origin(cols: u16) -> Cell {
    Cell::new((cols as i16 - 4) / 2 + 1, 1)
}

/// Rotate `cell` 90° clockwise (y grows downward) about `pivot`.
///
/// `x' = px + py - y`, `y' = x - px + py`
#[inline]
pub fn rotate_cw(cell: Cell, pivot: Cell) -> Cell {
    Cell::new(pivot.x + pivot.y - cell.y, cell.x - pivot.x + pivot.y)
}

/// A falling piece with absolute coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub cells: [Cell; 4],
    pub pivot: Option<Cell>,
}

impl Piece {
    /// Create a piece of `kind` at the spawn box of a `cols` wide grid
    pub fn spawn(kind: PieceKind, color: Color, cols: u16) -> Self {
        let origin = spawn_origin(cols);
        let t = template(kind);
        Self {
            kind,
            color,
            cells: t.cells.map(|(dx, dy)| origin.offset(dx, dy)),
            pivot: t.pivot.map(|(dx, dy)| origin.offset(dx, dy)),
        }
    }

    /// Copy moved by `(dx, dy)`, pivot included
    pub fn translated(&self, dx: i16, dy: i16) -> Self {
        Self {
            cells: self.cells.map(|c| c.offset(dx, dy)),
            pivot: self.pivot.map(|p| p.offset(dx, dy)),
            ..*self
        }
    }

    /// Copy rotated clockwise about the pivot; unchanged without a pivot
    pub fn rotated(&self) -> Self {
        match self.pivot {
            Some(pivot) => Self {
                cells: self.cells.map(|c| rotate_cw(c, pivot)),
                ..*self
            },
            None => *self,
        }
    }

    /// Check if every cell is free on the field
    pub fn fits(&self, field: &Field) -> bool {
        self.cells.iter().all(|c| !field.is_blocked(c.x, c.y))
    }

    /// Check if any cell has something (floor or block) directly below it
    pub fn is_touching(&self, field: &Field) -> bool {
        self.cells.iter().any(|c| field.is_blocked(c.x, c.y + 1))
    }

    /// Cells sorted row-major, for order-independent comparison
    pub fn sorted_cells(&self) -> [Cell; 4] {
        let mut cells = self.cells;
        cells.sort();
        cells
    }
}
