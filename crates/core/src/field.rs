//! Field module - the sparse grid of locked blocks
//!
//! The field stores only occupied cells, keyed by 1-indexed `(x, y)`
//! coordinates: x ranges 1..=cols (left to right), y ranges 1..=rows (top to
//! bottom). A missing key means the cell is empty.
//!
//! The map is ordered row-major, so a whole row is one contiguous key range.
//! Row counts and row removal are range operations rather than full scans.

use std::collections::BTreeMap;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::types::{Cell, Color};

/// Locked blocks on a `cols` x `rows` grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    cols: u16,
    rows: u16,
    cells: BTreeMap<Cell, Color>,
}

/// First key of row `y` in row-major order.
#[inline(always)]
fn row_start(y: i16) -> Cell {
    Cell::new(i16::MIN, y)
}

impl Field {
    /// Create an empty field
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: BTreeMap::new(),
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Check if (x, y) lies outside the grid
    #[inline(always)]
    pub fn is_out_of_bounds(&self, x: i16, y: i16) -> bool {
        x < 1 || x > self.cols as i16 || y < 1 || y > self.rows as i16
    }

    /// The single collision predicate: outside the grid or occupied.
    #[inline]
    pub fn is_blocked(&self, x: i16, y: i16) -> bool {
        self.is_out_of_bounds(x, y) || self.cells.contains_key(&Cell::new(x, y))
    }

    /// Color of the block at (x, y), if any
    pub fn get(&self, x: i16, y: i16) -> Option<Color> {
        self.cells.get(&Cell::new(x, y)).copied()
    }

    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        self.cells.contains_key(&Cell::new(x, y))
    }

    /// Place a block. Returns false (and stores nothing) when out of bounds.
    pub fn insert(&mut self, cell: Cell, color: Color) -> bool {
        if self.is_out_of_bounds(cell.x, cell.y) {
            return false;
        }
        self.cells.insert(cell, color);
        true
    }

    /// Merge a piece's cells into the field with the piece color.
    ///
    /// Returns the number of cells stored; cells outside the grid are skipped.
    pub fn lock_cells(&mut self, cells: &[Cell], color: Color) -> usize {
        cells
            .iter()
            .filter(|&&cell| self.insert(cell, color))
            .count()
    }

    /// Number of occupied cells in row `y`
    pub fn row_len(&self, y: i16) -> usize {
        self.cells.range(row_start(y)..row_start(y + 1)).count()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: i16) -> bool {
        self.row_len(y) == self.cols as usize
    }

    /// Remove row `y` and move every block above it down one row.
    ///
    /// Blocks below the row keep their positions. Returns the number of
    /// blocks removed from the row.
    pub fn clear_row(&mut self, y: i16) -> usize {
        // self.cells keeps rows < y; `row` takes rows >= y.
        let mut row = self.cells.split_off(&row_start(y));
        let below = row.split_off(&row_start(y + 1));
        let above = std::mem::replace(&mut self.cells, below);

        self.cells
            .extend(above.into_iter().map(|(cell, color)| (cell.offset(0, 1), color)));
        row.len()
    }

    /// Bottom-most full row between the floor and `top_row` (inclusive)
    pub fn lowest_full_row(&self, top_row: i16) -> Option<i16> {
        (top_row.max(1)..=self.rows as i16)
            .rev()
            .find(|&y| self.is_row_full(y))
    }

    /// Clear full rows until a bottom-up scan finds none.
    ///
    /// Each pass clears the lowest full row and rescans from the floor, so
    /// stacked full rows and rows that become full after a shift are all
    /// removed. Rows above `top_row` are never considered full.
    ///
    /// Returns the cleared row indices in the order they were removed.
    pub fn clear_full_rows(&mut self, top_row: i16) -> Vec<i16> {
        let mut cleared = Vec::new();
        while let Some(y) = self.lowest_full_row(top_row) {
            self.clear_row(y);
            cleared.push(y);
        }
        cleared
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupied cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Color)> + '_ {
        self.cells.iter().map(|(cell, color)| (*cell, *color))
    }

    /// Remove every block
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[derive(Serialize)]
struct FieldEntry {
    x: i16,
    y: i16,
    color: Color,
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<FieldEntry> = self
            .iter()
            .map(|(cell, color)| FieldEntry {
                x: cell.x,
                y: cell.y,
                color,
            })
            .collect();

        let mut s = serializer.serialize_struct("Field", 3)?;
        s.serialize_field("cols", &self.cols)?;
        s.serialize_field("rows", &self.rows)?;
        s.serialize_field("cells", &entries)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BLUE, GREEN, RED};

    fn fill_row(field: &mut Field, y: i16, color: Color) {
        for x in 1..=field.cols() as i16 {
            field.insert(Cell::new(x, y), color);
        }
    }

    #[test]
    fn test_is_blocked_bounds() {
        let field = Field::new(10, 20);
        assert!(!field.is_blocked(1, 1));
        assert!(!field.is_blocked(10, 20));
        assert!(field.is_blocked(0, 5));
        assert!(field.is_blocked(11, 5));
        assert!(field.is_blocked(5, 0));
        assert!(field.is_blocked(5, 21));
    }

    #[test]
    fn test_is_blocked_occupancy() {
        let mut field = Field::new(10, 20);
        assert!(field.insert(Cell::new(3, 7), RED));
        assert!(field.is_blocked(3, 7));
        assert!(!field.is_blocked(4, 7));
        assert_eq!(field.get(3, 7), Some(RED));
    }

    #[test]
    fn test_insert_out_of_bounds_is_refused() {
        let mut field = Field::new(10, 20);
        assert!(!field.insert(Cell::new(0, 1), RED));
        assert!(!field.insert(Cell::new(1, 21), RED));
        assert!(field.is_empty());
    }

    #[test]
    fn test_row_len_counts_only_that_row() {
        let mut field = Field::new(10, 20);
        field.insert(Cell::new(1, 4), RED);
        field.insert(Cell::new(10, 4), RED);
        field.insert(Cell::new(5, 5), RED);
        field.insert(Cell::new(5, 3), RED);
        assert_eq!(field.row_len(4), 2);
        assert_eq!(field.row_len(6), 0);
    }

    #[test]
    fn test_clear_row_shifts_only_rows_above() {
        let mut field = Field::new(10, 20);
        fill_row(&mut field, 18, RED);
        field.insert(Cell::new(2, 17), GREEN);
        field.insert(Cell::new(3, 10), BLUE);
        field.insert(Cell::new(4, 19), BLUE);

        assert_eq!(field.clear_row(18), 10);

        assert_eq!(field.row_len(18), 1);
        assert_eq!(field.get(2, 18), Some(GREEN));
        assert_eq!(field.get(3, 11), Some(BLUE));
        assert_eq!(field.get(4, 19), Some(BLUE));
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn test_clear_full_rows_handles_stacked_rows() {
        let mut field = Field::new(10, 20);
        fill_row(&mut field, 19, RED);
        fill_row(&mut field, 20, GREEN);
        field.insert(Cell::new(6, 18), BLUE);

        let cleared = field.clear_full_rows(2);
        assert_eq!(cleared, vec![20, 20]);
        assert_eq!(field.len(), 1);
        assert_eq!(field.get(6, 20), Some(BLUE));
    }

    #[test]
    fn test_spawn_row_is_exempt_by_default() {
        let mut field = Field::new(10, 20);
        fill_row(&mut field, 1, RED);

        assert!(field.clear_full_rows(2).is_empty());
        assert_eq!(field.row_len(1), 10);

        assert_eq!(field.clear_full_rows(1), vec![1]);
        assert!(field.is_empty());
    }

    #[test]
    fn test_full_spawn_row_clears_once_shifted_down() {
        let mut field = Field::new(10, 20);
        fill_row(&mut field, 1, RED);
        fill_row(&mut field, 2, GREEN);

        // Row 2 clears, row 1 falls into row 2 and becomes clearable.
        assert_eq!(field.clear_full_rows(2), vec![2, 2]);
        assert!(field.is_empty());
    }

    #[test]
    fn test_lock_cells_skips_out_of_bounds() {
        let mut field = Field::new(10, 20);
        let cells = [Cell::new(1, 1), Cell::new(0, 1), Cell::new(2, 1), Cell::new(2, 2)];
        assert_eq!(field.lock_cells(&cells, RED), 3);
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn test_serializes_as_cell_list() {
        let mut field = Field::new(10, 20);
        field.insert(Cell::new(2, 20), RED);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["cols"], 10);
        assert_eq!(json["cells"][0]["x"], 2);
        assert_eq!(json["cells"][0]["y"], 20);
        assert_eq!(json["cells"][0]["color"], "#d67070");
    }
}
