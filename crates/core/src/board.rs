//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Rows above the board (y < 0) are never stored; they only appear transiently
//! while a freshly spawned piece falls into view, and always count as empty.

use arrayvec::ArrayVec;

use crate::piece::Piece;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Original row indices removed by one [`Board::clear_full_rows`] call,
/// listed bottom to top.
pub type ClearedRows = ArrayVec<u8, { BOARD_HEIGHT as usize }>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Fill an entire row with one kind (handy for tests and demos)
    pub fn fill_row(&mut self, y: i8, kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            self.set(x, y, Some(kind));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Check if a row is completely empty
    pub fn is_row_empty(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_none()))
            .unwrap_or(false)
    }

    /// Borrow one row of cells
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= BOARD_HEIGHT as usize {
            return None;
        }
        let start = y * BOARD_WIDTH as usize;
        Some(&self.cells[start..start + BOARD_WIDTH as usize])
    }

    /// Whether `piece` overlaps a wall, the floor or a filled cell.
    ///
    /// Cells above row 0 never collide with board content, but they still
    /// collide with the side walls.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(x, y)| {
            if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
                return true;
            }
            y >= 0 && self.is_occupied(x, y)
        })
    }

    /// Write the piece into the board at its current position.
    ///
    /// Returns `true` when any cell sat above row 0; those cells are dropped
    /// and the caller must treat the lock as a fatal overflow.
    pub fn merge(&mut self, piece: &Piece) -> bool {
        let mut overflowed = false;
        for (x, y) in piece.cells() {
            if y < 0 {
                overflowed = true;
                continue;
            }
            self.set(x, y, Some(piece.kind));
        }
        overflowed
    }

    /// Remove every full row and let the rows above fall.
    ///
    /// Scans bottom to top. After a removal the same index is checked again,
    /// since the row above has just shifted into it. Returns the original
    /// indices of the removed rows; its length is the cleared count.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let mut y = BOARD_HEIGHT as usize;

        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                // Every removal so far shifted this row down by one.
                cleared.push((row - cleared.len()) as u8);
                self.remove_row(row);
            } else {
                y -= 1;
            }
        }

        cleared
    }

    /// Remove row `y`, shift all rows above it down and empty the top row
    fn remove_row(&mut self, y: usize) {
        let width = BOARD_WIDTH as usize;
        self.cells.copy_within(0..y * width, width);
        for cell in &mut self.cells[..width] {
            *cell = None;
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the board into a row-major grid (for snapshots)
    pub fn write_grid(&self, out: &mut [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        for (y, row) in out.iter_mut().enumerate() {
            let start = y * BOARD_WIDTH as usize;
            row.copy_from_slice(&self.cells[start..start + BOARD_WIDTH as usize]);
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
