//! Piece module - the active falling shape and its transforms
//!
//! A piece is a kind, a rotation-state matrix and a top-left anchor in board
//! coordinates. Moves and rotations produce new values; the caller decides
//! whether to keep them after a collision check.
//!
//! Rotation uses a simplified wall kick: after turning the matrix, horizontal
//! offsets from [`KICK_OFFSETS`] are tried in order and the first one that
//! fits wins. There are no vertical kicks and no per-kind kick tables, so this
//! is intentionally not SRS.

use crate::shapes::{get_shape, ShapeMatrix};
use crate::types::{PieceKind, BOARD_WIDTH, KICK_OFFSETS};

/// Direction of a quarter turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateDir {
    Clockwise,
    CounterClockwise,
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: ShapeMatrix,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a piece at its spawn anchor: centered horizontally, with the
    /// whole matrix above row 0.
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = get_shape(kind);
        let size = shape.size() as i8;
        Self {
            kind,
            shape,
            x: (BOARD_WIDTH as i8 - size) / 2,
            y: -size,
        }
    }

    /// Same piece shifted by `(dx, dy)`
    pub fn translated(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Same anchor, matrix turned a quarter in `dir`
    pub fn rotated(&self, dir: RotateDir) -> Self {
        let shape = match dir {
            RotateDir::Clockwise => self.shape.rotate_cw(),
            RotateDir::CounterClockwise => self.shape.rotate_ccw(),
        };
        Self { shape, ..*self }
    }

    /// Absolute board coordinates of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .occupied()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Lowest occupied matrix row (relative to the anchor)
    pub fn bottom_offset(&self) -> i8 {
        self.shape.occupied().map(|(_, dy)| dy).max().unwrap_or(0)
    }

    /// Same column, shifted straight down until the lowest occupied cell
    /// sits on row 0, the first position where the piece becomes visible.
    pub fn entry_position(&self) -> Self {
        self.translated(0, -(self.y + self.bottom_offset()))
    }
}

/// Rotate with horizontal wall kicks.
///
/// `collides` reports whether a candidate placement overlaps the board.
/// Returns the kicked piece and the offset used, or `None` when every offset
/// collides, in which case the caller keeps the original piece untouched.
pub fn try_rotate(
    piece: &Piece,
    dir: RotateDir,
    collides: impl Fn(&Piece) -> bool,
) -> Option<(Piece, i8)> {
    let rotated = piece.rotated(dir);
    KICK_OFFSETS.iter().find_map(|&dx| {
        let candidate = rotated.translated(dx, 0);
        (!collides(&candidate)).then_some((candidate, dx))
    })
}
