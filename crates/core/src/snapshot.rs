use crate::piece::Piece;
use crate::shapes::ShapeMatrix;
use crate::types::{Cell, GameOverReason, PieceKind, RunState, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub shape: ShapeMatrix,
    pub x: i8,
    pub y: i8,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            x: value.x,
            y: value.y,
        }
    }
}

impl ActiveSnapshot {
    /// Absolute cells that fall inside the visible board
    pub fn visible_cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.shape.occupied().filter_map(move |(dx, dy)| {
            let x = self.x + dx;
            let y = self.y + dy;
            let inside = (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y);
            inside.then_some((x as u8, y as u8))
        })
    }
}

/// Read-only view of a session for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: u32,
    pub state: RunState,
    pub game_over_reason: Option<GameOverReason>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.active = None;
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.drop_interval_ms = 0;
        self.state = RunState::Home;
        self.game_over_reason = None;
    }

    pub fn playable(&self) -> bool {
        self.state == RunState::Playing
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            score: 0,
            lines: 0,
            level: 1,
            drop_interval_ms: 0,
            state: RunState::Home,
            game_over_reason: None,
        }
    }
}
