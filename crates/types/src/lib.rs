//! Shared types and constants for stacklogic.
//!
//! Everything here is plain data with no dependencies, so the engine, the
//! high-score service and the terminal host all agree on one vocabulary.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//!
//! Pieces spawn above row 0 (negative `y`) and fall into view.
//!
//! # Difficulty Schedule
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `START_DROP_MS` | 800 | Gravity interval at level 1 |
//! | `DROP_DECREASE_PER_LEVEL_MS` | 60 | Interval reduction per level |
//! | `MIN_DROP_MS` | 80 | Interval floor (reached at level 13) |
//! | `LINES_PER_LEVEL` | 10 | Cleared lines needed per level |
//!
//! # Examples
//!
//! ```
//! use stacklogic_types::{GameAction, PieceKind, RunState, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::T.as_str(), "T");
//! assert_eq!(GameAction::HardDrop.as_str(), "hardDrop");
//! assert_eq!(RunState::default(), RunState::Home);
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 20));
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Host frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 1
pub const START_DROP_MS: u32 = 800;

/// Gravity interval reduction per level above 1
pub const DROP_DECREASE_PER_LEVEL_MS: u32 = 60;

/// Gravity interval floor
pub const MIN_DROP_MS: u32 = 80;

/// Lines that must be cleared to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear base points indexed by rows cleared in one lock (0-4).
///
/// Multiplied by the current level.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Per-row base points for clears larger than four rows.
pub const LARGE_CLEAR_POINTS_PER_ROW: u32 = 200;

/// Points for each manual soft-drop step
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points for each row travelled by a hard drop
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// Horizontal offsets tried after a rotation, in order.
///
/// A deliberately simplified kick table: no vertical kicks and no per-kind
/// tables.
pub const KICK_OFFSETS: [i8; 5] = [0, -1, 1, -2, 2];

/// Number of entries kept on the high-score board
pub const HIGHSCORE_MAX: usize = 10;

/// Maximum length of a high-score name, in characters
pub const NAME_MAX_LEN: usize = 16;

/// Largest score the high-score service accepts
pub const MAX_SUBMITTED_SCORE: u64 = 1_000_000_000;

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Pink, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical order (the contents of one fresh bag).
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Uppercase letter used for display
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
///
/// The kind is identity for rendering only; gameplay just asks "filled?".
pub type Cell = Option<PieceKind>;

/// Lifecycle of a run.
///
/// `Home → Playing ⇄ Paused`, `Playing → GameOver → Home`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    #[default]
    Home,
    Playing,
    Paused,
    GameOver,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Home => "home",
            RunState::Playing => "playing",
            RunState::Paused => "paused",
            RunState::GameOver => "gameover",
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOverReason {
    /// A freshly spawned piece had nowhere to enter the board.
    NoSpaceToSpawn,
    /// A piece locked with at least one cell above row 0.
    StackedAboveTop,
}

impl GameOverReason {
    /// Human-readable reason
    pub fn message(&self) -> &'static str {
        match self {
            GameOverReason::NoSpaceToSpawn => "No space to spawn",
            GameOverReason::StackedAboveTop => "Stacked above the top",
        }
    }
}

impl std::fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Signal emitted once when a run ends.
///
/// The engine only reports it; qualification, naming and submission are the
/// caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverEvent {
    pub reason: GameOverReason,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
}

/// Discrete commands the host feeds into a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Reset and start playing
    NewGame,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (1 point)
    SoftDrop,
    /// Drop piece to its resting row and lock (2 points per row)
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Freeze gameplay
    Pause,
    /// Continue a paused run
    Resume,
    /// Abandon the run and return to the home screen
    GoHome,
}

impl GameAction {
    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::NewGame => "newGame",
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Pause => "pause",
            GameAction::Resume => "resume",
            GameAction::GoHome => "goHome",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_defaults() {
        assert_eq!(START_DROP_MS, 800);
        assert_eq!(DROP_DECREASE_PER_LEVEL_MS, 60);
        assert_eq!(MIN_DROP_MS, 80);
        assert_eq!(LINES_PER_LEVEL, 10);
        assert_eq!(LINE_SCORES, [0, 100, 300, 500, 800]);
    }

    #[test]
    fn action_names_are_distinct() {
        let actions = [
            GameAction::NewGame,
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::SoftDrop,
            GameAction::HardDrop,
            GameAction::RotateCw,
            GameAction::RotateCcw,
            GameAction::Pause,
            GameAction::Resume,
            GameAction::GoHome,
        ];
        for (i, a) in actions.iter().enumerate() {
            for b in &actions[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }

    #[test]
    fn game_over_reason_messages() {
        assert_eq!(GameOverReason::NoSpaceToSpawn.to_string(), "No space to spawn");
        assert_eq!(GameOverReason::StackedAboveTop.message(), "Stacked above the top");
    }

    #[test]
    fn bag_contents_are_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
