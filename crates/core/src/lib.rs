//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds every rule of the falling-block game: the board, the
//! seven shapes, movement and rotation, line clearing, scoring, the level
//! schedule and the run state machine. It has **no dependencies** on the
//! terminal, the network or the clock, so a host drives it entirely through
//! elapsed time and discrete actions.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision checks, merging and row clearing
//! - [`shapes`]: canonical shape matrices, rotation and display colors
//! - [`piece`]: the active piece, its transforms and wall-kick rotation
//! - [`rng`]: 7-bag piece source
//! - [`scoring`]: line/drop points and the gravity schedule
//! - [`game_state`]: [`GameSession`], the run state machine
//! - [`snapshot`]: read-only view for renderers
//!
//! # Example
//!
//! ```
//! use stacklogic_core::GameSession;
//! use stacklogic_core::types::{GameAction, RunState};
//!
//! let mut game = GameSession::new(12345);
//! assert_eq!(game.state(), RunState::Home);
//!
//! game.apply_action(GameAction::NewGame);
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert!(game.score() > 0); // hard drop awards 2 points per row
//! ```
//!
//! # Timing
//!
//! Gravity is an accumulator: [`GameSession::tick`] adds the elapsed
//! milliseconds and moves the piece one row once the total exceeds the
//! current interval (800ms at level 1, 60ms faster per level, 80ms floor).
//! Feed it real elapsed time; nothing accrues while paused.

pub mod board;
pub mod game_state;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod shapes;
pub mod snapshot;

pub use stacklogic_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, ClearedRows};
pub use game_state::{GameSession, LockEvent};
pub use piece::{try_rotate, Piece, RotateDir};
pub use rng::{Bag, SimpleRng};
pub use scoring::{calculate_drop_score, calculate_line_score, get_drop_interval_ms, level_for_lines};
pub use shapes::{display_rgb, get_shape, ShapeMatrix};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
