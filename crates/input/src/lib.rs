//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] according to
//! the current run state, and provides the small line editor used for the
//! high-score name prompt. Nothing here touches the engine directly.

pub mod map;
pub mod name_entry;

pub use stacklogic_types as types;

pub use map::{handle_key_event, is_press, should_quit};
pub use name_entry::{NameEntry, NameInput};
