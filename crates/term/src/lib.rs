//! Terminal rendering for stacklogic.
//!
//! A small game-oriented layer instead of a widget toolkit: views draw into
//! a [`Frame`] of styled glyphs and the [`Screen`] flushes only the glyphs
//! that changed since the last frame.
//!
//! - [`frame`]: the glyph grid
//! - [`screen`]: raw-mode terminal ownership and diffed output
//! - [`view`]: home, playing, paused and game-over screens

pub mod frame;
pub mod screen;
pub mod view;

pub use stacklogic_core as core;
pub use stacklogic_scores as scores;
pub use stacklogic_types as types;

pub use frame::{Frame, Glyph, Rgb, Style};
pub use screen::{encode_all, encode_changes, Screen};
pub use view::{GameView, PromptView, ViewModel};
