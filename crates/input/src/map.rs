//! Key mapping from terminal events to game actions.

use crate::types::{GameAction, RunState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to a game action for the given run state.
///
/// Game over has no bindings: the high-score sequence owns the keyboard
/// until the session is back home.
pub fn handle_key_event(key: KeyEvent, state: RunState) -> Option<GameAction> {
    match state {
        RunState::Home => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(GameAction::NewGame),
            _ => None,
        },
        RunState::Playing => playing_key(key.code),
        RunState::Paused => match key.code {
            KeyCode::Char('p') | KeyCode::Char('P') => Some(GameAction::Resume),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::GoHome),
            _ => None,
        },
        RunState::GameOver => None,
    }
}

fn playing_key(code: KeyCode) -> Option<GameAction> {
    match code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => Some(GameAction::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => Some(GameAction::MoveRight),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(GameAction::SoftDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Char('k') | KeyCode::Char('K') => {
            Some(GameAction::RotateCw)
        }
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(GameAction::RotateCcw),

        // Actions
        KeyCode::Char(' ') => Some(GameAction::HardDrop),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(GameAction::Pause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::GoHome),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Release events (reported on some platforms) are ignored.
pub fn is_press(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
}
