//! What happens between "game over" and "back home".
//!
//! [`GameOverFlow`] is a plain state machine. It never performs I/O: each
//! step returns a [`FlowStep`] telling the host what to do next (fetch the
//! list, ask for a name, submit, go home) and the host reports results back.

use crate::entry::{potential_rank, qualifies, sanitize_name, HighScoreEntry};
use crate::gateway::SubmitOutcome;
use crate::types::GameOverEvent;

/// Next thing the host must do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    /// Fetch the current top list and call [`GameOverFlow::on_top`].
    FetchTop,
    /// Ask the player for a name and call [`GameOverFlow::on_name`].
    PromptName {
        score: u64,
        rank: usize,
    },
    /// Submit and call [`GameOverFlow::on_submitted`].
    Submit {
        name: String,
        score: u64,
    },
    /// Done; return the session to the home screen.
    GoHome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    AwaitingTop,
    AwaitingName,
    AwaitingSubmit,
}

#[derive(Debug, Clone)]
pub struct GameOverFlow {
    phase: Phase,
    event: Option<GameOverEvent>,
}

impl Default for GameOverFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl GameOverFlow {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            event: None,
        }
    }

    /// True while a game-over sequence is in progress.
    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn event(&self) -> Option<GameOverEvent> {
        self.event
    }

    fn score(&self) -> u64 {
        self.event.map(|e| e.score as u64).unwrap_or(0)
    }

    fn finish(&mut self) -> FlowStep {
        self.phase = Phase::Idle;
        FlowStep::GoHome
    }

    /// Start handling a finished run.
    pub fn begin(&mut self, event: GameOverEvent) -> FlowStep {
        self.event = Some(event);
        self.phase = Phase::AwaitingTop;
        FlowStep::FetchTop
    }

    /// The current top list arrived (possibly from the local fallback).
    pub fn on_top(&mut self, top: &[HighScoreEntry]) -> FlowStep {
        if self.phase != Phase::AwaitingTop {
            return self.finish();
        }
        let score = self.score();
        if !qualifies(top, score) {
            return self.finish();
        }
        let rank = potential_rank(top, score).unwrap_or(top.len() + 1);
        self.phase = Phase::AwaitingName;
        FlowStep::PromptName { score, rank }
    }

    /// The player entered a name, or cancelled with `None`.
    pub fn on_name(&mut self, name: Option<&str>) -> FlowStep {
        if self.phase != Phase::AwaitingName {
            return self.finish();
        }
        match name {
            Some(name) => {
                self.phase = Phase::AwaitingSubmit;
                FlowStep::Submit {
                    name: sanitize_name(name),
                    score: self.score(),
                }
            }
            None => self.finish(),
        }
    }

    /// The submission finished; failures were already absorbed upstream.
    pub fn on_submitted(&mut self, outcome: Option<&SubmitOutcome>) -> FlowStep {
        if let Some(outcome) = outcome {
            log::info!(
                "score {} submitted (saved: {})",
                self.score(),
                outcome.saved
            );
        }
        self.finish()
    }
}
