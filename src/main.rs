//! Terminal game runner (default binary).
//!
//! Owns the clock and the keyboard: real elapsed time goes to
//! `GameSession::tick`, key presses become actions, and when a run ends the
//! game-over flow talks to the score service without ever blocking a frame.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use stacklogic::core::GameSession;
use stacklogic::input::{handle_key_event, is_press, should_quit, NameEntry, NameInput};
use stacklogic::scores::{
    DefaultGateway, FlowStep, GameOverFlow, HighScoreEntry, RequestId, ScoreEvent, ScoreService,
};
use stacklogic::term::{Frame, GameView, PromptView, Screen, ViewModel};
use stacklogic::types::{GameAction, TICK_MS};

fn main() -> Result<()> {
    init_logging();

    let mut scores = ScoreService::start_from_env()?;
    let mut screen = Screen::new();
    screen.enter()?;

    let result = run(&mut screen, &mut scores);

    // Always try to restore terminal state.
    let _ = screen.exit();
    result
}

/// Log to `STACKLOGIC_LOG_PATH` if set; never to the terminal being drawn.
fn init_logging() {
    let Some(path) = std::env::var("STACKLOGIC_LOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        return;
    };

    match std::fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .try_init();
        }
        Err(e) => eprintln!("cannot open log file {}: {}", path, e),
    }
}

fn seed_from_env() -> u32 {
    std::env::var("STACKLOGIC_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
}

/// Which score reply the game-over flow is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Awaiting {
    Nothing,
    Top(RequestId),
    Submit(RequestId),
}

struct NamePrompt {
    entry: NameEntry,
    score: u64,
    rank: usize,
}

struct App {
    game: GameSession,
    flow: GameOverFlow,
    awaiting: Awaiting,
    top: Vec<HighScoreEntry>,
    prompt: Option<NamePrompt>,
    status: Option<&'static str>,
}

impl App {
    fn new(seed: u32) -> Self {
        Self {
            game: GameSession::new(seed),
            flow: GameOverFlow::new(),
            awaiting: Awaiting::Nothing,
            top: Vec::new(),
            prompt: None,
            status: None,
        }
    }

    fn step(&mut self, step: FlowStep, scores: &ScoreService<DefaultGateway>) {
        match step {
            FlowStep::FetchTop => {
                self.status = Some("Checking high scores...");
                self.awaiting = Awaiting::Top(scores.fetch_top());
            }
            FlowStep::PromptName { score, rank } => {
                self.status = None;
                self.prompt = Some(NamePrompt {
                    entry: NameEntry::new(),
                    score,
                    rank,
                });
            }
            FlowStep::Submit { name, score } => {
                self.prompt = None;
                self.status = Some("Saving score...");
                self.awaiting = Awaiting::Submit(scores.submit(name, score));
            }
            FlowStep::GoHome => {
                self.prompt = None;
                self.status = None;
                self.awaiting = Awaiting::Nothing;
                self.game.go_home();
                scores.fetch_top();
            }
        }
    }

    /// Replies to anything but the awaited request only refresh the list.
    fn on_score_event(
        &mut self,
        id: RequestId,
        event: ScoreEvent,
        scores: &ScoreService<DefaultGateway>,
    ) {
        let awaiting = self.awaiting;
        match event {
            ScoreEvent::Top(list) => {
                self.top = list;
                if awaiting == Awaiting::Top(id) {
                    self.awaiting = Awaiting::Nothing;
                    let step = self.flow.on_top(&self.top);
                    self.step(step, scores);
                }
            }
            ScoreEvent::Submitted(outcome) => {
                self.top = outcome.scores.clone();
                if awaiting == Awaiting::Submit(id) {
                    self.awaiting = Awaiting::Nothing;
                    let step = self.flow.on_submitted(Some(&outcome));
                    self.step(step, scores);
                }
            }
            ScoreEvent::Failed(reason) => {
                log::warn!("score request failed: {}", reason);
                let step = match awaiting {
                    Awaiting::Top(want) if want == id => self.flow.on_top(&self.top),
                    Awaiting::Submit(want) if want == id => self.flow.on_submitted(None),
                    _ => return,
                };
                self.awaiting = Awaiting::Nothing;
                self.step(step, scores);
            }
        }
    }

    fn view_model<'a>(&'a self, snap: &'a stacklogic::core::GameSnapshot) -> ViewModel<'a> {
        ViewModel {
            snap,
            top: &self.top,
            prompt: self.prompt.as_ref().map(|p| PromptView {
                name: p.entry.as_str(),
                score: p.score,
                rank: p.rank,
            }),
            status: self.status,
        }
    }
}

fn run(screen: &mut Screen, scores: &mut ScoreService<DefaultGateway>) -> Result<()> {
    let mut app = App::new(seed_from_env());
    let view = GameView::default();
    let mut frame = Frame::new(0, 0);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    scores.fetch_top();

    loop {
        // Render.
        let (w, h) = screen.size().unwrap_or((80, 24));
        let snap = app.game.snapshot();
        view.render_into(&app.view_model(&snap), w, h, &mut frame);
        screen.present(&frame)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if is_press(&key) => {
                    if let Some(prompt) = app.prompt.as_mut() {
                        let step = match prompt.entry.handle_key(key) {
                            NameInput::Pending => None,
                            NameInput::Submit(name) => Some(app.flow.on_name(Some(&name))),
                            NameInput::Cancel => Some(app.flow.on_name(None)),
                        };
                        if let Some(step) = step {
                            app.step(step, scores);
                        }
                    } else if should_quit(key) {
                        return Ok(());
                    } else if let Some(action) = handle_key_event(key, app.game.state()) {
                        if app.game.apply_action(action) {
                            log::debug!("applied {}", action.as_str());
                            match action {
                                // Paused time never reaches the engine.
                                GameAction::Resume => last_tick = Instant::now(),
                                GameAction::GoHome => {
                                    scores.fetch_top();
                                }
                                _ => {}
                            }
                        }
                    }
                }
                Event::Resize(_, _) => screen.invalidate(),
                _ => {}
            }
        }

        // Tick with real elapsed time.
        let now = Instant::now();
        let elapsed_ms = now.duration_since(last_tick).as_millis().min(u32::MAX as u128) as u32;
        if elapsed_ms >= TICK_MS {
            last_tick = now;
            app.game.tick(elapsed_ms);
        }

        if let Some(event) = app.game.take_game_over() {
            log::info!(
                "game over ({}): score {}, lines {}, level {}",
                event.reason,
                event.score,
                event.lines,
                event.level
            );
            let step = app.flow.begin(event);
            app.step(step, scores);
        }

        while let Some((id, event)) = scores.try_recv() {
            app.on_score_event(id, event, scores);
        }
    }
}
