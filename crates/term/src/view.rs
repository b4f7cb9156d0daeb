//! GameView: draws a session snapshot (plus the high-score state around it)
//! into a [`Frame`].
//!
//! Pure: no I/O, so every screen can be checked in unit tests.

use crate::core::{display_rgb, GameSnapshot};
use crate::frame::{Frame, Glyph, Rgb, Style};
use crate::scores::HighScoreEntry;
use crate::types::{PieceKind, RunState, BOARD_HEIGHT, BOARD_WIDTH};

const BG: Rgb = Rgb(0, 0, 0);
const WELL: Rgb = Rgb(24, 24, 32);
const TEXT: Style = Style::new(Rgb(220, 220, 220), BG);
const MUTED: Style = Style::new(Rgb(130, 130, 140), BG);
const TITLE: Style = Style::new(Rgb(255, 210, 90), BG).bold();
const BORDER: Style = Style::new(Rgb(170, 170, 180), BG);

/// High-score name prompt shown over the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptView<'a> {
    pub name: &'a str,
    pub score: u64,
    pub rank: usize,
}

/// Everything one frame needs.
#[derive(Debug, Clone, Copy)]
pub struct ViewModel<'a> {
    pub snap: &'a GameSnapshot,
    /// Latest top list (home screen).
    pub top: &'a [HighScoreEntry],
    /// Present while the player is entering a name.
    pub prompt: Option<PromptView<'a>>,
    /// One-line status under the game-over banner.
    pub status: Option<&'a str>,
}

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell keeps cells roughly square.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    pub fn render_into(&self, model: &ViewModel<'_>, width: u16, height: u16, frame: &mut Frame) {
        frame.resize(width, height);
        frame.fill(Glyph {
            ch: ' ',
            style: TEXT,
        });

        match model.snap.state {
            RunState::Home => self.draw_home(model.top, frame),
            RunState::Playing | RunState::Paused | RunState::GameOver => {
                self.draw_game(model, frame)
            }
        }
    }

    pub fn render(&self, model: &ViewModel<'_>, width: u16, height: u16) -> Frame {
        let mut frame = Frame::new(width, height);
        self.render_into(model, width, height, &mut frame);
        frame
    }

    fn draw_home(&self, top: &[HighScoreEntry], frame: &mut Frame) {
        let mut y = frame.height().saturating_sub(18) / 2;
        frame.text_centered(y, "S T A C K L O G I C", TITLE);
        y += 2;
        frame.text_centered(y, "High Scores", TEXT.bold());
        y += 2;

        if top.is_empty() {
            frame.text_centered(y, "No scores yet", MUTED);
            y += 1;
        } else {
            for (i, entry) in top.iter().enumerate() {
                let line = format!("{:>2}. {:<16} {:>10}", i + 1, entry.name, entry.score);
                frame.text_centered(y, &line, TEXT);
                y += 1;
            }
        }

        y += 1;
        frame.text_centered(y, "Enter / Space  start", TEXT);
        frame.text_centered(y + 1, "Q  quit", MUTED);
    }

    fn draw_game(&self, model: &ViewModel<'_>, frame: &mut Frame) {
        let snap = model.snap;
        let board_w = BOARD_WIDTH as u16 * self.cell_w;
        let board_h = BOARD_HEIGHT as u16;
        let panel_w = 22;

        let left = frame.width().saturating_sub(board_w + 2 + panel_w) / 2;
        let top = frame.height().saturating_sub(board_h + 2) / 2;

        self.draw_border(frame, left, top, board_w + 2, board_h + 2);
        frame.rect(left + 1, top + 1, board_w, board_h, ' ', Style::new(WELL, WELL));

        for (y, row) in snap.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(kind) = cell {
                    self.draw_cell(frame, left, top, x as u8, y as u8, *kind);
                }
            }
        }
        if let Some(active) = snap.active {
            for (x, y) in active.visible_cells() {
                self.draw_cell(frame, left, top, x, y, active.kind);
            }
        }

        let px = left + board_w + 4;
        frame.text(px, top + 1, "SCORE", MUTED);
        frame.text(px, top + 2, &snap.score.to_string(), TEXT.bold());
        frame.text(px, top + 4, "LINES", MUTED);
        frame.text(px, top + 5, &snap.lines.to_string(), TEXT);
        frame.text(px, top + 7, "LEVEL", MUTED);
        frame.text(px, top + 8, &snap.level.to_string(), TEXT);

        let help = [
            "<- ->  move",
            "down   soft drop",
            "up x   rotate",
            "z      rotate back",
            "space  hard drop",
            "p      pause",
            "r      home",
        ];
        for (i, line) in help.iter().enumerate() {
            frame.text(px, top + 11 + i as u16, line, MUTED);
        }

        let mid = top + board_h / 2;
        match snap.state {
            RunState::Paused => {
                frame.text_centered(mid, " PAUSED ", TITLE);
                frame.text_centered(mid + 1, " P resume  R home ", TEXT);
            }
            RunState::GameOver => self.draw_game_over(model, frame, mid),
            _ => {}
        }
    }

    fn draw_game_over(&self, model: &ViewModel<'_>, frame: &mut Frame, mid: u16) {
        let y = mid.saturating_sub(3);
        frame.text_centered(y, " GAME OVER ", TITLE);
        if let Some(reason) = model.snap.game_over_reason {
            frame.text_centered(y + 1, &format!(" {} ", reason.message()), TEXT);
        }

        if let Some(prompt) = model.prompt {
            frame.text_centered(
                y + 3,
                &format!(" New high score: {} (#{}) ", prompt.score, prompt.rank),
                TEXT.bold(),
            );
            frame.text_centered(y + 4, &format!(" Name: {:<16}_ ", prompt.name), TEXT);
            frame.text_centered(y + 5, " Enter save  Esc skip ", MUTED);
        } else if let Some(status) = model.status {
            frame.text_centered(y + 3, &format!(" {} ", status), MUTED);
        }
    }

    fn draw_border(&self, frame: &mut Frame, x: u16, y: u16, w: u16, h: u16) {
        if w < 2 || h < 2 {
            return;
        }
        let right = x + w - 1;
        let bottom = y + h - 1;
        for xx in x + 1..right {
            frame.put(xx, y, '─', BORDER);
            frame.put(xx, bottom, '─', BORDER);
        }
        for yy in y + 1..bottom {
            frame.put(x, yy, '│', BORDER);
            frame.put(right, yy, '│', BORDER);
        }
        frame.put(x, y, '┌', BORDER);
        frame.put(right, y, '┐', BORDER);
        frame.put(x, bottom, '└', BORDER);
        frame.put(right, bottom, '┘', BORDER);
    }

    fn draw_cell(&self, frame: &mut Frame, left: u16, top: u16, x: u8, y: u8, kind: PieceKind) {
        let color = Rgb::from(display_rgb(kind));
        let style = Style::new(color, color);
        let sx = left + 1 + x as u16 * self.cell_w;
        let sy = top + 1 + y as u16;
        frame.rect(sx, sy, self.cell_w, 1, '█', style);
    }
}
