//! Game state module - one self-contained run of the game
//!
//! [`GameSession`] owns the board, the active piece, the bag and the run
//! counters. It has no timers or I/O of its own: the host feeds elapsed time
//! through [`GameSession::tick`] and discrete commands through the action
//! methods (or [`GameSession::apply_action`]). Rejected moves are silent
//! no-ops that return `false`.
//!
//! Run states: `Home → Playing ⇄ Paused`, `Playing → GameOver → Home`.
//! Reaching `GameOver` freezes input and queues a [`GameOverEvent`] for the
//! caller; the session never waits on the high-score follow-up itself.

use crate::board::{Board, ClearedRows};
use crate::piece::{try_rotate, Piece, RotateDir};
use crate::rng::Bag;
use crate::scoring::{calculate_drop_score, calculate_line_score, get_drop_interval_ms, level_for_lines};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;

/// What happened when the last piece locked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    pub cleared_rows: ClearedRows,
    pub line_clear_score: u32,
    pub overflowed: bool,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    active: Option<Piece>,
    bag: Bag,
    score: u32,
    lines: u32,
    level: u32,
    drop_interval_ms: u32,
    /// Gravity accumulator; emptied every time a gravity step fires.
    drop_timer_ms: u32,
    state: RunState,
    game_over_reason: Option<GameOverReason>,
    /// Raised at game over, consumed once by the host.
    pending_game_over: Option<GameOverEvent>,
    /// Last lock event (consumed by observers).
    last_event: Option<LockEvent>,
}

impl GameSession {
    /// Create a session on the home screen with the given bag seed
    pub fn new(seed: u32) -> Self {
        let mut session = Self {
            board: Board::new(),
            active: None,
            bag: Bag::new(seed),
            score: 0,
            lines: 0,
            level: 1,
            drop_interval_ms: get_drop_interval_ms(1),
            drop_timer_ms: 0,
            state: RunState::Home,
            game_over_reason: None,
            pending_game_over: None,
            last_event: None,
        };
        session.reset();
        session
    }

    /// Empty board, fresh bag, zeroed counters and a newly spawned piece.
    fn reset(&mut self) {
        self.board.clear();
        self.bag.reset();
        self.active = None;
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.drop_interval_ms = get_drop_interval_ms(self.level);
        self.drop_timer_ms = 0;
        self.game_over_reason = None;
        self.pending_game_over = None;
        self.last_event = None;
        self.spawn_piece();
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    /// Take the game-over signal, if the run has just ended.
    ///
    /// Returns `Some` exactly once per run.
    pub fn take_game_over(&mut self) -> Option<GameOverEvent> {
        self.pending_game_over.take()
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = self.active.map(ActiveSnapshot::from);
        out.score = self.score;
        out.lines = self.lines;
        out.level = self.level;
        out.drop_interval_ms = self.drop_interval_ms;
        out.state = self.state;
        out.game_over_reason = self.game_over_reason;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Reset and start playing.
    ///
    /// Allowed from home, or mid-run as a restart. Refused at game over: the
    /// caller must finish the high-score follow-up and go home first.
    pub fn new_game(&mut self) -> bool {
        if self.state == RunState::GameOver {
            return false;
        }
        self.reset();
        self.state = RunState::Playing;
        true
    }

    /// Abandon whatever is going on and return to the home screen
    pub fn go_home(&mut self) -> bool {
        self.reset();
        self.state = RunState::Home;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != RunState::Playing {
            return false;
        }
        self.state = RunState::Paused;
        true
    }

    /// Continue a paused run.
    ///
    /// The accumulator keeps whatever it held when the run paused; time that
    /// passed while paused was never fed in.
    pub fn resume(&mut self) -> bool {
        if self.state != RunState::Paused {
            return false;
        }
        self.state = RunState::Playing;
        true
    }

    /// Advance gravity by `elapsed_ms`.
    ///
    /// Returns true when a gravity step fired (the piece moved or locked).
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.state != RunState::Playing || self.active.is_none() {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms <= self.drop_interval_ms {
            return false;
        }

        if !self.try_move(0, 1) {
            self.lock_piece();
        }
        self.drop_timer_ms = 0;
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Move the piece one row down for 1 point, or lock it where it is.
    ///
    /// Returns true if the piece moved.
    pub fn soft_drop(&mut self) -> bool {
        if self.state != RunState::Playing {
            return false;
        }
        let moved = self.try_move(0, 1);
        if moved {
            self.score = self
                .score
                .saturating_add(calculate_drop_score(1, false));
        } else {
            self.lock_piece();
        }
        self.drop_timer_ms = 0;
        moved
    }

    /// Drop the piece to its resting row, 2 points per row, and lock it.
    pub fn hard_drop(&mut self) -> bool {
        if self.state != RunState::Playing {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let mut landed = active;
        let mut distance: u32 = 0;
        loop {
            let next = landed.translated(0, 1);
            if self.board.collides(&next) {
                break;
            }
            landed = next;
            distance += 1;
        }

        self.active = Some(landed);
        self.score = self
            .score
            .saturating_add(calculate_drop_score(distance, true));
        self.lock_piece();
        true
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.rotate(RotateDir::Clockwise)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.rotate(RotateDir::CounterClockwise)
    }

    /// Rotate with horizontal wall kicks; the piece is unchanged on failure.
    pub fn rotate(&mut self, dir: RotateDir) -> bool {
        if self.state != RunState::Playing {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match try_rotate(&active, dir, |p| self.board.collides(p)) {
            Some((rotated, _kick)) => {
                self.active = Some(rotated);
                true
            }
            None => false,
        }
    }

    /// Try to move the active piece
    pub(crate) fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if self.state != RunState::Playing {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let moved = active.translated(dx, dy);
        if self.board.collides(&moved) {
            return false;
        }
        self.active = Some(moved);
        true
    }

    /// Spawn a new piece from the bag.
    ///
    /// The spawn fails, ending the run, when the piece collides at its anchor
    /// or no column and orientation lets it enter row 0.
    pub fn spawn_piece(&mut self) -> bool {
        let piece = Piece::spawn(self.bag.draw());
        self.active = Some(piece);

        if self.board.collides(&piece) || !self.can_enter(&piece) {
            self.trigger_game_over(GameOverReason::NoSpaceToSpawn);
            return false;
        }
        true
    }

    /// Above row 0 only the walls block, so every column and orientation is
    /// reachable from the spawn anchor.
    fn can_enter(&self, piece: &Piece) -> bool {
        let mut shape = *piece;
        for _ in 0..4 {
            let size = shape.shape.size() as i8;
            for x in -size..BOARD_WIDTH as i8 {
                if !self.board.collides(&Piece { x, ..shape }.entry_position()) {
                    return true;
                }
            }
            shape = shape.rotated(RotateDir::Clockwise);
        }
        false
    }

    /// Lock the active piece, clear rows, score, re-level and spawn the next
    pub fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        if self.board.merge(&active) {
            self.last_event = Some(LockEvent {
                kind: active.kind,
                lines_cleared: 0,
                cleared_rows: ClearedRows::new(),
                line_clear_score: 0,
                overflowed: true,
            });
            self.trigger_game_over(GameOverReason::StackedAboveTop);
            return;
        }

        let cleared_rows = self.board.clear_full_rows();
        let lines_cleared = cleared_rows.len();

        let mut line_clear_score = 0;
        if lines_cleared > 0 {
            line_clear_score = calculate_line_score(lines_cleared, self.level);
            self.score = self.score.saturating_add(line_clear_score);
            self.lines += lines_cleared as u32;
            self.level = level_for_lines(self.lines);
            self.drop_interval_ms = get_drop_interval_ms(self.level);
        }

        self.last_event = Some(LockEvent {
            kind: active.kind,
            lines_cleared: lines_cleared as u32,
            cleared_rows,
            line_clear_score,
            overflowed: false,
        });

        self.spawn_piece();
    }

    fn trigger_game_over(&mut self, reason: GameOverReason) {
        if self.state == RunState::GameOver {
            return;
        }
        self.state = RunState::GameOver;
        self.game_over_reason = Some(reason);
        self.pending_game_over = Some(GameOverEvent {
            reason,
            score: self.score,
            lines: self.lines,
            level: self.level,
        });
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::NewGame => self.new_game(),
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.rotate_cw(),
            GameAction::RotateCcw => self.rotate_ccw(),
            GameAction::Pause => self.pause(),
            GameAction::Resume => self.resume(),
            GameAction::GoHome => self.go_home(),
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> GameSession {
        let mut s = GameSession::new(12345);
        assert!(s.new_game());
        s
    }

    /// Fill rows completely except the given columns.
    fn fill_rows_except(s: &mut GameSession, rows: &[i8], gap: &[i8]) {
        for &y in rows {
            for x in 0..BOARD_WIDTH as i8 {
                if !gap.contains(&x) {
                    s.board.set(x, y, Some(PieceKind::J));
                }
            }
        }
    }

    #[test]
    fn test_new_session_is_home_with_piece() {
        let s = GameSession::new(1);
        assert_eq!(s.state(), RunState::Home);
        assert!(s.active().is_some());
        assert_eq!(s.score(), 0);
        assert_eq!(s.lines(), 0);
        assert_eq!(s.level(), 1);
        assert_eq!(s.drop_interval_ms(), 800);
    }

    #[test]
    fn test_input_ignored_at_home() {
        let mut s = GameSession::new(1);
        let before = s.active();
        assert!(!s.move_left());
        assert!(!s.rotate_cw());
        assert!(!s.hard_drop());
        assert!(!s.tick(5000));
        assert!(!s.pause());
        assert_eq!(s.active(), before);
    }

    #[test]
    fn test_new_game_starts_playing() {
        let s = playing();
        assert_eq!(s.state(), RunState::Playing);
        let piece = s.active().unwrap();
        assert!(piece.y < 0);
    }

    #[test]
    fn test_tick_requires_exceeding_interval() {
        let mut s = playing();
        let y0 = s.active().unwrap().y;

        assert!(!s.tick(400));
        assert!(!s.tick(400)); // exactly 800: not yet
        assert_eq!(s.drop_timer_ms(), 800);
        assert!(s.tick(1));
        assert_eq!(s.active().unwrap().y, y0 + 1);
        assert_eq!(s.drop_timer_ms(), 0);
    }

    #[test]
    fn test_tick_discards_remainder() {
        let mut s = playing();
        assert!(s.tick(5000));
        assert_eq!(s.drop_timer_ms(), 0);
    }

    #[test]
    fn test_pause_freezes_gravity() {
        let mut s = playing();
        s.tick(500);
        assert!(s.pause());
        assert_eq!(s.state(), RunState::Paused);
        assert!(!s.tick(10_000));
        assert!(!s.move_left());
        assert!(!s.pause());
        assert!(s.resume());
        assert!(!s.resume());
        assert_eq!(s.drop_timer_ms(), 500);
    }

    #[test]
    fn test_move_rejected_at_wall() {
        let mut s = playing();
        let mut moves = 0;
        while s.move_left() {
            moves += 1;
            assert!(moves < BOARD_WIDTH as usize);
        }
        let x = s.active().unwrap().x;
        assert!(!s.move_left());
        assert_eq!(s.active().unwrap().x, x);
    }

    #[test]
    fn test_soft_drop_awards_one_point() {
        let mut s = playing();
        s.tick(300);
        assert!(s.soft_drop());
        assert_eq!(s.score(), 1);
        assert_eq!(s.drop_timer_ms(), 0);
    }

    #[test]
    fn test_soft_drop_locks_on_floor() {
        let mut s = playing();
        s.active = Some(Piece::spawn(PieceKind::O).translated(0, 20));
        assert!(!s.soft_drop());
        assert_eq!(s.score(), 0);
        assert!(s.board().is_occupied(4, 19));
        assert_eq!(s.take_last_event().unwrap().kind, PieceKind::O);
    }

    #[test]
    fn test_hard_drop_scores_and_spawns_next() {
        let mut s = playing();
        s.active = Some(Piece::spawn(PieceKind::O));
        assert!(s.hard_drop());
        // O from y=-2 to y=18.
        assert_eq!(s.score(), 40);
        assert!(s.board().is_occupied(4, 19));
        assert!(s.board().is_occupied(5, 18));
        assert!(s.active().is_some());
        assert_eq!(s.state(), RunState::Playing);
    }

    #[test]
    fn test_line_clear_scores_level_one() {
        let mut s = playing();
        fill_rows_except(&mut s, &[18, 19], &[4, 5]);
        s.active = Some(Piece::spawn(PieceKind::O));
        s.hard_drop();

        let event = s.take_last_event().unwrap();
        assert_eq!(event.lines_cleared, 2);
        assert_eq!(event.line_clear_score, 300);
        assert_eq!(s.score(), 40 + 300);
        assert_eq!(s.lines(), 2);
        assert!(s.board().cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_tetris_scores_eight_hundred() {
        let mut s = playing();
        fill_rows_except(&mut s, &[16, 17, 18, 19], &[0]);
        let vertical_i = Piece::spawn(PieceKind::I).rotated(RotateDir::CounterClockwise);
        // Counter-clockwise I occupies matrix column 1.
        s.active = Some(Piece { x: -1, ..vertical_i });
        s.hard_drop();
        let event = s.take_last_event().unwrap();
        assert_eq!(event.lines_cleared, 4);
        assert_eq!(event.line_clear_score, 800);
    }

    #[test]
    fn test_level_two_doubles_and_level_up() {
        let mut s = playing();
        s.lines = 9;
        fill_rows_except(&mut s, &[19], &[4, 5]);
        s.active = Some(Piece::spawn(PieceKind::O));
        s.hard_drop();
        assert_eq!(s.lines(), 10);
        assert_eq!(s.level(), 2);
        assert_eq!(s.drop_interval_ms(), 740);

        s.board.clear();
        fill_rows_except(&mut s, &[19], &[4, 5]);
        let before = s.score();
        s.active = Some(Piece::spawn(PieceKind::O));
        s.hard_drop();
        let event = s.take_last_event().unwrap();
        assert_eq!(event.lines_cleared, 1);
        assert_eq!(event.line_clear_score, 200);
        assert_eq!(s.score() - before, 200 + 2 * 20);
    }

    #[test]
    fn test_lock_above_top_ends_run() {
        let mut s = playing();
        for x in 3..=6 {
            s.board.set(x, 0, Some(PieceKind::Z));
        }
        s.active = Some(Piece::spawn(PieceKind::O));
        s.hard_drop();

        assert_eq!(s.state(), RunState::GameOver);
        assert_eq!(s.game_over_reason(), Some(GameOverReason::StackedAboveTop));
        assert!(s.take_last_event().unwrap().overflowed);

        let event = s.take_game_over().unwrap();
        assert_eq!(event.reason, GameOverReason::StackedAboveTop);
        assert!(s.take_game_over().is_none());
    }

    #[test]
    fn test_full_top_row_blocks_spawn() {
        let mut s = playing();
        s.board.fill_row(0, PieceKind::L);
        assert!(!s.spawn_piece());
        assert_eq!(s.state(), RunState::GameOver);
        assert_eq!(
            s.take_game_over().map(|e| e.reason),
            Some(GameOverReason::NoSpaceToSpawn)
        );
    }

    #[test]
    fn test_one_block_on_top_row_does_not_block_spawn() {
        let mut s = playing();
        s.board.set(4, 0, Some(PieceKind::J));
        assert!(s.spawn_piece());
        assert_eq!(s.state(), RunState::Playing);
        assert!(s.take_game_over().is_none());

        // The player steers around the block before it reaches the board.
        for _ in 0..3 {
            s.move_left();
        }
        assert!(!s.board.collides(&s.active().unwrap().entry_position()));
    }

    #[test]
    fn test_game_over_freezes_input() {
        let mut s = playing();
        s.board.fill_row(0, PieceKind::L);
        s.spawn_piece();
        let piece = s.active();

        assert!(!s.move_right());
        assert!(!s.rotate_ccw());
        assert!(!s.soft_drop());
        assert!(!s.hard_drop());
        assert!(!s.tick(10_000));
        assert!(!s.pause());
        assert!(!s.new_game());
        assert_eq!(s.active(), piece);
    }

    #[test]
    fn test_go_home_resets_run() {
        let mut s = playing();
        s.score = 500;
        s.board.fill_row(0, PieceKind::L);
        s.spawn_piece();
        assert!(s.go_home());
        assert_eq!(s.state(), RunState::Home);
        assert_eq!(s.score(), 0);
        assert!(s.board().cells().iter().all(|c| c.is_none()));
        assert!(s.game_over_reason().is_none());
        assert!(s.take_game_over().is_none());
    }

    #[test]
    fn test_rotation_kicks_off_left_wall() {
        let mut s = playing();
        let vertical = Piece::spawn(PieceKind::I).rotated(RotateDir::Clockwise);
        // Clockwise I occupies matrix column 2; x=-2 puts it against the wall.
        s.active = Some(Piece { x: -2, y: 5, ..vertical });
        assert!(s.rotate_cw());
        let rotated = s.active().unwrap();
        assert_eq!(rotated.x, 0);
        assert!(rotated.cells().all(|(x, _)| x >= 0));
    }

    #[test]
    fn test_rotation_reverts_when_boxed_in() {
        let mut s = playing();
        let vertical = Piece::spawn(PieceKind::I).rotated(RotateDir::Clockwise);
        s.active = Some(Piece { x: 2, y: 10, ..vertical });
        // Column 4 is the I; fill everything else on its rows.
        for y in 10..14 {
            for x in 0..BOARD_WIDTH as i8 {
                if x != 4 {
                    s.board.set(x, y, Some(PieceKind::S));
                }
            }
        }
        let before = s.active();
        assert!(!s.rotate_cw());
        assert!(!s.rotate_ccw());
        assert_eq!(s.active(), before);
    }

    #[test]
    fn test_apply_action_dispatch() {
        let mut s = GameSession::new(3);
        assert!(s.apply_action(GameAction::NewGame));
        assert!(s.apply_action(GameAction::Pause));
        assert_eq!(s.state(), RunState::Paused);
        assert!(s.apply_action(GameAction::Resume));
        assert!(s.apply_action(GameAction::HardDrop));
        assert!(s.score() > 0);
        assert!(s.apply_action(GameAction::GoHome));
        assert_eq!(s.state(), RunState::Home);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut s = playing();
        s.active = Some(Piece::spawn(PieceKind::T).translated(0, 10));
        s.board.set(0, 19, Some(PieceKind::Z));
        let snap = s.snapshot();
        assert_eq!(snap.state, RunState::Playing);
        assert_eq!(snap.board[19][0], Some(PieceKind::Z));
        let active = snap.active.unwrap();
        assert_eq!(active.kind, PieceKind::T);
        assert_eq!(active.visible_cells().count(), 4);
        assert_eq!(snap.drop_interval_ms, 800);
    }
}
