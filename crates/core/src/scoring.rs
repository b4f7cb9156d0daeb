//! Scoring module - line clear points, drop points and the level schedule

use crate::types::{
    DROP_DECREASE_PER_LEVEL_MS, HARD_DROP_POINTS_PER_ROW, LARGE_CLEAR_POINTS_PER_ROW,
    LINES_PER_LEVEL, LINE_SCORES, MIN_DROP_MS, SOFT_DROP_POINTS, START_DROP_MS,
};

/// Points for clearing `lines` rows in one lock at `level` (1-based).
///
/// Uses the 0/100/300/500/800 table; anything above four rows is scored at
/// 200 per row. Both are multiplied by the level.
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    let base = match LINE_SCORES.get(lines) {
        Some(&points) => points,
        None => (lines as u32).saturating_mul(LARGE_CLEAR_POINTS_PER_ROW),
    };
    base.saturating_mul(level)
}

/// Points for a drop
///
/// `hard_drop`: 2 points per row travelled; otherwise 1 point per soft step.
pub fn calculate_drop_score(rows: u32, hard_drop: bool) -> u32 {
    if hard_drop {
        rows.saturating_mul(HARD_DROP_POINTS_PER_ROW)
    } else {
        rows.saturating_mul(SOFT_DROP_POINTS)
    }
}

/// Level for a running total of cleared lines (starts at 1)
pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level: `max(80, 800 - (level-1) * 60)` ms
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let reduction = level
        .saturating_sub(1)
        .saturating_mul(DROP_DECREASE_PER_LEVEL_MS);
    START_DROP_MS.saturating_sub(reduction).max(MIN_DROP_MS)
}
