//! High-score entries and the rules every list obeys.
//!
//! A list is at most [`HIGHSCORE_MAX`] entries, sorted by score descending.
//! Among equal scores the earlier arrival stays ahead.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{HIGHSCORE_MAX, MAX_SUBMITTED_SCORE, NAME_MAX_LEN};

/// Name stored when sanitization leaves nothing.
pub const ANON_NAME: &str = "Anon";

/// One persisted score.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Unix milliseconds of the submission.
    pub ts: u64,
}

impl HighScoreEntry {
    /// New entry stamped with the current time. The name is sanitized.
    pub fn new(name: &str, score: u64) -> Self {
        Self {
            name: sanitize_name(name),
            score,
            ts: now_ms(),
        }
    }
}

/// Trim, keep the first 16 characters, then drop anything outside
/// `[A-Za-z0-9 _-]`. An empty result becomes `"Anon"`.
pub fn sanitize_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .take(NAME_MAX_LEN)
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();

    if cleaned.is_empty() {
        ANON_NAME.to_string()
    } else {
        cleaned
    }
}

/// Accept a wire score: a JSON number or a numeric string, finite, floored,
/// within `0..=1_000_000_000`.
pub fn sanitize_score(value: &Value) -> Option<u64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    let floored = n.floor();
    if floored < 0.0 || floored > MAX_SUBMITTED_SCORE as f64 {
        return None;
    }
    Some(floored as u64)
}

/// Repair a stored or received document into a valid list.
///
/// Anything that is not an array yields an empty list. Records without a
/// numeric `score` and a string `name` are dropped; names are cut to 16
/// characters, scores floored, and a missing or unusable `ts` becomes now.
pub fn normalize_entries(doc: &Value) -> Vec<HighScoreEntry> {
    let Some(items) = doc.as_array() else {
        return Vec::new();
    };

    let now = now_ms();
    let mut out: Vec<HighScoreEntry> = items
        .iter()
        .filter_map(|item| {
            let name = item.get("name")?.as_str()?;
            let score = item.get("score")?.as_f64()?;
            if !score.is_finite() {
                return None;
            }
            let ts = item
                .get("ts")
                .and_then(Value::as_f64)
                .filter(|t| t.is_finite() && *t > 0.0)
                .map(|t| t as u64)
                .unwrap_or(now);
            Some(HighScoreEntry {
                name: name.chars().take(NAME_MAX_LEN).collect(),
                score: score.floor().max(0.0) as u64,
                ts,
            })
        })
        .collect();

    sort_and_truncate(&mut out);
    out
}

/// Parse raw JSON text with [`normalize_entries`]; malformed text is empty.
pub fn parse_entries(raw: &str) -> Vec<HighScoreEntry> {
    match serde_json::from_str::<Value>(raw) {
        Ok(doc) => normalize_entries(&doc),
        Err(_) => Vec::new(),
    }
}

/// Stable sort by score descending, then cap at the list size.
pub fn sort_and_truncate(list: &mut Vec<HighScoreEntry>) {
    list.sort_by(|a, b| b.score.cmp(&a.score));
    list.truncate(HIGHSCORE_MAX);
}

/// Where `score` would land in `list`: after every entry with an equal or
/// higher score.
pub fn insert_position(list: &[HighScoreEntry], score: u64) -> usize {
    list.iter()
        .position(|e| e.score < score)
        .unwrap_or(list.len())
}

/// Merge `candidate` into `list`.
///
/// Returns true and updates the list if the candidate made the cut; leaves
/// the list untouched otherwise.
pub fn merge_entry(list: &mut Vec<HighScoreEntry>, candidate: HighScoreEntry) -> bool {
    let pos = insert_position(list, candidate.score);
    if pos >= HIGHSCORE_MAX {
        return false;
    }
    list.insert(pos, candidate);
    list.truncate(HIGHSCORE_MAX);
    true
}

/// Advisory check before prompting for a name.
///
/// A score qualifies when the list has a free slot, or when it beats the
/// last entry. Tying the last entry is not enough.
pub fn qualifies(list: &[HighScoreEntry], score: u64) -> bool {
    if list.len() < HIGHSCORE_MAX {
        return true;
    }
    list.get(HIGHSCORE_MAX - 1)
        .map(|last| score > last.score)
        .unwrap_or(true)
}

/// 1-based rank the score would take, if it qualifies.
pub fn potential_rank(list: &[HighScoreEntry], score: u64) -> Option<usize> {
    if !qualifies(list, score) {
        return None;
    }
    Some(insert_position(list, score) + 1)
}

pub(crate) fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
