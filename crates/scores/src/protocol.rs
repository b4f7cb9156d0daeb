//! Protocol module - line-delimited JSON messages for the score service
//!
//! Every request and response is one JSON object on one line, tagged by
//! `type`. Scores in requests are kept as raw JSON values so the server can
//! accept numeric strings and report out-of-range values as
//! `invalid_score` instead of a parse failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entry::HighScoreEntry;
use crate::types::HIGHSCORE_MAX;

/// Longest accepted request line, newline excluded.
pub const MAX_LINE_BYTES: usize = 4 * 1024;

/// Client -> server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Health,
    Fetch {
        #[serde(default = "default_limit")]
        limit: usize,
    },
    Submit {
        #[serde(default)]
        name: Value,
        #[serde(default)]
        score: Value,
    },
}

fn default_limit() -> usize {
    HIGHSCORE_MAX
}

/// Server -> client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Health {
        ok: bool,
    },
    Scores {
        ok: bool,
        scores: Vec<HighScoreEntry>,
    },
    Submitted {
        ok: bool,
        saved: bool,
        scores: Vec<HighScoreEntry>,
    },
    Error {
        ok: bool,
        error: ErrorCode,
    },
}

impl Response {
    pub fn error(code: ErrorCode) -> Self {
        Response::Error { ok: false, error: code }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidScore,
    BadRequest,
    PayloadTooLarge,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidScore => "invalid_score",
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::PayloadTooLarge => "payload_too_large",
            ErrorCode::Internal => "internal",
        }
    }
}

pub fn parse_request(line: &str) -> Result<Request, serde_json::Error> {
    serde_json::from_str(line)
}

pub fn parse_response(line: &str) -> Result<Response, serde_json::Error> {
    serde_json::from_str(line)
}

/// Serialize a message followed by a newline.
pub fn encode_line<T: Serialize>(msg: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = serde_json::to_vec(msg)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Submission request with the score as a plain number.
pub fn create_submit(name: &str, score: u64) -> Request {
    Request::Submit {
        name: Value::String(name.to_string()),
        score: Value::from(score),
    }
}
