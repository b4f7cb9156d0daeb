//! TCP client for the score service.
//!
//! Opens one connection per request with bounded connect and reply times.
//! Every failure comes back as an error; falling back is the job of
//! [`CachedGateway`](crate::cache::CachedGateway).

use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::entry::{sanitize_name, sort_and_truncate, HighScoreEntry};
use crate::gateway::{HighScoreGateway, SubmitError, SubmitOutcome};
use crate::protocol::*;
use crate::server::{DEFAULT_HOST, DEFAULT_PORT};

pub const DEFAULT_TIMEOUT_MS: u64 = 1500;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Applies separately to connecting and to waiting for the reply.
    pub timeout: Duration,
    /// Fail every request without touching the network.
    pub disabled: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            disabled: false,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("STACKLOGIC_SCORES_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = env::var("STACKLOGIC_SCORES_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let timeout_ms = env::var("STACKLOGIC_SCORES_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            host,
            port,
            timeout: Duration::from_millis(timeout_ms),
            disabled: Self::is_disabled(),
        }
    }

    /// Check if the network service is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("STACKLOGIC_SCORES_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct RemoteGateway {
    config: ClientConfig,
}

impl RemoteGateway {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one request and wait for its reply line.
    pub async fn request(&self, req: &Request) -> anyhow::Result<Response> {
        if self.config.disabled {
            bail!("score service disabled");
        }
        let target = format!("{}:{}", self.config.host, self.config.port);

        let stream = timeout(self.config.timeout, TcpStream::connect(&target))
            .await
            .map_err(|_| anyhow!("connecting to {} timed out", target))?
            .with_context(|| format!("connecting to {}", target))?;
        let (reader, mut writer) = stream.into_split();

        writer.write_all(&encode_line(req)?).await?;
        writer.flush().await?;

        // Replies are capped like requests.
        let mut reader = BufReader::new(reader);
        let mut buf: Vec<u8> = Vec::with_capacity(256);
        let n = timeout(
            self.config.timeout,
            (&mut reader)
                .take(MAX_LINE_BYTES as u64 + 1)
                .read_until(b'\n', &mut buf),
        )
        .await
        .map_err(|_| anyhow!("no reply from {} in time", target))??;
        if n == 0 {
            bail!("{} closed the connection without replying", target);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        } else if buf.len() > MAX_LINE_BYTES {
            bail!("reply from {} exceeds {} bytes", target, MAX_LINE_BYTES);
        }

        let line = String::from_utf8_lossy(&buf);
        let response = parse_response(line.trim()).context("malformed reply")?;
        match response {
            Response::Error {
                error: ErrorCode::InvalidScore,
                ..
            } => Err(SubmitError::InvalidScore.into()),
            Response::Error { error, .. } => bail!("server error: {}", error.as_str()),
            other => Ok(other),
        }
    }

    pub async fn health(&self) -> anyhow::Result<bool> {
        match self.request(&Request::Health).await? {
            Response::Health { ok } => Ok(ok),
            other => bail!("unexpected reply to health: {:?}", other),
        }
    }
}

impl HighScoreGateway for RemoteGateway {
    async fn fetch_top(&self, limit: usize) -> anyhow::Result<Vec<HighScoreEntry>> {
        match self.request(&Request::Fetch { limit }).await? {
            Response::Scores { mut scores, .. } => {
                sort_and_truncate(&mut scores);
                scores.truncate(limit);
                Ok(scores)
            }
            other => bail!("unexpected reply to fetch: {:?}", other),
        }
    }

    async fn submit(&self, name: &str, score: u64) -> anyhow::Result<SubmitOutcome> {
        let req = create_submit(&sanitize_name(name), score);
        match self.request(&req).await? {
            Response::Submitted {
                saved, mut scores, ..
            } => {
                sort_and_truncate(&mut scores);
                Ok(SubmitOutcome { saved, scores })
            }
            other => bail!("unexpected reply to submit: {:?}", other),
        }
    }
}
