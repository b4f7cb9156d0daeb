//! TCP server for the score service
//!
//! One task per connection. Each request line gets exactly one response
//! line. A line longer than [`MAX_LINE_BYTES`] gets `payload_too_large` and
//! the connection is closed.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use crate::entry::sanitize_score;
use crate::gateway::{HighScoreGateway, SubmitError};
use crate::protocol::*;
use crate::types::HIGHSCORE_MAX;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "data";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding `highscores.json`.
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
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
        let data_dir = env::var("STACKLOGIC_DATA_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Self {
            host,
            port,
            data_dir,
        }
    }
}

/// Fail fast if something already listens on `host:port`.
pub fn check_listen_available(host: &str, port: u16) -> std::io::Result<()> {
    let listener = std::net::TcpListener::bind((host, port))?;
    drop(listener);
    Ok(())
}

/// Serve `gateway` until the listener fails.
///
/// `ready_tx` receives the bound address once accepting (useful with port 0).
pub async fn run_server<G>(
    config: ServerConfig,
    gateway: Arc<G>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()>
where
    G: HighScoreGateway + 'static,
{
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("binding {}:{}", config.host, config.port))?;
    let bound = listener.local_addr()?;
    log::info!("score server listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0usize;
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        log::debug!("client {} connected from {}", client_id, addr);

        let gateway = Arc::clone(&gateway);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, gateway).await {
                log::error!("client {} error: {:#}", client_id, e);
            }
            log::debug!("client {} disconnected", client_id);
        });
    }
}

/// Handle a single client connection
async fn handle_client<G: HighScoreGateway>(
    socket: TcpStream,
    client_id: usize,
    gateway: Arc<G>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let mut buf: Vec<u8> = Vec::with_capacity(256);

    loop {
        buf.clear();
        let n = (&mut reader)
            .take(MAX_LINE_BYTES as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await?;
        if n == 0 {
            break;
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
        } else if buf.len() > MAX_LINE_BYTES {
            log::warn!("client {} sent an oversized line", client_id);
            writer
                .write_all(&encode_line(&Response::error(ErrorCode::PayloadTooLarge))?)
                .await?;
            writer.flush().await?;
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match parse_request(trimmed) {
            Ok(req) => {
                log::debug!("client {} -> {:?}", client_id, req);
                handle_request(gateway.as_ref(), req).await
            }
            Err(e) => {
                log::debug!("client {} sent a bad request: {}", client_id, e);
                Response::error(ErrorCode::BadRequest)
            }
        };

        writer.write_all(&encode_line(&response)?).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Answer one request.
pub async fn handle_request<G: HighScoreGateway>(gateway: &G, req: Request) -> Response {
    match req {
        Request::Health => Response::Health { ok: true },
        Request::Fetch { limit } => match gateway.fetch_top(limit.min(HIGHSCORE_MAX)).await {
            Ok(scores) => Response::Scores { ok: true, scores },
            Err(e) => {
                log::error!("fetch failed: {:#}", e);
                Response::error(ErrorCode::Internal)
            }
        },
        Request::Submit { name, score } => {
            let Some(score) = sanitize_score(&score) else {
                return Response::error(ErrorCode::InvalidScore);
            };
            let name = match name {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            match gateway.submit(&name, score).await {
                Ok(outcome) => Response::Submitted {
                    ok: true,
                    saved: outcome.saved,
                    scores: outcome.scores,
                },
                Err(e) if e.downcast_ref::<SubmitError>().is_some() => {
                    Response::error(ErrorCode::InvalidScore)
                }
                Err(e) => {
                    log::error!("submit failed: {:#}", e);
                    Response::error(ErrorCode::Internal)
                }
            }
        }
    }
}
