//! High-score gateway - persistence, wire protocol and the game-over flow
//!
//! Everything the game needs to keep a top-10 list lives here, outside the
//! engine. The engine only raises a game-over event; this crate decides
//! whether the score qualifies, asks the host for a name, submits it and
//! tells the host when to go home.
//!
//! # Layers
//!
//! - [`entry`]: the entry model and the sanitization rules
//! - [`gateway`]: the [`HighScoreGateway`] trait every backend implements
//! - [`store`]: file-backed list with atomic writes (used by the server)
//! - [`protocol`] / [`server`] / [`client`]: line-delimited JSON over TCP
//! - [`cache`]: [`CachedGateway`], the local-fallback decorator
//! - [`coordinator`]: [`GameOverFlow`], the synchronous game-over sequence
//! - [`runtime`]: [`ScoreService`], the bridge into a sync game loop
//!
//! # Protocol
//!
//! One JSON object per line, tagged by `type`:
//!
//! ```text
//! Client -> Server: {"type":"fetch","limit":10}
//! Server -> Client: {"type":"scores","ok":true,"scores":[{"name":"AB","score":500,"ts":1700000000000}]}
//! Client -> Server: {"type":"submit","name":"AB","score":500}
//! Server -> Client: {"type":"submitted","ok":true,"saved":true,"scores":[...]}
//! Client -> Server: {"type":"submit","name":"AB","score":-1}
//! Server -> Client: {"type":"error","ok":false,"error":"invalid_score"}
//! ```
//!
//! # Environment Variables
//!
//! - `STACKLOGIC_SCORES_HOST` / `STACKLOGIC_SCORES_PORT`: server address (default 127.0.0.1:3000)
//! - `STACKLOGIC_DATA_DIR`: server data directory (default `data`)
//! - `STACKLOGIC_SCORES_TIMEOUT_MS`: client timeout (default 1500)
//! - `STACKLOGIC_CACHE_PATH`: client fallback file
//! - `STACKLOGIC_SCORES_DISABLED`: set to "1" or "true" to stay offline

pub mod cache;
pub mod client;
pub mod coordinator;
pub mod entry;
pub mod gateway;
pub mod protocol;
pub mod runtime;
pub mod server;
pub mod store;

pub use stacklogic_types as types;

pub use cache::CachedGateway;
pub use client::{ClientConfig, RemoteGateway};
pub use coordinator::{FlowStep, GameOverFlow};
pub use entry::{qualifies, potential_rank, sanitize_name, sanitize_score, HighScoreEntry};
pub use gateway::{HighScoreGateway, SubmitError, SubmitOutcome};
pub use runtime::{DefaultGateway, RequestId, ScoreEvent, ScoreService};
pub use server::{check_listen_available, run_server, ServerConfig};
pub use store::FileStore;
