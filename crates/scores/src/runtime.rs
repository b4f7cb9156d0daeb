//! Score service runtime integration.
//!
//! Bridges the sync game loop with the async gateway: requests are spawned
//! on a private tokio runtime and their results come back over a channel the
//! loop drains with [`ScoreService::try_recv`], so drawing never waits on
//! the network. Every request returns a [`RequestId`] and its reply carries
//! the same id, so a late answer to an old request can be told apart.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc;

use crate::cache::{cache_path_from_env, CachedGateway};
use crate::client::{ClientConfig, RemoteGateway};
use crate::entry::HighScoreEntry;
use crate::gateway::{HighScoreGateway, SubmitOutcome};
use crate::types::HIGHSCORE_MAX;

/// Result delivered to the game loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreEvent {
    /// A top list, live or from the local fallback.
    Top(Vec<HighScoreEntry>),
    /// A submission finished.
    Submitted(SubmitOutcome),
    /// A request failed outright (even the fallback could not answer).
    Failed(String),
}

/// Ticket for one request, echoed on its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// The gateway the terminal game uses: TCP client with the local fallback.
pub type DefaultGateway = CachedGateway<RemoteGateway>;

/// Running score service instance.
pub struct ScoreService<G> {
    rt: Runtime,
    gateway: Arc<G>,
    next_id: AtomicU64,
    event_tx: mpsc::UnboundedSender<(RequestId, ScoreEvent)>,
    event_rx: mpsc::UnboundedReceiver<(RequestId, ScoreEvent)>,
}

impl ScoreService<DefaultGateway> {
    /// Start the service from environment variables.
    pub fn start_from_env() -> anyhow::Result<Self> {
        Self::start_with(ClientConfig::from_env(), cache_path_from_env())
    }

    pub fn start_with(config: ClientConfig, cache_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        if config.disabled {
            log::info!("score service disabled, using the local list only");
        }
        Self::start(CachedGateway::new(RemoteGateway::new(config), cache_path))
    }
}

impl<G: HighScoreGateway + 'static> ScoreService<G> {
    pub fn start(gateway: G) -> anyhow::Result<Self> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("stacklogic-scores")
            .enable_all()
            .build()
            .context("creating tokio runtime")?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Ok(Self {
            rt,
            gateway: Arc::new(gateway),
            next_id: AtomicU64::new(1),
            event_tx,
            event_rx,
        })
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn issue(&self) -> RequestId {
        RequestId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Request the top list; answered with [`ScoreEvent::Top`].
    pub fn fetch_top(&self) -> RequestId {
        let id = self.issue();
        let gateway = Arc::clone(&self.gateway);
        let tx = self.event_tx.clone();
        self.rt.spawn(async move {
            let event = match gateway.fetch_top(HIGHSCORE_MAX).await {
                Ok(list) => ScoreEvent::Top(list),
                Err(e) => ScoreEvent::Failed(format!("{:#}", e)),
            };
            let _ = tx.send((id, event));
        });
        id
    }

    /// Submit a score; answered with [`ScoreEvent::Submitted`].
    pub fn submit(&self, name: String, score: u64) -> RequestId {
        let id = self.issue();
        let gateway = Arc::clone(&self.gateway);
        let tx = self.event_tx.clone();
        self.rt.spawn(async move {
            let event = match gateway.submit(&name, score).await {
                Ok(outcome) => ScoreEvent::Submitted(outcome),
                Err(e) => ScoreEvent::Failed(format!("{:#}", e)),
            };
            let _ = tx.send((id, event));
        });
        id
    }

    pub fn try_recv(&mut self) -> Option<(RequestId, ScoreEvent)> {
        self.event_rx.try_recv().ok()
    }

    /// Block until the next event arrives. Meant for tests and shutdown.
    pub fn recv_blocking(&mut self) -> Option<(RequestId, ScoreEvent)> {
        self.event_rx.blocking_recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::temp_dir;
    use crate::store::FileStore;

    #[test]
    fn test_submit_then_fetch_through_bridge() {
        let dir = temp_dir("bridge");
        let mut service = ScoreService::start(FileStore::in_dir(&dir)).unwrap();

        let submit_id = service.submit("AB".into(), 500);
        match service.recv_blocking() {
            Some((id, ScoreEvent::Submitted(outcome))) => {
                assert_eq!(id, submit_id);
                assert!(outcome.saved);
            }
            other => panic!("unexpected {:?}", other),
        }

        let fetch_id = service.fetch_top();
        assert_ne!(fetch_id, submit_id);
        match service.recv_blocking() {
            Some((id, ScoreEvent::Top(list))) => {
                assert_eq!(id, fetch_id);
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].score, 500);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(service.try_recv().is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_disabled_network_uses_cache() {
        let dir = temp_dir("bridge-offline");
        let config = ClientConfig {
            disabled: true,
            ..ClientConfig::default()
        };
        let mut service = ScoreService::start_with(config, dir.join("cache.json")).unwrap();

        let id = service.fetch_top();
        assert_eq!(service.recv_blocking(), Some((id, ScoreEvent::Top(Vec::new()))));

        service.submit("Solo".into(), 42);
        match service.recv_blocking() {
            Some((_, ScoreEvent::Submitted(outcome))) => {
                assert!(outcome.saved);
                assert_eq!(outcome.scores[0].name, "Solo");
            }
            other => panic!("unexpected {:?}", other),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}
