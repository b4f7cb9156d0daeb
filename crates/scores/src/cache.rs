//! Local fallback layered over any gateway.
//!
//! Successful replies refresh a local snapshot file. When the inner gateway
//! fails, fetches are answered from that snapshot (empty if there is none)
//! and submissions are merged into it. A failed submission still reports
//! `saved: true`, since the score did land locally and the player should
//! not be told otherwise.

use std::path::{Path, PathBuf};

use crate::entry::{sanitize_name, HighScoreEntry};
use crate::gateway::{HighScoreGateway, SubmitError, SubmitOutcome};
use crate::store::FileStore;
use crate::types::MAX_SUBMITTED_SCORE;

pub const DEFAULT_CACHE_PATH: &str = ".stacklogic/highscores_fallback_v1.json";

/// Cache location from `STACKLOGIC_CACHE_PATH`.
pub fn cache_path_from_env() -> PathBuf {
    std::env::var("STACKLOGIC_CACHE_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH))
}

#[derive(Debug)]
pub struct CachedGateway<G> {
    inner: G,
    cache: FileStore,
}

impl<G: HighScoreGateway> CachedGateway<G> {
    pub fn new(inner: G, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            cache: FileStore::new(cache_path),
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub fn cache_path(&self) -> &Path {
        self.cache.path()
    }

    /// The local snapshot as it stands.
    pub async fn cached(&self) -> Vec<HighScoreEntry> {
        self.cache.read().await
    }

    async fn remember(&self, list: &[HighScoreEntry]) {
        if let Err(e) = self.cache.replace(list).await {
            log::warn!("updating score cache failed: {:#}", e);
        }
    }
}

impl<G: HighScoreGateway> HighScoreGateway for CachedGateway<G> {
    async fn fetch_top(&self, limit: usize) -> anyhow::Result<Vec<HighScoreEntry>> {
        match self.inner.fetch_top(limit).await {
            Ok(list) => {
                self.remember(&list).await;
                Ok(list)
            }
            Err(e) => {
                log::warn!("fetching scores failed, using local copy: {:#}", e);
                let mut list = self.cache.read().await;
                list.truncate(limit);
                Ok(list)
            }
        }
    }

    async fn submit(&self, name: &str, score: u64) -> anyhow::Result<SubmitOutcome> {
        if score > MAX_SUBMITTED_SCORE {
            return Err(SubmitError::InvalidScore.into());
        }

        match self.inner.submit(name, score).await {
            Ok(outcome) => {
                self.remember(&outcome.scores).await;
                Ok(outcome)
            }
            Err(e) if e.downcast_ref::<SubmitError>().is_some() => Err(e),
            Err(e) => {
                log::warn!("submitting score failed, keeping it locally: {:#}", e);
                let entry = HighScoreEntry::new(&sanitize_name(name), score);
                let scores = match self.cache.insert(entry).await {
                    Ok(outcome) => outcome.scores,
                    Err(e) => {
                        log::warn!("local score fallback failed: {:#}", e);
                        self.cache.read().await
                    }
                };
                Ok(SubmitOutcome {
                    saved: true,
                    scores,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::temp_dir;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Gateway that fails on demand.
    struct Flaky {
        down: AtomicBool,
        store: FileStore,
    }

    impl HighScoreGateway for Flaky {
        async fn fetch_top(&self, limit: usize) -> anyhow::Result<Vec<HighScoreEntry>> {
            if self.down.load(Ordering::SeqCst) {
                return Err(anyhow!("connection refused"));
            }
            self.store.fetch_top(limit).await
        }

        async fn submit(&self, name: &str, score: u64) -> anyhow::Result<SubmitOutcome> {
            if self.down.load(Ordering::SeqCst) {
                return Err(anyhow!("connection refused"));
            }
            self.store.submit(name, score).await
        }
    }

    fn flaky(tag: &str, down: bool) -> (CachedGateway<Flaky>, PathBuf) {
        let dir = temp_dir(tag);
        let inner = Flaky {
            down: AtomicBool::new(down),
            store: FileStore::in_dir(dir.join("server")),
        };
        (CachedGateway::new(inner, dir.join("cache.json")), dir)
    }

    #[tokio::test]
    async fn test_fetch_failure_without_cache_is_empty() {
        let (gw, _dir) = flaky("cache-empty", true);
        assert!(gw.fetch_top(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_serves_last_good_list() {
        let (gw, dir) = flaky("cache-last", false);
        gw.submit("AB", 500).await.unwrap();
        let live = gw.fetch_top(10).await.unwrap();
        assert_eq!(live.len(), 1);

        gw.inner().down.store(true, Ordering::SeqCst);
        assert_eq!(gw.fetch_top(10).await.unwrap(), live);
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_submit_failure_lands_locally() {
        let (gw, dir) = flaky("cache-submit", true);
        let outcome = gw.submit("  Offline!  ", 321).await.unwrap();
        assert!(outcome.saved);
        assert_eq!(outcome.scores.len(), 1);
        assert_eq!(outcome.scores[0].name, "Offline");
        assert_eq!(gw.cached().await, outcome.scores);
        assert!(gw.inner().store.read().await.is_empty());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_invalid_score_is_not_absorbed() {
        let (gw, _dir) = flaky("cache-invalid", true);
        let err = gw.submit("x", MAX_SUBMITTED_SCORE + 1).await.unwrap_err();
        assert!(err.downcast_ref::<SubmitError>().is_some());
    }
}
