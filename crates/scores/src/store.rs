//! File-backed high-score list.
//!
//! The whole list lives in one pretty-printed JSON array. Writes go to a
//! sibling `.tmp` file which is then renamed over the real one, so a crash
//! leaves either the old list or the new one. Unreadable or malformed files
//! read as an empty list.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::sync::Mutex;

use crate::entry::{merge_entry, parse_entries, sort_and_truncate, HighScoreEntry};
use crate::gateway::{HighScoreGateway, SubmitError, SubmitOutcome};
use crate::types::MAX_SUBMITTED_SCORE;

/// File name used inside a data directory.
pub const HIGHSCORES_FILE: &str = "highscores.json";

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-merge-write cycles.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at `<dir>/highscores.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(HIGHSCORES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = OsString::from(self.path.as_os_str());
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Current list; empty if the file is missing or unusable.
    pub async fn read(&self) -> Vec<HighScoreEntry> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => parse_entries(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!("reading {} failed: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    async fn write(&self, list: &[HighScoreEntry]) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }

        let mut payload = serde_json::to_string_pretty(list)?;
        payload.push('\n');

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, payload)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("renaming {} into place", tmp.display()))?;
        Ok(())
    }

    /// Overwrite the stored list with `list` (sorted and capped first).
    pub async fn replace(&self, list: &[HighScoreEntry]) -> anyhow::Result<()> {
        let mut list = list.to_vec();
        sort_and_truncate(&mut list);
        let _guard = self.lock.lock().await;
        self.write(&list).await
    }

    /// Merge an already-built entry and persist if it made the list.
    pub async fn insert(&self, candidate: HighScoreEntry) -> anyhow::Result<SubmitOutcome> {
        if candidate.score > MAX_SUBMITTED_SCORE {
            return Err(SubmitError::InvalidScore.into());
        }

        let _guard = self.lock.lock().await;
        let mut list = self.read().await;
        if !merge_entry(&mut list, candidate) {
            return Ok(SubmitOutcome {
                saved: false,
                scores: list,
            });
        }
        self.write(&list).await?;
        Ok(SubmitOutcome {
            saved: true,
            scores: list,
        })
    }
}

impl HighScoreGateway for FileStore {
    async fn fetch_top(&self, limit: usize) -> anyhow::Result<Vec<HighScoreEntry>> {
        let mut list = self.read().await;
        list.truncate(limit);
        Ok(list)
    }

    async fn submit(&self, name: &str, score: u64) -> anyhow::Result<SubmitOutcome> {
        self.insert(HighScoreEntry::new(name, score)).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    pub(crate) fn temp_dir(tag: &str) -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "stacklogic-{}-{}-{}-{}",
            tag,
            std::process::id(),
            crate::entry::now_ms(),
            n
        ))
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let store = FileStore::in_dir(temp_dir("missing"));
        assert!(store.read().await.is_empty());
        assert!(store.fetch_top(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_empty() {
        let dir = temp_dir("corrupt");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let store = FileStore::in_dir(&dir);
        tokio::fs::write(store.path(), "{ not json").await.unwrap();
        assert!(store.read().await.is_empty());

        tokio::fs::write(store.path(), r#"{"scores": []}"#).await.unwrap();
        assert!(store.read().await.is_empty());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_submit_persists_and_leaves_no_tmp() {
        let dir = temp_dir("submit");
        let store = FileStore::in_dir(&dir);

        let outcome = store.submit("AB", 500).await.unwrap();
        assert!(outcome.saved);
        assert_eq!(outcome.scores.len(), 1);
        assert_eq!(outcome.scores[0].name, "AB");

        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert!(raw.ends_with("]\n"));
        assert!(!store.tmp_path().exists());

        let reopened = FileStore::in_dir(&dir);
        assert_eq!(reopened.read().await, outcome.scores);
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_submit_below_cutoff_is_not_saved() {
        let dir = temp_dir("cutoff");
        let store = FileStore::in_dir(&dir);
        for i in 0..10 {
            store.submit("P", 100 + i).await.unwrap();
        }
        let before = store.read().await;
        let outcome = store.submit("late", 100).await.unwrap();
        assert!(!outcome.saved);
        assert_eq!(outcome.scores, before);
        assert_eq!(store.read().await, before);
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_out_of_range_score_rejected() {
        let store = FileStore::in_dir(temp_dir("range"));
        let err = store.submit("x", MAX_SUBMITTED_SCORE + 1).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<SubmitError>(),
            Some(&SubmitError::InvalidScore)
        );
    }

    #[tokio::test]
    async fn test_concurrent_submissions_all_land() {
        let dir = temp_dir("concurrent");
        let store = Arc::new(FileStore::in_dir(&dir));
        let mut tasks = Vec::new();
        for i in 0..8u64 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.submit(&format!("p{}", i), 10 * (i + 1)).await
            }));
        }
        for t in tasks {
            assert!(t.await.unwrap().unwrap().saved);
        }
        let list = store.read().await;
        assert_eq!(list.len(), 8);
        assert_eq!(list[0].score, 80);
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
