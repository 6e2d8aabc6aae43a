use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;

use crate::api::error;
use crate::modules::autosave::model::{AutoSaveConfig, SaveOutcome, SaveStatus};
use crate::modules::storage::DirtyFlag;
use crate::modules::version_control::change_log::{ChangeAction, ChangeEntry, ChangeType};
use crate::modules::version_control::{ChangeLog, CommitInfo, VersionControlSink};

pub const HISTORY_LIMIT: usize = 20;

/// Commits the data files whenever a store write has happened since the last save.
pub struct AutoSave {
    dirty: DirtyFlag,
    saving: AtomicBool,
    last_saved: RwLock<Option<chrono::DateTime<Utc>>>,
    sink: Arc<dyn VersionControlSink + Send + Sync>,
    change_log: Option<ChangeLog>,
    config: AutoSaveConfig,
}

/// Releases the in-flight marker on every exit path.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AutoSave {
    pub fn new(
        dirty: DirtyFlag,
        sink: Arc<dyn VersionControlSink + Send + Sync>,
        config: AutoSaveConfig,
    ) -> Self {
        Self {
            dirty,
            saving: AtomicBool::new(false),
            last_saved: RwLock::new(None),
            sink,
            change_log: None,
            config,
        }
    }

    pub fn with_change_log(mut self, change_log: ChangeLog) -> Self {
        self.change_log = Some(change_log);
        self
    }

    pub fn status(&self) -> SaveStatus {
        SaveStatus {
            has_changes: self.dirty.is_set(),
            is_saving: self.saving.load(Ordering::SeqCst),
            last_saved: self.last_saved.read().map(|t| *t).unwrap_or_default(),
        }
    }

    /// Commits if dirty. The flag is cleared before the commit so writes racing
    /// the commit stay pending, and restored if the commit fails.
    pub async fn save_now(&self, message: Option<String>) -> Result<SaveOutcome, error::SystemError> {
        self.save_with_changes(message, None).await
    }

    /// [`save_now`](Self::save_now) that also records `changes` in the change log.
    pub async fn save_with_changes(
        &self,
        message: Option<String>,
        changes: Option<serde_json::Value>,
    ) -> Result<SaveOutcome, error::SystemError> {
        if self.saving.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            return Ok(SaveOutcome::AlreadySaving);
        }
        let _guard = SavingGuard(&self.saving);

        if !self.dirty.take() {
            return Ok(SaveOutcome::Clean);
        }

        let now = Utc::now();
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Auto-save: {}", now.to_rfc3339()));

        let commit = match self.sink.commit(&message).await {
            Ok(commit) => commit,
            Err(e) => {
                self.dirty.mark();
                return Err(e);
            }
        };

        if let Ok(mut last) = self.last_saved.write() {
            *last = Some(now);
        }
        log::info!("Saved changes as {} ({})", commit, message);

        if let Some(change_log) = &self.change_log {
            let mut data = serde_json::json!({ "message": message, "commit": commit });
            if let Some(changes) = changes {
                data["changes"] = changes;
            }
            let entry = ChangeEntry {
                kind: ChangeType::Content,
                action: ChangeAction::Update,
                data,
                timestamp: now,
            };
            if let Err(e) = change_log.append(entry).await {
                log::warn!("Commit {} saved but change log not updated: {}", commit, e);
            }
        }

        Ok(SaveOutcome::Saved { commit })
    }

    pub async fn history(&self) -> Result<Vec<CommitInfo>, error::SystemError> {
        self.sink.history(HISTORY_LIMIT).await
    }

    /// Periodic save loop; returns when `cancel` fires.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        if !self.config.enabled {
            log::info!("Auto-save disabled");
            return;
        }

        log::info!("Auto-save started, interval {}s", self.config.interval.as_secs());
        let mut interval = tokio::time::interval(self.config.interval);
        // the first tick fires immediately
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    log::info!("Auto-save stopping");
                    break;
                }
                _ = interval.tick() => {
                    match self.save_now(None).await {
                        Ok(SaveOutcome::Saved { commit }) => log::debug!("Auto-save committed {}", commit),
                        Ok(SaveOutcome::Clean) => log::debug!("Auto-save: no changes"),
                        Ok(SaveOutcome::AlreadySaving) => log::debug!("Auto-save skipped, save in flight"),
                        Err(e) => log::error!("Auto-save failed: {}", e),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct MockSink {
        commits: AtomicUsize,
        fail: AtomicBool,
        gate: Option<Arc<Notify>>,
        messages: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl VersionControlSink for MockSink {
        async fn commit(&self, message: &str) -> Result<String, error::SystemError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(error::SystemError::version_control("remote hung up"));
            }
            self.messages.lock().unwrap().push(message.to_string());
            let n = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("commit-{n}"))
        }

        async fn history(&self, limit: usize) -> Result<Vec<CommitInfo>, error::SystemError> {
            let messages = self.messages.lock().unwrap();
            Ok(messages
                .iter()
                .rev()
                .take(limit)
                .enumerate()
                .map(|(i, m)| CommitInfo { hash: format!("h{i}"), message: m.clone(), date: Utc::now() })
                .collect())
        }
    }

    fn autosave(sink: Arc<MockSink>) -> (AutoSave, DirtyFlag) {
        let dirty = DirtyFlag::default();
        (AutoSave::new(dirty.clone(), sink, AutoSaveConfig::default()), dirty)
    }

    #[tokio::test]
    async fn clean_store_does_not_commit() {
        let sink = Arc::new(MockSink::default());
        let (saver, _) = autosave(sink.clone());

        assert_eq!(saver.save_now(None).await.unwrap(), SaveOutcome::Clean);
        assert_eq!(sink.commits.load(Ordering::SeqCst), 0);
        assert_eq!(saver.status().last_saved, None);
    }

    #[tokio::test]
    async fn dirty_store_commits_once() {
        let sink = Arc::new(MockSink::default());
        let (saver, dirty) = autosave(sink.clone());
        dirty.mark();

        let outcome = saver.save_now(None).await.unwrap();

        assert_eq!(outcome, SaveOutcome::Saved { commit: "commit-1".into() });
        assert!(!dirty.is_set());
        assert_eq!(saver.save_now(None).await.unwrap(), SaveOutcome::Clean);
        assert_eq!(sink.commits.load(Ordering::SeqCst), 1);
        assert!(sink.messages.lock().unwrap()[0].starts_with("Auto-save: "));
        let status = saver.status();
        assert!(!status.has_changes && !status.is_saving);
        assert!(status.last_saved.is_some());
    }

    #[tokio::test]
    async fn failing_sink_keeps_changes() {
        let sink = Arc::new(MockSink::default());
        sink.fail.store(true, Ordering::SeqCst);
        let (saver, dirty) = autosave(sink.clone());
        dirty.mark();

        let err = saver.save_now(Some("Manual".into())).await.unwrap_err();

        assert!(err.is_persistence_failure());
        assert!(dirty.is_set());
        assert!(!saver.status().is_saving);
        assert_eq!(saver.status().last_saved, None);
    }

    #[tokio::test]
    async fn concurrent_save_is_dropped() {
        let gate = Arc::new(Notify::new());
        let sink = Arc::new(MockSink { gate: Some(gate.clone()), ..MockSink::default() });
        let (saver, dirty) = autosave(sink.clone());
        let saver = Arc::new(saver);
        dirty.mark();

        let first = tokio::spawn({
            let saver = saver.clone();
            async move { saver.save_now(Some("first".into())).await }
        });
        while !saver.status().is_saving {
            tokio::task::yield_now().await;
        }

        dirty.mark();
        assert_eq!(saver.save_now(None).await.unwrap(), SaveOutcome::AlreadySaving);

        gate.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), SaveOutcome::Saved { commit: "commit-1".into() });
        // the write during the commit is still pending
        assert!(dirty.is_set());
        assert_eq!(sink.commits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn change_log_records_saves() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(MockSink::default());
        let dirty = DirtyFlag::default();
        let saver = AutoSave::new(dirty.clone(), sink, AutoSaveConfig::default())
            .with_change_log(ChangeLog::new(dir.path().join("cms/change-log.json")));
        dirty.mark();

        saver.save_now(Some("Galerie Nature".into())).await.unwrap();

        let entries = ChangeLog::new(dir.path().join("cms/change-log.json")).entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].data["message"], "Galerie Nature");
        assert!(entries[0].data.get("changes").is_none());
        assert!(!dirty.is_set());
    }

    #[tokio::test]
    async fn change_log_keeps_submitted_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cms/change-log.json");
        let sink = Arc::new(MockSink::default());
        let dirty = DirtyFlag::default();
        let saver = AutoSave::new(dirty.clone(), sink, AutoSaveConfig::default())
            .with_change_log(ChangeLog::new(&path));
        dirty.mark();

        let changes = serde_json::json!({ "galleries": ["nature"], "photos": 3 });
        let outcome = saver.save_with_changes(Some("Galerie Nature".into()), Some(changes.clone())).await.unwrap();

        let entries = ChangeLog::new(&path).entries().await.unwrap();
        assert_eq!(entries[0].data["changes"], changes);
        assert_eq!(outcome, SaveOutcome::Saved { commit: entries[0].data["commit"].as_str().unwrap().into() });
    }

    #[tokio::test(start_paused = true)]
    async fn loop_commits_on_tick_and_stops() {
        let sink = Arc::new(MockSink::default());
        let dirty = DirtyFlag::default();
        let config = AutoSaveConfig { enabled: true, interval: Duration::from_secs(300) };
        let saver = Arc::new(AutoSave::new(dirty.clone(), sink.clone(), config));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(saver.clone().run(cancel.clone()));

        dirty.mark();
        tokio::time::sleep(Duration::from_secs(301)).await;
        assert_eq!(sink.commits.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(sink.commits.load(Ordering::SeqCst), 1);

        cancel.cancel();
        task.await.unwrap();
    }
}
