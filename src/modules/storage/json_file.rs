use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::api::error;
use crate::modules::storage::DirtyFlag;

/// One JSON document on disk, guarded by a single-writer lock.
///
/// Every access runs load → (mutate) → write while holding the lock, and
/// writes go through a temp file in the same directory that is fsynced and
/// renamed over the target, so a crash mid-write leaves the old document.
pub struct JsonFile<D> {
    path: PathBuf,
    lock: Mutex<()>,
    dirty: DirtyFlag,
    seed: Option<fn() -> D>,
}

impl<D> JsonFile<D>
where
    D: Serialize + DeserializeOwned + Default + Send,
{
    /// A document whose absence reads as `D::default()` and is not written.
    pub fn new(path: impl Into<PathBuf>, dirty: DirtyFlag) -> Self {
        Self { path: path.into(), lock: Mutex::new(()), dirty, seed: None }
    }

    /// A document that is synthesized from `seed` and persisted on first read.
    pub fn with_seed(path: impl Into<PathBuf>, dirty: DirtyFlag, seed: fn() -> D) -> Self {
        Self { path: path.into(), lock: Mutex::new(()), dirty, seed: Some(seed) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<D, error::SystemError> {
        let _guard = self.lock.lock().await;
        self.load_locked().await
    }

    /// Applies `f` to the loaded document and persists it only if `f` succeeds.
    pub async fn mutate<F, R>(&self, f: F) -> Result<R, error::SystemError>
    where
        F: FnOnce(&mut D) -> Result<R, error::SystemError>,
    {
        let _guard = self.lock.lock().await;
        let mut doc = self.load_locked().await?;
        let out = f(&mut doc)?;
        self.write_locked(&doc).await?;
        Ok(out)
    }

    async fn load_locked(&self) -> Result<D, error::SystemError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => match self.seed {
                Some(seed) => {
                    let doc = seed();
                    self.write_locked(&doc).await?;
                    log::info!("Seeded {}", self.path.display());
                    Ok(doc)
                }
                None => Ok(D::default()),
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn write_locked(&self, doc: &D) -> Result<(), error::SystemError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(doc)?;
        let tmp_path = self.tmp_path();

        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            tokio::fs::remove_file(&tmp_path).await.ok();
            return Err(e.into());
        }

        self.dirty.mark();
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self.path.file_name().and_then(|n| n.to_str()).unwrap_or("document");
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn seeded() -> Vec<String> {
        vec!["a".into(), "b".into()]
    }

    #[tokio::test]
    async fn missing_file_reads_default_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let file: JsonFile<Vec<String>> =
            JsonFile::new(dir.path().join("photos.json"), DirtyFlag::default());

        assert!(file.load().await.unwrap().is_empty());
        assert!(!file.path().exists());
    }

    #[tokio::test]
    async fn seed_is_persisted_once() {
        let dir = tempfile::tempdir().unwrap();
        let dirty = DirtyFlag::default();
        let file = JsonFile::with_seed(dir.path().join("categories.json"), dirty.clone(), seeded);

        assert_eq!(file.load().await.unwrap(), seeded());
        assert!(file.path().exists());
        assert!(dirty.is_set());

        let first = std::fs::read(file.path()).unwrap();
        file.load().await.unwrap();
        assert_eq!(std::fs::read(file.path()).unwrap(), first);
    }

    #[tokio::test]
    async fn failed_mutation_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let dirty = DirtyFlag::default();
        let file: JsonFile<Vec<String>> = JsonFile::new(dir.path().join("g.json"), dirty.clone());

        let res = file
            .mutate(|_| -> Result<(), error::SystemError> {
                Err(error::SystemError::not_found("nope"))
            })
            .await;

        assert!(matches!(res, Err(error::SystemError::NotFound(_))));
        assert!(!file.path().exists());
        assert!(!dirty.is_set());
    }

    #[tokio::test]
    async fn malformed_json_is_an_error_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photos.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let file: JsonFile<Vec<String>> = JsonFile::new(path, DirtyFlag::default());

        let err = file.load().await.unwrap_err();
        assert!(err.is_persistence_failure());
    }

    #[tokio::test]
    async fn concurrent_mutations_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let file: Arc<JsonFile<Vec<u32>>> =
            Arc::new(JsonFile::new(dir.path().join("n.json"), DirtyFlag::default()));

        let mut handles = Vec::new();
        for i in 0..20u32 {
            let file = file.clone();
            handles.push(tokio::spawn(async move {
                file.mutate(|items| {
                    items.push(i);
                    Ok(())
                })
                .await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let mut items = file.load().await.unwrap();
        items.sort();
        assert_eq!(items, (0..20).collect::<Vec<_>>());
        assert!(!dir.path().join(".n.json.tmp").exists());
    }
}
