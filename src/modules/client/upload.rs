//! Client-side upload lifecycle.
//!
//! Each picked file becomes a [`PendingUpload`] that moves from `Uploading`
//! to `Completed` or `Error`. Files failing the local policy go straight to
//! `Error` and are never sent. Progress comes from the bytes the transport
//! has actually handed to the request body.

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::modules::client::api::{ClientError, CmsClient, LocalFile};
use crate::modules::photo::{PhotoEntity, UploadReport};

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_files: usize,
    pub max_file_size: u64,
    pub accepted_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_file_size: 10 * 1024 * 1024, // 10MB
            accepted_types: vec!["image/jpeg".into(), "image/png".into(), "image/webp".into()],
        }
    }
}

impl UploadPolicy {
    fn validate(&self, file: &LocalFile) -> Result<(), String> {
        if !self.accepted_types.iter().any(|t| *t == file.mime_type) {
            return Err("Unsupported file type".to_string());
        }
        if file.size() > self.max_file_size {
            return Err(format!("File too large (max {}MB)", self.max_file_size / (1024 * 1024)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    Completed,
    Error,
}

/// Thumbnail source for the picker; dropping it releases the slot.
#[derive(Debug)]
pub struct Preview {
    bytes: Arc<Vec<u8>>,
    live: Arc<AtomicUsize>,
}

impl Preview {
    fn new(bytes: Arc<Vec<u8>>, live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self { bytes, live }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct PendingUpload {
    pub id: Uuid,
    pub file: LocalFile,
    pub preview: Preview,
    /// 0..=100, never decreasing.
    pub progress: u8,
    pub status: UploadStatus,
    pub error: Option<String>,
    pub photo: Option<PhotoEntity>,
}

#[derive(Debug)]
pub enum UploadEvent {
    Progress { id: Uuid, percent: u8 },
    Completed { id: Uuid, photo: PhotoEntity },
    Failed { id: Uuid, error: String },
}

impl UploadEvent {
    pub fn id(&self) -> Uuid {
        match self {
            UploadEvent::Progress { id, .. }
            | UploadEvent::Completed { id, .. }
            | UploadEvent::Failed { id, .. } => *id,
        }
    }
}

/// Reports bytes sent for one entry back to its tracker.
#[derive(Clone)]
pub struct ProgressReporter {
    id: Uuid,
    tx: mpsc::UnboundedSender<UploadEvent>,
}

impl ProgressReporter {
    pub fn report(&self, sent: u64, total: u64) {
        let percent = if total == 0 { 100 } else { (sent.min(total) * 100 / total) as u8 };
        // tracker gone: nobody is listening
        let _ = self.tx.send(UploadEvent::Progress { id: self.id, percent });
    }
}

#[async_trait::async_trait]
pub trait UploadTransport: Send + Sync {
    async fn upload(
        &self,
        file: LocalFile,
        progress: ProgressReporter,
    ) -> Result<PhotoEntity, ClientError>;
}

#[async_trait::async_trait]
impl UploadTransport for CmsClient {
    async fn upload(
        &self,
        file: LocalFile,
        progress: ProgressReporter,
    ) -> Result<PhotoEntity, ClientError> {
        let total = file.size();
        let chunks: Vec<Vec<u8>> = file.bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        let mut sent = 0u64;
        let stream = futures_util::stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            progress.report(sent, total);
            Ok::<_, std::io::Error>(chunk)
        });

        let part = reqwest::multipart::Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = reqwest::multipart::Form::new().part("files", part);

        let response = self.request(reqwest::Method::POST, "/api/cms/photos").multipart(form).send().await?;
        let report: UploadReport = CmsClient::parse_envelope(response)
            .await?
            .data
            .ok_or(ClientError::EmptyData)?;

        match (report.files.into_iter().next(), report.rejected.into_iter().next()) {
            (Some(photo), _) => Ok(photo),
            (None, Some(rejected)) => Err(ClientError::Api { status: 400, message: rejected.error }),
            (None, None) => Err(ClientError::EmptyData),
        }
    }
}

pub struct UploadTracker {
    policy: UploadPolicy,
    entries: Vec<PendingUpload>,
    tasks: HashMap<Uuid, CancellationToken>,
    tx: mpsc::UnboundedSender<UploadEvent>,
    rx: mpsc::UnboundedReceiver<UploadEvent>,
    previews: Arc<AtomicUsize>,
}

impl Default for UploadTracker {
    fn default() -> Self {
        Self::new(UploadPolicy::default())
    }
}

impl UploadTracker {
    pub fn new(policy: UploadPolicy) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            policy,
            entries: Vec::new(),
            tasks: HashMap::new(),
            tx,
            rx,
            previews: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn entries(&self) -> &[PendingUpload] {
        &self.entries
    }

    pub fn get(&self, id: Uuid) -> Option<&PendingUpload> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Previews not yet released.
    pub fn open_previews(&self) -> usize {
        self.previews.load(Ordering::SeqCst)
    }

    /// Queues up to the remaining capacity; extra files are ignored.
    pub fn add_files(&mut self, files: Vec<LocalFile>) -> Vec<Uuid> {
        let room = self.policy.max_files.saturating_sub(self.entries.len());
        let mut ids = Vec::new();

        for file in files.into_iter().take(room) {
            let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
            let preview = Preview::new(file.bytes.clone(), self.previews.clone());
            let (status, error) = match self.policy.validate(&file) {
                Ok(()) => (UploadStatus::Uploading, None),
                Err(e) => {
                    log::debug!("Upload of '{}' refused locally: {}", file.name, e);
                    (UploadStatus::Error, Some(e))
                }
            };
            self.entries.push(PendingUpload {
                id,
                file,
                preview,
                progress: 0,
                status,
                error,
                photo: None,
            });
            ids.push(id);
        }

        ids
    }

    /// Spawns one transfer per uploading entry that has none yet.
    pub fn start(&mut self, transport: Arc<dyn UploadTransport>) {
        for entry in self.entries.iter().filter(|e| e.status == UploadStatus::Uploading) {
            if self.tasks.contains_key(&entry.id) {
                continue;
            }

            let token = CancellationToken::new();
            self.tasks.insert(entry.id, token.clone());

            let id = entry.id;
            let file = entry.file.clone();
            let tx = self.tx.clone();
            let transport = transport.clone();
            let reporter = ProgressReporter { id, tx: tx.clone() };

            tokio::spawn(async move {
                let transfer = tokio::spawn(async move { transport.upload(file, reporter).await });
                let abort = transfer.abort_handle();
                let event = tokio::select! {
                    _ = token.cancelled() => {
                        abort.abort();
                        return;
                    }
                    joined = transfer => match joined {
                        Ok(Ok(photo)) => UploadEvent::Completed { id, photo },
                        Ok(Err(e)) => UploadEvent::Failed { id, error: e.to_string() },
                        Err(e) => {
                            log::warn!("Upload task {} ended without a result: {}", id, e);
                            UploadEvent::Failed { id, error: "Upload interrupted".to_string() }
                        }
                    },
                };
                let _ = tx.send(event);
            });
        }
    }

    /// Applies a transfer event; events for removed entries are dropped.
    pub fn apply(&mut self, event: UploadEvent) {
        let id = event.id();
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return;
        };
        if entry.status != UploadStatus::Uploading {
            return;
        }

        match event {
            UploadEvent::Progress { percent, .. } => {
                entry.progress = entry.progress.max(percent.min(100));
            }
            UploadEvent::Completed { photo, .. } => {
                entry.progress = 100;
                entry.status = UploadStatus::Completed;
                entry.photo = Some(photo);
                self.tasks.remove(&id);
            }
            UploadEvent::Failed { error, .. } => {
                entry.status = UploadStatus::Error;
                entry.error = Some(error);
                self.tasks.remove(&id);
            }
        }
    }

    /// Cancels any transfer and drops the entry with its preview.
    pub fn remove(&mut self, id: Uuid) -> bool {
        if let Some(token) = self.tasks.remove(&id) {
            token.cancel();
        }
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    pub fn completed(&self) -> Vec<&PendingUpload> {
        self.entries.iter().filter(|e| e.status == UploadStatus::Completed).collect()
    }

    /// Uploading entries that have a running transfer.
    pub fn in_flight(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == UploadStatus::Uploading && self.tasks.contains_key(&e.id))
            .count()
    }

    /// Waits for the next event and applies it. `None` once no transfer is
    /// running; entries added but not yet started stay `Uploading`.
    pub async fn next_event(&mut self) -> Option<Uuid> {
        if self.in_flight() == 0 {
            return None;
        }
        let event = self.rx.recv().await?;
        let id = event.id();
        self.apply(event);
        Some(id)
    }

    /// Drives the running transfers to an end, then hands the completed
    /// entries to `on_complete`.
    pub async fn settle<F>(&mut self, on_complete: F)
    where
        F: FnOnce(Vec<&PendingUpload>),
    {
        while self.next_event().await.is_some() {}
        on_complete(self.completed());
    }
}
