//! Tracks the status of uploads that finish outside the request/response cycle.
//!
//! `POST /api/uploads` answers as soon as the upload is registered; writing the
//! file happens on a blocking worker afterwards. The worker reports
//! its outcome as an `UploadUpdate` over an MPSC channel, and a single
//! long-running task (`start_upload_updater`) applies those updates to the
//! shared map that `GET /api/uploads/status/{upload_id}` reads from.
//!
//! Records that reached a terminal state are dropped after `FINISHED_RETENTION`,
//! long after any client has stopped polling for them.

use common::model::upload::UploadStatus;
use log::warn;
use std::time::{Duration, Instant};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// How long a `SUCCESS`/`FAILED` record stays queryable.
pub const FINISHED_RETENTION: Duration = Duration::from_secs(60 * 60);

/// What the server knows about one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    pub filename: String,
    pub status: UploadStatus,
    /// Set when `status` becomes terminal.
    pub finished_at: Option<Instant>,
}

impl UploadRecord {
    fn new(filename: &str, status: UploadStatus) -> Self {
        Self {
            filename: filename.to_string(),
            status,
            finished_at: status.is_terminal().then(Instant::now),
        }
    }
}

/// Shared upload registry, injected into the Actix app as `web::Data`.
#[derive(Clone)]
pub struct UploadsState {
    /// Upload id to its record. Written only by `register` and the updater task.
    pub uploads: Arc<RwLock<HashMap<String, UploadRecord>>>,

    /// Workers send their final status through this sender instead of locking
    /// `uploads` themselves.
    pub tx: mpsc::Sender<UploadUpdate>,
}

/// A status change for one upload.
#[derive(Debug)]
pub struct UploadUpdate {
    pub(crate) upload_id: String,
    pub(crate) status: UploadStatus,
}

impl UploadsState {
    pub fn new(tx: mpsc::Sender<UploadUpdate>) -> Self {
        Self {
            uploads: Arc::new(RwLock::new(HashMap::new())),
            tx,
        }
    }

    /// Inserts a new record with the given starting status.
    pub async fn register(&self, upload_id: &str, filename: &str, status: UploadStatus) {
        let mut uploads = self.uploads.write().await;
        prune_finished(&mut uploads, FINISHED_RETENTION, Instant::now());
        uploads.insert(upload_id.to_string(), UploadRecord::new(filename, status));
    }

    pub async fn get(&self, upload_id: &str) -> Option<UploadRecord> {
        self.uploads.read().await.get(upload_id).cloned()
    }
}

/// Applies one update to the registry.
///
/// Unknown ids are ignored, and a record in a terminal state keeps its status.
async fn apply_update(state: &UploadsState, update: UploadUpdate) {
    let mut uploads = state.uploads.write().await;
    match uploads.get_mut(&update.upload_id) {
        Some(record) if record.status.is_terminal() => {
            warn!(
                "Ignoring {} for upload {}: already {}",
                update.status, update.upload_id, record.status
            );
        }
        Some(record) => {
            record.status = update.status;
            if update.status.is_terminal() {
                record.finished_at = Some(Instant::now());
            }
        }
        None => warn!("Status update for unknown upload {}", update.upload_id),
    }
}

/// Drops records that finished more than `retention` before `now`.
fn prune_finished(uploads: &mut HashMap<String, UploadRecord>, retention: Duration, now: Instant) {
    uploads.retain(|_, record| match record.finished_at {
        Some(finished_at) => now.saturating_duration_since(finished_at) < retention,
        None => true,
    });
}

/// Runs until every sender is dropped, applying updates as they arrive.
///
/// Spawned once from `main.rs`.
pub async fn start_upload_updater(state: UploadsState, mut rx: mpsc::Receiver<UploadUpdate>) {
    while let Some(update) = rx.recv().await {
        apply_update(&state, update).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(upload_id: &str, status: UploadStatus) -> UploadUpdate {
        UploadUpdate {
            upload_id: upload_id.to_string(),
            status,
        }
    }

    #[actix_web::test]
    async fn test_updater_applies_updates() {
        let (tx, rx) = mpsc::channel(8);
        let (state_tx, _state_rx) = mpsc::channel(1);
        let state = UploadsState::new(state_tx);
        state.register("a", "a.pdf", UploadStatus::Uploading).await;

        tx.send(update("a", UploadStatus::Success)).await.unwrap();
        drop(tx);
        start_upload_updater(state.clone(), rx).await;

        let record = state.get("a").await.unwrap();
        assert_eq!(record.status, UploadStatus::Success);
        assert_eq!(record.filename, "a.pdf");
    }

    #[actix_web::test]
    async fn test_terminal_status_is_final() {
        let (tx, _rx) = mpsc::channel(1);
        let state = UploadsState::new(tx);
        state.register("a", "a.pdf", UploadStatus::Failed).await;

        apply_update(&state, update("a", UploadStatus::Uploading)).await;
        assert_eq!(state.get("a").await.unwrap().status, UploadStatus::Failed);
    }

    #[actix_web::test]
    async fn test_finished_records_are_pruned() {
        let (tx, _rx) = mpsc::channel(1);
        let state = UploadsState::new(tx);
        state.register("done", "a.pdf", UploadStatus::Success).await;
        state.register("running", "b.pdf", UploadStatus::Uploading).await;

        let mut uploads = state.uploads.write().await;
        assert!(uploads["done"].finished_at.is_some());
        assert!(uploads["running"].finished_at.is_none());

        prune_finished(&mut uploads, FINISHED_RETENTION, Instant::now());
        assert_eq!(uploads.len(), 2);

        let later = Instant::now() + FINISHED_RETENTION * 2;
        prune_finished(&mut uploads, FINISHED_RETENTION, later);
        assert!(!uploads.contains_key("done"));
        assert!(uploads.contains_key("running"));
    }

    #[actix_web::test]
    async fn test_update_marks_finish_time() {
        let (tx, _rx) = mpsc::channel(1);
        let state = UploadsState::new(tx);
        state.register("a", "a.pdf", UploadStatus::Uploading).await;

        apply_update(&state, update("a", UploadStatus::Success)).await;
        assert!(state.get("a").await.unwrap().finished_at.is_some());
    }

    #[actix_web::test]
    async fn test_unknown_upload_is_not_created() {
        let (tx, _rx) = mpsc::channel(1);
        let state = UploadsState::new(tx);

        apply_update(&state, update("ghost", UploadStatus::Success)).await;
        assert!(state.get("ghost").await.is_none());
    }
}
