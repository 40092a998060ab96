//! # Upload Creation Service
//!
//! Handles `POST /api/uploads`, which receives a JSON `FileUploadVariables`
//! body (base64 file contents plus title, description and custom metadata).
//!
//! ## Workflow
//!
//! 1.  The filename is sanitized and the base64 payload decoded right away, so
//!     a malformed request gets a `400` (or `413` past `max_upload_bytes`) and
//!     never appears in the registry.
//! 2.  A new `upload_id` is registered as `UPLOADING` and returned to the client.
//! 3.  A Tokio task writes the document through `storage::store_document` on the
//!     blocking thread pool, then sends `SUCCESS` or `FAILED` to the upload
//!     updater. The client polls `/api/uploads/status/{upload_id}` meanwhile.

use crate::config::ServerConfig;
use crate::error::UploadError;
use crate::services::uploads::storage::{sanitize_filename, store_document};
use crate::upload_controller::state::{UploadUpdate, UploadsState};
use actix_web::{web, HttpResponse};
use common::model::upload::{FileUploadVariables, UploadStatus};
use common::requests::UploadResponse;
use log::{error, info, warn};
use tokio::sync::mpsc;
use uuid::Uuid;

pub(crate) async fn process(
    state: web::Data<UploadsState>,
    config: web::Data<ServerConfig>,
    payload: web::Json<FileUploadVariables>,
) -> Result<HttpResponse, UploadError> {
    let response = schedule_upload(&state, &config, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Validates the payload, registers the upload and spawns the write.
async fn schedule_upload(
    state: &UploadsState,
    config: &ServerConfig,
    variables: FileUploadVariables,
) -> Result<UploadResponse, UploadError> {
    let filename = sanitize_filename(&variables.filename)?;
    let bytes = variables.decode_file()?;
    if bytes.is_empty() {
        return Err(UploadError::EmptyFile);
    }
    if bytes.len() > config.max_upload_bytes {
        return Err(UploadError::TooLarge(config.max_upload_bytes));
    }

    let upload_id = Uuid::new_v4().to_string();
    state
        .register(&upload_id, &filename, UploadStatus::Uploading)
        .await;
    info!(
        "Upload {} registered: {} ({} bytes)",
        upload_id,
        filename,
        bytes.len()
    );

    let tx = state.tx.clone();
    let uploads_directory = config.uploads_directory.clone();
    let details = variables.details();
    let custom_meta = variables.custom_meta;
    let upload_id_clone = upload_id.clone();

    tokio::spawn(async move {
        let upload_id_for_blocking = upload_id_clone.clone();
        let handle = tokio::task::spawn_blocking(move || {
            store_document(
                &uploads_directory,
                &upload_id_for_blocking,
                &filename,
                &bytes,
                &details,
                custom_meta,
            )
        });

        let status = match handle.await {
            Ok(Ok(document)) => {
                info!(
                    "Upload {} stored: {} (md5 {})",
                    upload_id_clone, document.filename, document.md5
                );
                UploadStatus::Success
            }
            Ok(Err(e)) => {
                error!("Upload {} failed: {}", upload_id_clone, e);
                UploadStatus::Failed
            }
            Err(e) => {
                error!("Upload {} task join error: {}", upload_id_clone, e);
                UploadStatus::Failed
            }
        };

        report_outcome(&tx, upload_id_clone, status).await;
    });

    Ok(UploadResponse {
        upload_id,
        status: UploadStatus::Uploading,
    })
}

/// Sends the final status to the updater. Returns `false` when the updater has
/// stopped, in which case the record stays `UPLOADING`.
async fn report_outcome(
    tx: &mpsc::Sender<UploadUpdate>,
    upload_id: String,
    status: UploadStatus,
) -> bool {
    match tx.send(UploadUpdate { upload_id, status }).await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Upload {} finished as {} but the updater is gone",
                e.0.upload_id, e.0.status
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_report_outcome_without_updater() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        assert!(!report_outcome(&tx, "u1".to_string(), UploadStatus::Success).await);
    }

    #[actix_web::test]
    async fn test_report_outcome_delivers_update() {
        let (tx, mut rx) = mpsc::channel(1);
        assert!(report_outcome(&tx, "u1".to_string(), UploadStatus::Failed).await);
        let update = rx.recv().await.unwrap();
        assert_eq!(update.upload_id, "u1");
        assert_eq!(update.status, UploadStatus::Failed);
    }
}
