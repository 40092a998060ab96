use crate::config::ServerConfig;
use crate::error::UploadError;
use crate::services::uploads::storage::{sanitize_filename, store_document};
use crate::upload_controller::state::UploadsState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::model::upload::UploadStatus;
use common::requests::{MultipartUploadDetails, UploadResponse};
use futures_util::StreamExt;
use log::info;
use serde_json::from_slice;
use uuid::Uuid;

/// `POST /api/uploads/multipart`
///
/// Expects a `json` part (`MultipartUploadDetails`) followed by a `file` part.
/// The document is stored before responding, so the returned status is already
/// terminal.
pub(crate) async fn process(
    state: web::Data<UploadsState>,
    config: web::Data<ServerConfig>,
    payload: Multipart,
) -> Result<HttpResponse, UploadError> {
    let response = upload_multipart(&state, &config, payload).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn upload_multipart(
    state: &UploadsState,
    config: &ServerConfig,
    mut payload: Multipart,
) -> Result<UploadResponse, UploadError> {
    let mut upload_details: Option<MultipartUploadDetails> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match field_name.as_deref() {
            Some("json") => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    bytes.extend_from_slice(&chunk?);
                }
                upload_details = Some(from_slice(&bytes)?);
            }

            Some("file") => {
                if upload_details.is_none() {
                    return Err(UploadError::MissingPart("json (must be sent before file)"));
                }
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                let filename = sanitize_filename(&filename)?;

                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk?;
                    if bytes.len() + chunk.len() > config.max_upload_bytes {
                        return Err(UploadError::TooLarge(config.max_upload_bytes));
                    }
                    bytes.extend_from_slice(&chunk);
                }
                file = Some((filename, bytes));
            }

            _ => {}
        }
    }

    let upload_details = upload_details.ok_or(UploadError::MissingPart("json"))?;
    let (filename, bytes) = file.ok_or(UploadError::MissingPart("file"))?;

    let upload_id = Uuid::new_v4().to_string();
    let uploads_directory = config.uploads_directory.clone();
    let upload_id_for_blocking = upload_id.clone();
    let document = web::block(move || {
        store_document(
            &uploads_directory,
            &upload_id_for_blocking,
            &filename,
            &bytes,
            &upload_details.details,
            upload_details.custom_meta,
        )
    })
    .await
    .map_err(|e| UploadError::Io(std::io::Error::other(e.to_string())))?
    .map_err(UploadError::from)?;

    state
        .register(&upload_id, &document.filename, UploadStatus::Success)
        .await;
    info!(
        "Upload {} stored from multipart: {} ({} bytes)",
        upload_id, document.filename, document.size
    );

    Ok(UploadResponse {
        upload_id,
        status: UploadStatus::Success,
    })
}
