//! HTTP API for document uploads.
//!
//! The provided routes are:
//! - `POST /api/uploads`: JSON `FileUploadVariables` body. The upload is
//!   registered as `UPLOADING` and its `upload_id` returned immediately; the
//!   file is written in the background.
//!
//! - `POST /api/uploads/multipart`: multipart/form-data with a `json` part
//!   (title, description, custom metadata) followed by a `file` part. Stored
//!   before the response is sent.
//!
//! - `GET /api/uploads/status/{upload_id}`: current `UploadStatus` of an upload
//!   from the shared `UploadsState`, or `404` for an unknown id.

use crate::error::UploadError;
use actix_web::web::{get, post, scope, JsonConfig};
use actix_web::Scope;

mod create;
mod get_status;
mod multipart;
pub mod storage;

const API_PATH: &str = "/api/uploads";

/// Configures and returns the Actix scope for upload routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("/multipart", post().to(multipart::process))
        .route("/status/{upload_id}", get().to(get_status::process))
}

/// JSON extractor settings for the upload routes. Rejected bodies get the same
/// `{"error", "message"}` shape as every other upload error.
pub fn json_config(max_upload_bytes: usize) -> JsonConfig {
    JsonConfig::default()
        .limit(json_limit(max_upload_bytes))
        .error_handler(move |err, _req| UploadError::from_json_payload(err, max_upload_bytes).into())
}

/// Base64 inflates the payload by 4/3; leave room for the other fields.
fn json_limit(max_upload_bytes: usize) -> usize {
    (max_upload_bytes / 3)
        .saturating_add(1)
        .saturating_mul(4)
        .saturating_add(64 * 1024)
}
