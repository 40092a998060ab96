use actix_web::error::JsonPayloadError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
    #[error("cannot read config file {0}: {1}")]
    Read(String, std::io::Error),
    #[error("config file error: {0}")]
    File(#[from] toml::de::Error),
}

/// Failures while writing a document to disk.
///
/// Kept separate from `UploadError` so it can cross `spawn_blocking` and
/// `web::block`, which need a `Send` result.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("file is empty")]
    EmptyFile,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("invalid filename: {0}")]
    InvalidFilename(String),
    #[error("file payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("file is empty")]
    EmptyFile,
    #[error("missing multipart field: {0}")]
    MissingPart(&'static str),
    #[error("file exceeds the upload limit of {0} bytes")]
    TooLarge(usize),
    #[error("multipart error: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid request body: {0}")]
    InvalidRequest(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("upload not found")]
    NotFound,
}

impl UploadError {
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::InvalidFilename(_) => "INVALID_FILENAME",
            UploadError::InvalidBase64(_) => "INVALID_BASE64",
            UploadError::EmptyFile => "EMPTY_FILE",
            UploadError::MissingPart(_) => "MISSING_PART",
            UploadError::TooLarge(_) => "TOO_LARGE",
            UploadError::Multipart(_) => "MULTIPART_ERROR",
            UploadError::Json(_) => "JSON_ERROR",
            UploadError::InvalidRequest(_) => "INVALID_REQUEST",
            UploadError::Io(_) => "IO_ERROR",
            UploadError::NotFound => "NOT_FOUND",
        }
    }
}

impl From<StorageError> for UploadError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::EmptyFile => UploadError::EmptyFile,
            StorageError::Io(e) => UploadError::Io(e),
            StorageError::Json(e) => UploadError::Json(e),
        }
    }
}

impl UploadError {
    /// Maps a rejected JSON body onto the API's error shape. `max_upload_bytes`
    /// is reported for oversized bodies.
    pub fn from_json_payload(e: JsonPayloadError, max_upload_bytes: usize) -> Self {
        match e {
            JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                UploadError::TooLarge(max_upload_bytes)
            }
            JsonPayloadError::Deserialize(e) => UploadError::Json(e),
            other => UploadError::InvalidRequest(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::NotFound => StatusCode::NOT_FOUND,
            UploadError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("{:#?}", self);
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}

    #[test]
    fn test_storage_result_is_send() {
        assert_send::<Result<crate::services::uploads::storage::StoredDocument, StorageError>>();
    }

    #[test]
    fn test_storage_errors_keep_their_code() {
        assert_eq!(UploadError::from(StorageError::EmptyFile).code(), "EMPTY_FILE");
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = UploadError::from(StorageError::Io(io));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_json_payload_mapping() {
        let overflow = JsonPayloadError::OverflowKnownLength { length: 10, limit: 5 };
        let err = UploadError::from_json_payload(overflow, 5);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.code(), "TOO_LARGE");

        let missing = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = UploadError::from_json_payload(JsonPayloadError::Deserialize(missing), 5);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "JSON_ERROR");

        let err = UploadError::from_json_payload(JsonPayloadError::ContentType, 5);
        assert_eq!(err.code(), "INVALID_REQUEST");
    }
}
