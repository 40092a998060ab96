use crate::model::upload::{FileDetailsProps, UploadStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Returned by both upload endpoints. The client polls
/// `/api/uploads/status/{upload_id}` while `status` is not terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub upload_id: String,
    pub status: UploadStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatusResponse {
    pub upload_id: String,
    pub status: UploadStatus,
    pub filename: Option<String>,
}

/// `json` part of a multipart upload. Must be sent before the `file` part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipartUploadDetails {
    #[serde(flatten)]
    pub details: FileDetailsProps,
    #[serde(default)]
    pub custom_meta: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_details_flatten() {
        let raw = r#"{"title":"Doc","customMeta":{"lang":"en"}}"#;
        let parsed: MultipartUploadDetails = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.details.title.as_deref(), Some("Doc"));
        assert_eq!(parsed.details.description, None);
        assert_eq!(parsed.custom_meta["lang"], "en");
    }

    #[test]
    fn test_upload_response_status_wire_name() {
        let resp = UploadResponse {
            upload_id: "abc".to_string(),
            status: UploadStatus::Uploading,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"uploadId":"abc","status":"UPLOADING"}"#);
    }

    #[test]
    fn test_status_response_wire_names() {
        let raw = r#"{"uploadId":"abc","status":"FAILED","filename":null}"#;
        let parsed: UploadStatusResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.upload_id, "abc");
        assert_eq!(parsed.status, UploadStatus::Failed);
        assert_eq!(parsed.filename, None);
    }
}
