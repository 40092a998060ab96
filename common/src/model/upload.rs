use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Payload of a single upload request, as posted by the frontend to
/// `POST /api/uploads`.
///
/// Field names on the wire are camelCase (`base64FileString`, `customMeta`),
/// which is what the browser client has always sent. The struct itself enforces
/// nothing: metadata values are arbitrary JSON, and the file payload is only
/// checked when the backend calls [`FileUploadVariables::decode_file`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadVariables {
    /// File contents, standard padded base64.
    pub base64_file_string: String,
    pub filename: String,
    /// Free-form key/value metadata attached by the client.
    #[serde(default)]
    pub custom_meta: HashMap<String, Value>,
    pub description: String,
    pub title: String,
}

impl FileUploadVariables {
    /// Builds the request payload for `bytes`, finalizing the optional form
    /// input in `details`.
    ///
    /// A missing or blank title falls back to the filename; a missing
    /// description becomes an empty string.
    pub fn new(
        filename: impl Into<String>,
        bytes: &[u8],
        details: &FileDetailsProps,
        custom_meta: HashMap<String, Value>,
    ) -> Self {
        let filename = filename.into();
        let title = details
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| filename.clone());

        Self {
            base64_file_string: general_purpose::STANDARD.encode(bytes),
            filename,
            custom_meta,
            description: details.description.clone().unwrap_or_default(),
            title,
        }
    }

    /// Decodes the file payload back into raw bytes.
    pub fn decode_file(&self) -> Result<Vec<u8>, base64::DecodeError> {
        general_purpose::STANDARD.decode(self.base64_file_string.trim())
    }

    pub fn details(&self) -> FileDetailsProps {
        FileDetailsProps {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
        }
    }
}

/// Title and description typed by the user for one file before it is uploaded.
/// Both are optional and independent of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDetailsProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FileDetailsProps {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Lifecycle of one upload, from creation to its terminal outcome.
///
/// Serialized with the upper-case names the frontend and backend exchange
/// (`"NOT_STARTED"`, `"UPLOADING"`, `"SUCCESS"`, `"FAILED"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    /// Selected in the UI but not sent yet.
    #[default]
    NotStarted,
    /// Sent to the server, not finished.
    Uploading,
    Success,
    Failed,
}

impl UploadStatus {
    pub const ALL: [UploadStatus; 4] = [
        UploadStatus::NotStarted,
        UploadStatus::Uploading,
        UploadStatus::Success,
        UploadStatus::Failed,
    ];

    /// `Success` and `Failed` end the lifecycle; no transition is expected after them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Success | UploadStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::NotStarted => "NOT_STARTED",
            UploadStatus::Uploading => "UPLOADING",
            UploadStatus::Success => "SUCCESS",
            UploadStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a string that is not one of the four status names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUploadStatus(pub String);

impl fmt::Display for UnknownUploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown upload status: {}", self.0)
    }
}

impl std::error::Error for UnknownUploadStatus {}

impl FromStr for UploadStatus {
    type Err = UnknownUploadStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UploadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownUploadStatus(s.to_string()))
    }
}
