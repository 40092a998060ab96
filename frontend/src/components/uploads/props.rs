//! Properties for the upload page and the data it hands to its children.

use common::model::upload::FileDetailsProps;
use yew::prelude::*;

/// One pending upload unit: the browser file handle and the details the user
/// typed for it.
#[derive(Clone, PartialEq, Debug)]
pub struct FileUploadPackageProps {
    pub file: web_sys::File,
    pub form_data: FileDetailsProps,
}

impl FileUploadPackageProps {
    /// Wraps a freshly selected file with empty details.
    pub fn new(file: web_sys::File) -> Self {
        Self {
            file,
            form_data: FileDetailsProps::default(),
        }
    }

    pub fn filename(&self) -> String {
        self.file.name()
    }
}

/// Properties for `UploadPage`.
#[derive(Properties, PartialEq, Clone)]
pub struct UploadPageProps {
    /// Base path of the upload API. Status is polled under `{api_path}/status/{id}`.
    #[prop_or(AttrValue::Static("/api/uploads"))]
    pub api_path: AttrValue,

    /// Delay between status polls while an upload is `UPLOADING`.
    #[prop_or(500)]
    pub poll_interval_ms: u32,
}
