//! Properties for the `RightCol` details panel.

use common::model::upload::FileDetailsProps;
use yew::prelude::*;

use crate::components::uploads::helpers::item_at;
use crate::components::uploads::FileUploadPackageProps;

/// Inputs of the right-hand panel.
///
/// `selected_file_num` and `selected_doc` are plain indices into `files` and
/// are not checked against its length; the panel renders an empty state for an
/// index that does not point at a file.
#[derive(Properties, PartialEq, Clone)]
pub struct RightColProps {
    pub files: Vec<FileUploadPackageProps>,

    /// File whose title and description are edited in the panel.
    pub selected_file_num: usize,

    /// File shown as the active document in the panel header.
    pub selected_doc: usize,

    /// Receives the complete, updated details of the selected file on every edit.
    pub handle_change: Callback<FileDetailsProps>,

    /// Disables the inputs, e.g. while the selected file is uploading.
    #[prop_or_default]
    pub readonly: bool,
}

impl RightColProps {
    pub fn selected_file(&self) -> Option<&FileUploadPackageProps> {
        item_at(&self.files, self.selected_file_num)
    }

    pub fn selected_document(&self) -> Option<&FileUploadPackageProps> {
        item_at(&self.files, self.selected_doc)
    }
}
