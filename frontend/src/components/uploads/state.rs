//! Runtime state of the upload page.
//!
//! `files` and `statuses` are parallel vectors: `statuses[i]` is the lifecycle
//! of `files[i]`. Both only grow or shrink together, through the methods below.

use common::model::upload::UploadStatus;
use yew::prelude::*;

use super::helpers::{active_doc_after_removal, pending_indices, selection_after_removal};
use super::props::FileUploadPackageProps;

pub struct UploadPage {
    /// Files picked by the user, in selection order.
    pub files: Vec<FileUploadPackageProps>,

    /// Upload status of each entry in `files`.
    pub statuses: Vec<UploadStatus>,

    /// Index into `files` of the file whose details are being edited.
    pub selected_file_num: usize,

    /// Index into `files` of the last document that finished uploading, if any.
    pub active_doc: Option<usize>,

    /// Hidden `<input type="file">` opened by the "Add files" button.
    pub file_input_ref: NodeRef,
}

impl UploadPage {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            statuses: Vec::new(),
            selected_file_num: 0,
            active_doc: None,
            file_input_ref: NodeRef::default(),
        }
    }

    /// Appends new packages with empty details and `NOT_STARTED` status, and
    /// selects the first of them.
    pub fn add_files(&mut self, files: Vec<web_sys::File>) {
        if files.is_empty() {
            return;
        }
        self.selected_file_num = self.files.len();
        for file in files {
            self.files.push(FileUploadPackageProps::new(file));
            self.statuses.push(UploadStatus::NotStarted);
        }
    }

    /// Removes a file unless an upload is in flight, since in-flight uploads
    /// report back by index.
    pub fn remove_file(&mut self, index: usize) -> bool {
        if index >= self.files.len() || self.is_uploading() {
            return false;
        }
        self.files.remove(index);
        self.statuses.remove(index);
        self.selected_file_num =
            selection_after_removal(self.selected_file_num, index, self.files.len());
        self.active_doc = active_doc_after_removal(self.active_doc, index);
        true
    }

    /// `selected_doc` for `RightCol`: past the end of `files` while no document
    /// has finished, so the panel shows no active document.
    pub fn selected_doc(&self) -> usize {
        self.active_doc.unwrap_or(self.files.len())
    }

    pub fn is_uploading(&self) -> bool {
        self.statuses.contains(&UploadStatus::Uploading)
    }

    /// Files that still need to be sent: never started, or failed last time.
    pub fn pending(&self) -> Vec<usize> {
        pending_indices(&self.statuses)
    }
}
