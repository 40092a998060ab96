use common::model::upload::{FileDetailsProps, UploadStatus};

pub enum Msg {
    OpenFileDialog,
    FilesSelected(Vec<web_sys::File>),
    SelectFile(usize),
    /// Emitted by `RightCol` with the full, updated details of the selected file.
    DetailsChanged(FileDetailsProps),
    RemoveFile(usize),
    UploadAll,
    StatusChanged { index: usize, status: UploadStatus },
}
