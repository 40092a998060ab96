//! Small helpers shared by the update and view logic of the upload page.
//!
//! - Selection bookkeeping that does not depend on browser objects.
//! - Display formatting for sizes and statuses.
//! - Toast notifications for user feedback.

use common::model::upload::UploadStatus;
use num_format::{Locale, ToFormattedString};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Keeps a selection index valid after the list shrank to `len` items.
pub fn clamp_selection(selected: usize, len: usize) -> usize {
    selected.min(len.saturating_sub(1))
}

/// Where the selection lands after the item at `removed` was taken out of a list
/// that now has `len` items. Items after `removed` shift down by one.
pub fn selection_after_removal(selected: usize, removed: usize, len: usize) -> usize {
    if removed < selected {
        selected - 1
    } else {
        clamp_selection(selected, len)
    }
}

/// Same as `selection_after_removal` for the active document, which goes away
/// together with its file.
pub fn active_doc_after_removal(active: Option<usize>, removed: usize) -> Option<usize> {
    match active {
        Some(doc) if doc == removed => None,
        Some(doc) if doc > removed => Some(doc - 1),
        other => other,
    }
}

/// Details may change until the file has been sent, and again after a failure.
pub fn details_editable(statuses: &[UploadStatus], index: usize) -> bool {
    matches!(
        statuses.get(index),
        Some(UploadStatus::NotStarted | UploadStatus::Failed)
    )
}

/// `items[index]`, or `None` when the index points past the end.
pub fn item_at<T>(items: &[T], index: usize) -> Option<&T> {
    items.get(index)
}

/// Indices whose status means the file should be (re)sent.
pub fn pending_indices(statuses: &[UploadStatus]) -> Vec<usize> {
    statuses
        .iter()
        .enumerate()
        .filter(|(_, status)| matches!(status, UploadStatus::NotStarted | UploadStatus::Failed))
        .map(|(i, _)| i)
        .collect()
}

/// `12345.0` -> `"12,345 bytes"`. Browser file sizes arrive as `f64`.
pub fn format_size(bytes: f64) -> String {
    let bytes = if bytes.is_finite() && bytes > 0.0 { bytes as u64 } else { 0 };
    format!("{} bytes", bytes.to_formatted_string(&Locale::en))
}

pub fn status_label(status: UploadStatus) -> &'static str {
    match status {
        UploadStatus::NotStarted => "Ready",
        UploadStatus::Uploading => "Uploading…",
        UploadStatus::Success => "Uploaded",
        UploadStatus::Failed => "Failed",
    }
}

/// CSS class for the status badge, e.g. `status-uploading`.
pub fn status_class(status: UploadStatus) -> String {
    format!("status-{}", status.as_str().to_ascii_lowercase().replace('_', "-"))
}

/// One-line summary shown above the file list.
pub fn summarize(statuses: &[UploadStatus]) -> String {
    let count = |wanted: UploadStatus| statuses.iter().filter(|s| **s == wanted).count();
    format!(
        "{} files · {} uploaded · {} failed",
        statuses.len(),
        count(UploadStatus::Success),
        count(UploadStatus::Failed)
    )
}

/// Shows a short-lived notification at the bottom of the screen.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_selection() {
        assert_eq!(clamp_selection(3, 2), 1);
        assert_eq!(clamp_selection(1, 5), 1);
        assert_eq!(clamp_selection(4, 0), 0);
    }

    #[test]
    fn test_selection_follows_its_file_on_removal() {
        // [A, B, C] with B selected, A removed: B is now at 0.
        assert_eq!(selection_after_removal(1, 0, 2), 0);
        // C selected, A removed: C is now at 1.
        assert_eq!(selection_after_removal(2, 0, 2), 1);
        // A selected, C removed: unchanged.
        assert_eq!(selection_after_removal(0, 2, 2), 0);
        // The selected (last) file removed: falls back to the new last one.
        assert_eq!(selection_after_removal(2, 2, 2), 1);
        // List emptied.
        assert_eq!(selection_after_removal(0, 0, 0), 0);
    }

    #[test]
    fn test_active_doc_on_removal() {
        assert_eq!(active_doc_after_removal(Some(1), 1), None);
        assert_eq!(active_doc_after_removal(Some(2), 0), Some(1));
        assert_eq!(active_doc_after_removal(Some(0), 2), Some(0));
        assert_eq!(active_doc_after_removal(None, 0), None);
    }

    #[test]
    fn test_details_editable_only_before_send_or_after_failure() {
        let statuses = [
            UploadStatus::NotStarted,
            UploadStatus::Uploading,
            UploadStatus::Success,
            UploadStatus::Failed,
        ];
        assert!(details_editable(&statuses, 0));
        assert!(!details_editable(&statuses, 1));
        assert!(!details_editable(&statuses, 2));
        assert!(details_editable(&statuses, 3));
        assert!(!details_editable(&statuses, 4));
        assert!(!details_editable(&[], 0));
    }

    #[test]
    fn test_item_at_out_of_range() {
        let items = ["a.pdf", "b.pdf"];
        assert_eq!(item_at(&items, 1), Some(&"b.pdf"));
        assert_eq!(item_at(&items, 2), None);
        assert_eq!(item_at(&items, usize::MAX), None);
        assert_eq!(item_at::<&str>(&[], 0), None);
    }

    #[test]
    fn test_pending_indices_skip_in_flight_and_done() {
        let statuses = [
            UploadStatus::NotStarted,
            UploadStatus::Uploading,
            UploadStatus::Success,
            UploadStatus::Failed,
        ];
        assert_eq!(pending_indices(&statuses), vec![0, 3]);
        assert!(pending_indices(&[]).is_empty());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(1234567.0), "1,234,567 bytes");
        assert_eq!(format_size(0.0), "0 bytes");
        assert_eq!(format_size(f64::NAN), "0 bytes");
    }

    #[test]
    fn test_status_presentation() {
        assert_eq!(status_class(UploadStatus::NotStarted), "status-not-started");
        assert_eq!(status_label(UploadStatus::Success), "Uploaded");
        assert_eq!(
            summarize(&[UploadStatus::Success, UploadStatus::Failed, UploadStatus::Success]),
            "3 files · 2 uploaded · 1 failed"
        );
    }
}
