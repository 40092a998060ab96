//! Update function for the upload page.
//!
//! Elm-style: receives the current `UploadPage` state, the `Context` and a
//! `Msg`, mutates the state and returns whether the view should re-render.
//!
//! Uploading a file goes: read bytes with `gloo-file` -> build
//! `FileUploadVariables` -> `POST {api_path}` -> poll
//! `GET {api_path}/status/{upload_id}` until the status is terminal. Each file
//! runs in its own `spawn_local` task and reports back with
//! `Msg::StatusChanged`.

use std::collections::HashMap;

use common::model::upload::{FileUploadVariables, UploadStatus};
use common::requests::{UploadResponse, UploadStatusResponse};
use gloo_console::{error, log};
use gloo_file::{futures::read_as_bytes, Blob};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde_json::{json, Value};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::{details_editable, show_toast};
use super::messages::Msg;
use super::props::FileUploadPackageProps;
use super::state::UploadPage;

/// Give up on a server that never reports a terminal status.
const MAX_STATUS_POLLS: u32 = 600;

pub fn update(component: &mut UploadPage, ctx: &Context<UploadPage>, msg: Msg) -> bool {
    match msg {
        Msg::OpenFileDialog => {
            if let Some(input) = component.file_input_ref.cast::<web_sys::HtmlInputElement>() {
                input.click();
            }
            false
        }
        Msg::FilesSelected(files) => {
            let added = files.len();
            component.add_files(files);
            log!(format!("{} file(s) added", added));
            added > 0
        }
        Msg::SelectFile(index) => {
            if index < component.files.len() && index != component.selected_file_num {
                component.selected_file_num = index;
                return true;
            }
            false
        }
        Msg::DetailsChanged(details) => {
            let index = component.selected_file_num;
            let editable = details_editable(&component.statuses, index);
            match component.files.get_mut(index) {
                Some(package) if editable => {
                    package.form_data = details;
                    true
                }
                _ => false,
            }
        }
        Msg::RemoveFile(index) => {
            if component.remove_file(index) {
                true
            } else {
                show_toast("Files cannot be removed while an upload is running.");
                false
            }
        }
        Msg::UploadAll => {
            let pending = component.pending();
            if pending.is_empty() {
                show_toast("Nothing to upload.");
                return false;
            }
            let api_path = ctx.props().api_path.to_string();
            let poll_interval_ms = ctx.props().poll_interval_ms;
            for index in pending {
                component.statuses[index] = UploadStatus::Uploading;
                let package = component.files[index].clone();
                let link = ctx.link().clone();
                let api_path = api_path.clone();
                spawn_local(async move {
                    let status = match upload_package(&api_path, poll_interval_ms, &package).await {
                        Ok(status) => status,
                        Err(err) => {
                            error!(format!("Upload of {} failed: {}", package.filename(), err));
                            UploadStatus::Failed
                        }
                    };
                    link.send_message(Msg::StatusChanged { index, status });
                });
            }
            true
        }
        Msg::StatusChanged { index, status } => {
            let Some(current) = component.statuses.get_mut(index) else {
                return false;
            };
            *current = status;
            let filename = component.files[index].filename();
            match status {
                UploadStatus::Success => {
                    component.active_doc = Some(index);
                    show_toast(&format!("{} uploaded.", filename));
                }
                UploadStatus::Failed => {
                    show_toast(&format!("Upload of {} failed.", filename));
                }
                _ => {}
            }
            true
        }
    }
}

/// Metadata collected from the browser's view of the file.
fn browser_meta(file: &web_sys::File) -> HashMap<String, Value> {
    HashMap::from([
        ("size".to_string(), json!(file.size())),
        ("mimeType".to_string(), json!(file.type_())),
        ("lastModified".to_string(), json!(file.last_modified())),
    ])
}

/// Sends one package and waits for its terminal status.
async fn upload_package(
    api_path: &str,
    poll_interval_ms: u32,
    package: &FileUploadPackageProps,
) -> Result<UploadStatus, String> {
    let blob = Blob::from(package.file.clone());
    let bytes = read_as_bytes(&blob).await.map_err(|e| e.to_string())?;
    let variables = FileUploadVariables::new(
        package.filename(),
        &bytes,
        &package.form_data,
        browser_meta(&package.file),
    );

    let response = Request::post(api_path)
        .json(&variables)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!(
            "server answered {}: {}",
            response.status(),
            response.text().await.unwrap_or_default()
        ));
    }
    let created: UploadResponse = response.json().await.map_err(|e| e.to_string())?;

    let status_url = format!("{}/status/{}", api_path, created.upload_id);
    let mut status = created.status;
    let mut polls = 0;
    while !status.is_terminal() {
        if polls == MAX_STATUS_POLLS {
            return Err(format!("no final status for upload {}", created.upload_id));
        }
        polls += 1;
        TimeoutFuture::new(poll_interval_ms).await;

        let response = Request::get(&status_url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.ok() {
            return Err(format!("status check answered {}", response.status()));
        }
        let polled: UploadStatusResponse = response.json().await.map_err(|e| e.to_string())?;
        status = polled.status;
    }
    Ok(status)
}
