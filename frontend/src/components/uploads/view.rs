//! View rendering for the upload page: a file list with per-file status on the
//! left and the `RightCol` details panel on the right.

use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::{details_editable, format_size, status_class, status_label, summarize};
use super::messages::Msg;
use super::state::UploadPage;
use crate::components::right_col::RightCol;

pub fn view(component: &UploadPage, ctx: &Context<UploadPage>) -> Html {
    let link = ctx.link();
    let editable = details_editable(&component.statuses, component.selected_file_num);

    html! {
        <div class="upload-root">
            { build_toolbar(component, link) }
            <div class="upload-columns">
                { build_file_list(component, link) }
                <RightCol
                    files={component.files.clone()}
                    selected_file_num={component.selected_file_num}
                    selected_doc={component.selected_doc()}
                    handle_change={link.callback(Msg::DetailsChanged)}
                    readonly={!editable}
                />
            </div>
        </div>
    }
}

fn build_toolbar(component: &UploadPage, link: &Scope<UploadPage>) -> Html {
    let on_files = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = input
            .files()
            .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
            .unwrap_or_default();
        // Allow picking the same file again later.
        input.set_value("");
        Msg::FilesSelected(files)
    });

    html! {
        <div class="icon-toolbar">
            <input
                type="file"
                multiple=true
                style="display:none"
                ref={component.file_input_ref.clone()}
                onchange={on_files}
            />
            <button class="icon-btn" title="Add files" onclick={link.callback(|_| Msg::OpenFileDialog)}>
                <i class="material-icons">{"note_add"}</i>
                <span class="icon-label">{"Add files"}</span>
            </button>
            <button
                class="icon-btn"
                title="Upload"
                disabled={component.pending().is_empty()}
                onclick={link.callback(|_| Msg::UploadAll)}
            >
                <i class="material-icons">{"cloud_upload"}</i>
                <span class="icon-label">{"Upload"}</span>
            </button>
            <span class="upload-summary">{ summarize(&component.statuses) }</span>
        </div>
    }
}

fn build_file_list(component: &UploadPage, link: &Scope<UploadPage>) -> Html {
    if component.files.is_empty() {
        return html! { <p class="upload-empty">{"No files selected."}</p> };
    }

    html! {
        <ul class="upload-list">
            { for component.files.iter().zip(component.statuses.iter()).enumerate().map(|(index, (package, status))| {
                let selected = index == component.selected_file_num;
                html! {
                    <li
                        class={classes!("upload-item", selected.then_some("selected"))}
                        onclick={link.callback(move |_| Msg::SelectFile(index))}
                    >
                        <span class="upload-name">{ package.filename() }</span>
                        <span class="upload-size">{ format_size(package.file.size()) }</span>
                        <span class={classes!("upload-status", status_class(*status))}>{ status_label(*status) }</span>
                        <button
                            class="icon-btn"
                            title="Remove"
                            disabled={component.is_uploading()}
                            onclick={link.callback(move |e: MouseEvent| {
                                e.stop_propagation();
                                Msg::RemoveFile(index)
                            })}
                        >
                            <i class="material-icons">{"close"}</i>
                        </button>
                    </li>
                }
            }) }
        </ul>
    }
}
