//! Right-hand panel of the upload page: title and description form for the
//! selected file, plus the active document header.

use common::model::upload::FileDetailsProps;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

mod props;

pub use props::RightColProps;

use crate::components::uploads::helpers::format_size;

pub struct RightCol;

impl Component for RightCol {
    type Message = ();
    type Properties = RightColProps;

    fn create(_ctx: &Context<Self>) -> Self {
        RightCol
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();

        html! {
            <aside class="right-col">
                { active_document_header(props) }
                {
                    match props.selected_file() {
                        Some(package) => details_form(props, package.filename(), package.file.size(), &package.form_data),
                        None => html! {
                            <p class="right-col-empty">{"Select a file to edit its details."}</p>
                        },
                    }
                }
            </aside>
        }
    }
}

fn active_document_header(props: &RightColProps) -> Html {
    match props.selected_document() {
        Some(document) => html! {
            <div class="right-col-doc">
                <i class="material-icons">{"description"}</i>
                <span>{ format!("Document {}: {}", props.selected_doc + 1, document.filename()) }</span>
            </div>
        },
        None => html! {},
    }
}

fn details_form(props: &RightColProps, filename: String, size: f64, details: &FileDetailsProps) -> Html {
    let on_title = {
        let handle_change = props.handle_change.clone();
        let details = details.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            handle_change.emit(details.clone().with_title(input.value()));
        })
    };
    let on_description = {
        let handle_change = props.handle_change.clone();
        let details = details.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            handle_change.emit(details.clone().with_description(input.value()));
        })
    };

    html! {
        <form class="right-col-form" onsubmit={Callback::from(|e: SubmitEvent| e.prevent_default())}>
            <h3>{ filename.clone() }</h3>
            <small>{ format_size(size) }</small>
            <label for="file-title">{"Title"}</label>
            <input
                id="file-title"
                type="text"
                placeholder={filename}
                value={details.title.clone().unwrap_or_default()}
                disabled={props.readonly}
                oninput={on_title}
            />
            <label for="file-description">{"Description"}</label>
            <textarea
                id="file-description"
                rows="4"
                value={details.description.clone().unwrap_or_default()}
                disabled={props.readonly}
                oninput={on_description}
            />
        </form>
    }
}
