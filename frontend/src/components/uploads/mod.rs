//! Upload page: root module wiring the Yew `Component` implementation with
//! submodules for props, state, update logic, view rendering and helpers.

use yew::prelude::*;

pub mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::{FileUploadPackageProps, UploadPageProps};
pub use state::UploadPage;

impl Component for UploadPage {
    type Message = Msg;
    type Properties = UploadPageProps;

    fn create(_ctx: &Context<Self>) -> Self {
        UploadPage::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
