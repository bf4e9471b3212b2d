mod api;
mod components;

use components::handlers;
use components::header::render_header;
use components::preview_area::render_preview_area;
use components::results::render_results;
use components::upload_section::render_upload_section;
use components::utils::render_error_message;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::InferenceResponse;
use web_sys::DragEvent;
use yew::prelude::*;

pub struct FileData {
    pub file: GlooFile,
    pub preview_url: ObjectUrl,
}

pub enum Msg {
    FileSelected(GlooFile),
    ClearFile,
    Analyze,
    InferenceResult(InferenceResponse),
    SetError(Option<String>),
    SetDragging(bool),
    HandleDrop(DragEvent),
}

pub struct Model {
    pub file: Option<FileData>,
    pub result: Option<InferenceResponse>,
    pub loading: bool,
    pub error: Option<String>,
    pub is_dragging: bool,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            file: None,
            result: None,
            loading: false,
            error: None,
            is_dragging: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileSelected(file) => handlers::handle_file_selected(self, file),
            Msg::ClearFile => handlers::handle_clear_file(self),
            Msg::Analyze => handlers::handle_analyze(self, ctx),
            Msg::InferenceResult(response) => handlers::handle_inference_result(self, response),
            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    { render_upload_section(self, ctx) }
                    { render_preview_area(self, ctx) }
                    { render_error_message(self) }
                    { render_results(self) }
                </main>

                <footer class="app-footer">
                    <p>{"CIFAR-10 Image Classifier | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<Model>::new().render();
}
