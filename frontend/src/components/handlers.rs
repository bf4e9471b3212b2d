use super::super::{FileData, Model, Msg};
use super::utils::split_supported_files;
use crate::api::request_inference;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::InferenceResponse;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, FileList};
use yew::html::Scope;
use yew::prelude::*;

pub fn handle_file_selected(model: &mut Model, file: GlooFile) -> bool {
    let preview_url = ObjectUrl::from(file.clone());
    model.file = Some(FileData { file, preview_url });
    model.result = None;
    model.error = None;
    true
}

pub fn handle_clear_file(model: &mut Model) -> bool {
    model.file = None;
    model.result = None;
    model.error = None;
    model.loading = false;
    true
}

pub fn handle_analyze(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(file_data) = model.file.as_ref() else {
        ctx.link()
            .send_message(Msg::SetError(Some("Select an image to classify first.".into())));
        return false;
    };

    model.loading = true;
    model.error = None;
    model.result = None;

    let file = file_data.file.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        match request_inference(&file).await {
            Ok(response) => link.send_message(Msg::InferenceResult(response)),
            Err(e) => {
                log::error!("Inference request failed: {}", e);
                link.send_message(Msg::SetError(Some(e)))
            }
        }
    });

    true
}

pub fn handle_inference_result(model: &mut Model, response: InferenceResponse) -> bool {
    log::info!(
        "Predicted {} ({:.2}%)",
        response.label,
        response.confidence
    );
    model.result = Some(response);
    model.loading = false;
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(file_list) = event.data_transfer().and_then(|dt| dt.files()) {
        process_file_list(ctx.link(), &file_list);
    }

    true
}

/// Picks the first JPG/JPEG/PNG; anything else is reported and dropped.
pub fn process_file_list(link: &Scope<Model>, file_list: &FileList) {
    let (supported, skipped) = split_supported_files(file_list);

    for name in &skipped {
        log::warn!("Skipping unsupported file: {}", name);
    }

    match supported.into_iter().next() {
        Some(file) => link.send_message(Msg::FileSelected(file)),
        None if !skipped.is_empty() => link.send_message(Msg::SetError(Some(format!(
            "Unsupported file: {}. Supported formats: JPG, JPEG, PNG",
            skipped.join(", ")
        )))),
        None => {}
    }
}
