use super::super::Model;
use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use shared::UploadFormat;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        *timeout_ref = Some(Timeout::new(duration as u32, move || {
            inner_callback();
        }));
    })
}

/// Splits a file list into accepted files and the names of rejected ones.
pub fn split_supported_files(file_list: &FileList) -> (Vec<GlooFile>, Vec<String>) {
    let mut supported = Vec::new();
    let mut skipped = Vec::new();

    for file in (0..file_list.length()).filter_map(|i| file_list.item(i)) {
        if UploadFormat::from_file_name(&file.name()).is_some() {
            supported.push(GlooFile::from(file));
        } else {
            skipped.push(file.name());
        }
    }

    (supported, skipped)
}

pub fn render_error_message(model: &Model) -> Html {
    if let Some(error_msg) = &model.error {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}
