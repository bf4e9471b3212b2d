use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-robot"></i> {" AI Image Classifier"}</h1>
            <p class="subtitle">{"Upload an image and a CNN trained on CIFAR-10 predicts its category"}</p>
        </header>
    }
}
