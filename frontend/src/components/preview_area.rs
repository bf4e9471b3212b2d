use super::super::{Model, Msg};
use super::utils::debounce;
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(file_data) = &model.file else {
        return html! {};
    };

    let link = ctx.link().clone();
    let file_name = file_data.file.name();

    html! {
        <div id="preview-container">
            <div class="selected-image-preview">
                <img src={file_data.preview_url.to_string()} alt={file_name.clone()} width="200" />
                <p class="preview-caption">{ format!("Uploaded Image: {}", file_name) }</p>
            </div>
            <div class="button-container">
                <button
                    id="clear-btn"
                    class="analyze-btn"
                    style="background-color: var(--clear-color);"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::ClearFile)
                    })}
                >
                    <i class="fa-solid fa-trash"></i>{" Clear"}
                </button>
                <button
                    class="analyze-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Analyze)
                    })}
                    disabled={model.loading}
                >
                    {
                        if model.loading {
                            html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Processing..."}</> }
                        } else {
                            html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Classify"}</> }
                        }
                    }
                </button>
            </div>
        </div>
    }
}
