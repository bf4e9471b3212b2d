use super::super::Model;
use shared::InferenceResponse;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    match &model.result {
        Some(result) => html! {
            <div class="results-container">
                <div class="result-header">
                    <h2>{ "Prediction Result" }</h2>
                    <h3 class="predicted-class">{ &result.label }</h3>
                    <div class="confidence-meter">
                        <div class="meter-label">{"Confidence:"}</div>
                        <div class="meter">
                            <div class="meter-fill" style={format!("width: {}%", result.confidence)}></div>
                        </div>
                        <div class="meter-value">{format!("{:.2}%", result.confidence)}</div>
                    </div>
                </div>
                { render_class_bars(result) }
                { render_download(result) }
            </div>
        },
        None => html! {},
    }
}

fn render_class_bars(result: &InferenceResponse) -> Html {
    html! {
        <div class="detailed-results">
            <h3>{"All Classes"}</h3>
            <div class="result-bars">
                { for result.class_labels.iter().zip(&result.predictions).map(|(class_name, &p)| {
                    let percentage = p * 100.0;
                    html! {
                        <div class={classes!("result-item", (*class_name == result.label).then_some("top-class"))}>
                            <div class="result-label">{ class_name }</div>
                            <div class="result-bar-container">
                                <div class="result-bar" style={format!("width: {}%", percentage)}></div>
                            </div>
                            <div class="result-value">{ format!("{:.2}%", percentage) }</div>
                        </div>
                    }
                })}
            </div>
        </div>
    }
}

fn render_download(result: &InferenceResponse) -> Html {
    let href = format!(
        "data:{};base64,{}",
        result.report.mime_type, result.report.data_base64
    );

    html! {
        <div class="download-section">
            <h3>{"Download Report"}</h3>
            <a class="analyze-btn" href={href} download={result.report.filename.clone()}>
                <i class="fa-solid fa-file-pdf"></i>{" Download PDF Report"}
            </a>
        </div>
    }
}
