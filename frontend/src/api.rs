use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use shared::{ErrorResponse, InferenceResponse};

/// Uploads one image to the classifier and returns its prediction and report.
pub async fn request_inference(file: &GlooFile) -> Result<InferenceResponse, String> {
    let form_data =
        web_sys::FormData::new().map_err(|_| "Failed to create form data.".to_string())?;
    form_data
        .append_with_blob_and_filename("image", file.as_ref(), &file.name())
        .map_err(|_| "Failed to attach image to request.".to_string())?;

    let response = Request::post("/api/inference")
        .body(form_data)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.ok() {
        response
            .json::<InferenceResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => Err(body.error),
            Err(_) => Err(format!("Server error: {}", status)),
        }
    }
}
