use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorResponse;

/// Failures of the predict-and-report pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Could not decode image: {0}")]
    Decode(String),
    #[error("Model inference failed: {0}")]
    Inference(String),
    #[error("Report generation failed: {0}")]
    Report(String),
}

impl PipelineError {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Decode(_) => "decode",
            PipelineError::Inference(_) => "inference",
            PipelineError::Report(_) => "report",
        }
    }
}

impl From<image::ImageError> for PipelineError {
    fn from(err: image::ImageError) -> Self {
        PipelineError::Decode(err.to_string())
    }
}

impl ResponseError for PipelineError {
    fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::Inference(_) | PipelineError::Report(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            kind: self.kind().to_string(),
        })
    }
}

/// Rejections at the upload boundary, before any pipeline work happens.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Unsupported file type: {0}. Supported formats: JPG, JPEG, PNG")]
    UnsupportedFormat(String),
    #[error("No image file in upload")]
    MissingFile,
    #[error("File too large (limit {0} bytes)")]
    TooLarge(usize),
    #[error("Malformed upload: {0}")]
    Multipart(String),
}

impl From<actix_multipart::MultipartError> for UploadError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        UploadError::Multipart(err.to_string())
    }
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadError::MissingFile | UploadError::Multipart(_) => StatusCode::BAD_REQUEST,
            UploadError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            kind: "upload".to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
