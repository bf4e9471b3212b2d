use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// CIFAR-10 category names, in the order the model emits its scores.
pub const CIFAR10_CLASSES: [&str; 10] = [
    "airplane",
    "automobile",
    "bird",
    "cat",
    "deer",
    "dog",
    "frog",
    "horse",
    "ship",
    "truck",
];

pub const REPORT_MIME_TYPE: &str = "application/pdf";

/// File extensions accepted at the upload boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UploadFormat {
    Jpg,
    Jpeg,
    Png,
}

impl UploadFormat {
    /// Resolves the declared format from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        extension.parse().ok()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            UploadFormat::Jpg | UploadFormat::Jpeg => "image/jpeg",
            UploadFormat::Png => "image/png",
        }
    }

    /// Value for an `<input accept=...>` attribute.
    pub fn accept_attribute() -> String {
        UploadFormat::iter()
            .map(|format| format!(".{}", format))
            .collect::<Vec<_>>()
            .join(",")
    }
}

pub fn report_filename(label: &str) -> String {
    format!("{}_report.pdf", label)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResult {
    pub label: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportPayload {
    pub filename: String,
    pub mime_type: String,
    pub data_base64: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InferenceResponse {
    pub id: String,
    pub predictions: Vec<f32>,
    pub class_labels: Vec<String>,
    pub label: String,
    pub confidence: f32,
    pub report: ReportPayload,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}
