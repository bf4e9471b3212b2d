use chrono::NaiveDateTime;

use crate::error::PipelineError;
use crate::inference::classifier::{Classification, Classifier};
use crate::inference::preprocess::preprocess;
use crate::report::{generate_report, Report};
use crate::upload::UploadedImage;

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub classification: Classification,
    pub report: Report,
}

/// Preprocess, classify, then render the report, in that order.
#[derive(Clone)]
pub struct Pipeline {
    classifier: Classifier,
}

impl Pipeline {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn run(
        &self,
        image: &UploadedImage,
        generated_at: &NaiveDateTime,
    ) -> Result<PipelineOutput, PipelineError> {
        let tensor = preprocess(&image.data)?;
        let classification = self.classifier.classify(&tensor)?;
        log::debug!(
            "{} classified as {} ({:.2}%)",
            image.file_name,
            classification.result.label,
            classification.result.confidence
        );

        let report = generate_report(&classification.result, generated_at, &image.data)?;

        Ok(PipelineOutput {
            classification,
            report,
        })
    }
}
