use tract_onnx::prelude::*;

use super::preprocess::{PreprocessedTensor, INPUT_CHANNELS, INPUT_HEIGHT, INPUT_WIDTH};
use crate::error::PipelineError;

/// A pretrained network: one forward pass, one raw score per class.
pub trait ScoreModel: Send + Sync {
    fn forward(&self, input: &PreprocessedTensor) -> Result<Vec<f32>, PipelineError>;

    fn describe(&self) -> String;
}

/// ONNX export of the CIFAR-10 CNN, run on CPU with tract.
pub struct OnnxModel {
    plan: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    path: String,
}

impl OnnxModel {
    pub fn load(model_path: &str) -> Result<Self, PipelineError> {
        let input_shape = [
            1,
            INPUT_HEIGHT as usize,
            INPUT_WIDTH as usize,
            INPUT_CHANNELS,
        ];

        let plan = tract_onnx::onnx()
            .model_for_path(model_path)
            .and_then(|model| model.with_input_fact(0, f32::fact(input_shape).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                PipelineError::Inference(format!("Failed to load model {}: {}", model_path, e))
            })?;

        Ok(Self {
            plan,
            path: model_path.to_string(),
        })
    }
}

impl ScoreModel for OnnxModel {
    fn forward(&self, input: &PreprocessedTensor) -> Result<Vec<f32>, PipelineError> {
        let tensor = Tensor::from_shape::<f32>(&input.shape(), input.as_slice())
            .map_err(|e| PipelineError::Inference(format!("Failed to create tensor: {}", e)))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into_tvalue()))
            .map_err(|e| PipelineError::Inference(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| PipelineError::Inference("Model produced no outputs".to_string()))?;

        let scores = output
            .to_array_view::<f32>()
            .map_err(|e| PipelineError::Inference(format!("Unexpected output tensor: {}", e)))?;

        Ok(scores.iter().copied().collect())
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}
