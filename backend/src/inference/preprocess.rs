use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

use crate::error::PipelineError;

pub const INPUT_WIDTH: u32 = 32;
pub const INPUT_HEIGHT: u32 = 32;
pub const INPUT_CHANNELS: usize = 3;

/// Model input, NHWC `(1, 32, 32, 3)` with every value in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedTensor(Array4<f32>);

impl PreprocessedTensor {
    pub fn shape(&self) -> [usize; 4] {
        let dim = self.0.dim();
        [dim.0, dim.1, dim.2, dim.3]
    }

    #[cfg(test)]
    pub fn view(&self) -> &Array4<f32> {
        &self.0
    }

    pub fn as_slice(&self) -> &[f32] {
        // Always built by `from_shape_vec`, so the layout is contiguous.
        self.0.as_slice().unwrap_or(&[])
    }
}

pub fn preprocess(image_bytes: &[u8]) -> Result<PreprocessedTensor, PipelineError> {
    let image = image::load_from_memory(image_bytes)?;
    image_to_tensor(&image)
}

pub fn image_to_tensor(image: &DynamicImage) -> Result<PreprocessedTensor, PipelineError> {
    let resized = image.resize_exact(INPUT_WIDTH, INPUT_HEIGHT, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let data: Vec<f32> = rgb
        .into_raw()
        .into_iter()
        .map(|channel| channel as f32 / 255.0)
        .collect();

    let tensor = Array4::from_shape_vec(
        (1, INPUT_HEIGHT as usize, INPUT_WIDTH as usize, INPUT_CHANNELS),
        data,
    )
    .map_err(|e| PipelineError::Decode(format!("Failed to create tensor: {}", e)))?;

    Ok(PreprocessedTensor(tensor))
}
