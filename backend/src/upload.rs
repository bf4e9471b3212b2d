use actix_multipart::Multipart;
use futures::{StreamExt, TryStreamExt};
use shared::UploadFormat;

use crate::error::UploadError;

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub format: UploadFormat,
    pub data: Vec<u8>,
}

impl UploadedImage {
    /// Admits a file only when its declared extension is jpg, jpeg or png.
    pub fn new(file_name: &str, data: Vec<u8>) -> Result<Self, UploadError> {
        let format = UploadFormat::from_file_name(file_name)
            .ok_or_else(|| UploadError::UnsupportedFormat(file_name.to_string()))?;
        if data.is_empty() {
            return Err(UploadError::MissingFile);
        }
        Ok(Self {
            file_name: file_name.to_string(),
            format,
            data,
        })
    }
}

/// Reads the first file field of a multipart upload.
///
/// The extension check happens as soon as the field headers arrive, so a
/// rejected file is never buffered.
pub async fn read_image_upload(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<UploadedImage, UploadError> {
    while let Some(mut field) = payload.try_next().await? {
        let Some(file_name) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
        else {
            // Plain form values are drained and ignored.
            while field.next().await.is_some() {}
            continue;
        };

        // An empty file input still posts a file field, with `filename=""`.
        if file_name.is_empty() {
            return Err(UploadError::MissingFile);
        }
        if UploadFormat::from_file_name(&file_name).is_none() {
            return Err(UploadError::UnsupportedFormat(file_name));
        }

        let mut image_data = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if image_data.len() + data.len() > max_bytes {
                return Err(UploadError::TooLarge(max_bytes));
            }
            image_data.extend_from_slice(&data);
        }

        return UploadedImage::new(&file_name, image_data);
    }

    Err(UploadError::MissingFile)
}
