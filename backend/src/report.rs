use chrono::NaiveDateTime;
use printpdf::image_crate::{self, DynamicImage};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument, Pt};
use shared::{report_filename, PredictionResult, REPORT_MIME_TYPE};

use crate::error::PipelineError;

// A4 in points; all positions below are measured from the bottom-left corner.
const PAGE_WIDTH_PT: f32 = 595.28;
const PAGE_HEIGHT_PT: f32 = 841.89;

const TITLE: &str = "AI Image Classification Report";
const TITLE_FONT_SIZE: f32 = 20.0;
const BODY_FONT_SIZE: f32 = 12.0;
const TITLE_POS: (f32, f32) = (200.0, PAGE_HEIGHT_PT - 80.0);
const DATE_POS: (f32, f32) = (50.0, PAGE_HEIGHT_PT - 110.0);
const CLASS_POS: (f32, f32) = (50.0, PAGE_HEIGHT_PT - 140.0);
const CONFIDENCE_POS: (f32, f32) = (50.0, PAGE_HEIGHT_PT - 160.0);
const IMAGE_POS: (f32, f32) = (150.0, PAGE_HEIGHT_PT - 400.0);
const IMAGE_WIDTH_PT: f32 = 200.0;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct Report {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// The text lines of the report, top to bottom, title excluded.
pub fn body_lines(result: &PredictionResult, generated_at: &NaiveDateTime) -> [String; 3] {
    [
        format!("Date: {}", generated_at.format(TIMESTAMP_FORMAT)),
        format!("Predicted Class: {}", result.label),
        format!("Confidence: {:.2}%", result.confidence),
    ]
}

pub fn generate_report(
    result: &PredictionResult,
    generated_at: &NaiveDateTime,
    original_image: &[u8],
) -> Result<Report, PipelineError> {
    let picture = image_crate::load_from_memory(original_image)
        .map_err(|e| PipelineError::Report(format!("Failed to read uploaded image: {}", e)))?;
    // Flatten alpha so the page embeds a plain RGB XObject.
    let picture = DynamicImage::ImageRgb8(picture.to_rgb8());

    let (doc, page, layer) =
        PdfDocument::new(TITLE, at(PAGE_WIDTH_PT), at(PAGE_HEIGHT_PT), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PipelineError::Report(format!("{:?}", e)))?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PipelineError::Report(format!("{:?}", e)))?;

    layer.use_text(TITLE, TITLE_FONT_SIZE, at(TITLE_POS.0), at(TITLE_POS.1), &bold);

    let [date, class, confidence] = body_lines(result, generated_at);
    for (text, (x, y)) in [(date, DATE_POS), (class, CLASS_POS), (confidence, CONFIDENCE_POS)] {
        layer.use_text(text, BODY_FONT_SIZE, at(x), at(y), &regular);
    }

    // At 72 dpi one pixel is one point, so the scale maps the width to IMAGE_WIDTH_PT.
    let scale = IMAGE_WIDTH_PT / picture.width().max(1) as f32;
    Image::from_dynamic_image(&picture).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(at(IMAGE_POS.0)),
            translate_y: Some(at(IMAGE_POS.1)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(72.0),
            ..Default::default()
        },
    );

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| PipelineError::Report(format!("{:?}", e)))?;

    Ok(Report {
        filename: report_filename(&result.label),
        mime_type: REPORT_MIME_TYPE,
        bytes,
    })
}

fn at(points: f32) -> Mm {
    Mm::from(Pt(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::preprocess::tests::solid_red_png;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 3)
            .unwrap()
    }

    fn prediction(label: &str, confidence: f32) -> PredictionResult {
        PredictionResult {
            label: label.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_body_lines() {
        let lines = body_lines(&prediction("frog", 87.456), &timestamp());
        assert_eq!(lines[0], "Date: 2025-03-07 09:05:03");
        assert_eq!(lines[1], "Predicted Class: frog");
        assert_eq!(lines[2], "Confidence: 87.46%");
    }

    #[test]
    fn test_confidence_always_two_decimals() {
        let lines = body_lines(&prediction("ship", 100.0), &timestamp());
        assert_eq!(lines[2], "Confidence: 100.00%");
        let lines = body_lines(&prediction("ship", 9.999), &timestamp());
        assert_eq!(lines[2], "Confidence: 10.00%");
    }

    #[test]
    fn test_generates_single_page_pdf() {
        let report =
            generate_report(&prediction("truck", 42.0), &timestamp(), &solid_red_png(64, 64))
                .unwrap();

        assert_eq!(report.filename, "truck_report.pdf");
        assert_eq!(report.mime_type, "application/pdf");
        assert!(report.bytes.starts_with(b"%PDF"));
        assert!(report.bytes.len() > 1000);
    }

    #[test]
    fn test_wide_and_tall_images_embed() {
        use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
        use std::io::Cursor;

        for (w, h) in [(400, 20), (15, 600)] {
            let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(w, h, Rgb([0u8, 90, 200])));
            let mut bytes = Vec::new();
            img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg).unwrap();
            let report = generate_report(&prediction("bird", 51.2), &timestamp(), &bytes).unwrap();
            assert!(!report.bytes.is_empty());
        }
    }

    #[test]
    fn test_unreadable_image_is_a_report_error() {
        let err = generate_report(&prediction("dog", 50.0), &timestamp(), b"garbage").unwrap_err();
        assert!(matches!(err, PipelineError::Report(_)));
    }
}
