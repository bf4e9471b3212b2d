use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, Error, HttpResponse};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Local;
use log::{error, info, warn};
use serde_json::json;
use shared::{InferenceResponse, ReportPayload, CIFAR10_CLASSES};
use std::sync::Mutex;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::history::{HistoryEntry, PredictionHistory};
use crate::pipeline::{Pipeline, PipelineOutput};
use crate::upload::{read_image_upload, UploadedImage};

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/inference").route(web::post().to(handle_inference)))
        .service(web::resource("/api/report").route(web::post().to(handle_report)))
        .service(web::resource("/api/health").route(web::get().to(health)));
}

async fn handle_inference(
    pipeline: web::Data<Pipeline>,
    history: web::Data<Mutex<PredictionHistory>>,
    config: web::Data<AppConfig>,
    payload: Multipart,
) -> Result<HttpResponse, Error> {
    let request_id = Uuid::new_v4();
    let (image, output) = run_pipeline(request_id, &pipeline, &history, &config, payload).await?;
    let result = &output.classification.result;

    let response = InferenceResponse {
        id: request_id.to_string(),
        predictions: output.classification.probabilities.clone(),
        class_labels: CIFAR10_CLASSES.iter().map(|c| c.to_string()).collect(),
        label: result.label.clone(),
        confidence: result.confidence,
        report: ReportPayload {
            filename: output.report.filename.clone(),
            mime_type: output.report.mime_type.to_string(),
            data_base64: STANDARD.encode(&output.report.bytes),
        },
    };

    info!(
        "[{}] {} -> {} ({:.2}%)",
        request_id, image.file_name, result.label, result.confidence
    );
    Ok(HttpResponse::Ok().json(response))
}

async fn handle_report(
    pipeline: web::Data<Pipeline>,
    history: web::Data<Mutex<PredictionHistory>>,
    config: web::Data<AppConfig>,
    payload: Multipart,
) -> Result<HttpResponse, Error> {
    let request_id = Uuid::new_v4();
    let (image, output) = run_pipeline(request_id, &pipeline, &history, &config, payload).await?;

    info!(
        "[{}] report {} for {} ({} bytes)",
        request_id,
        output.report.filename,
        image.file_name,
        output.report.bytes.len()
    );

    Ok(HttpResponse::Ok()
        .content_type(output.report.mime_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(output.report.filename.clone())],
        })
        .body(output.report.bytes))
}

async fn health(pipeline: web::Data<Pipeline>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "model": pipeline.classifier().model_name(),
    }))
}

async fn run_pipeline(
    request_id: Uuid,
    pipeline: &Pipeline,
    history: &Mutex<PredictionHistory>,
    config: &AppConfig,
    payload: Multipart,
) -> Result<(UploadedImage, PipelineOutput), Error> {
    let image = read_image_upload(payload, config.max_upload_bytes)
        .await
        .map_err(|e| {
            warn!("[{}] upload rejected: {}", request_id, e);
            e
        })?;
    info!(
        "[{}] received {} ({}, {} bytes)",
        request_id,
        image.file_name,
        image.format.mime_type(),
        image.data.len()
    );

    let output = pipeline
        .run(&image, &Local::now().naive_local())
        .map_err(|e| {
            error!("[{}] {}", request_id, e);
            e
        })?;

    match history.lock() {
        Ok(mut history) => {
            history.record(HistoryEntry::new(&output.classification.result, &image.data));
            log::debug!("[{}] history holds {} predictions", request_id, history.len());
        }
        Err(e) => error!("[{}] prediction history unavailable: {}", request_id, e),
    }

    Ok((image, output))
}
