mod config;
mod error;
mod history;
mod inference;
mod pipeline;
mod report;
mod routes;
mod upload;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use config::AppConfig;
use history::PredictionHistory;
use inference::classifier::Classifier;
use inference::model::OnnxModel;
use pipeline::Pipeline;
use routes::configure_routes;
use std::env;
use std::sync::{Arc, Mutex};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::load().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    log::info!(
        "Config: model={} frontend={} max_upload_bytes={} workers={}",
        config.model_path,
        config.frontend_dir,
        config.max_upload_bytes,
        config.workers
    );

    let model = match OnnxModel::load(&config.model_path) {
        Ok(model) => model,
        Err(e) => {
            log::error!("Failed to load model at startup: {}", e);
            return Err(std::io::Error::other(format!("Model loading failed: {}", e)));
        }
    };
    log::info!("Loaded classifier from {}", config.model_path);

    let pipeline = Pipeline::new(Classifier::new(Arc::new(model)));
    let history = web::Data::new(Mutex::new(PredictionHistory::new()));

    let bind_address = config.bind_address();
    let workers = config.workers;
    let frontend_dir = config.frontend_dir.clone();
    let config = web::Data::new(config);

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .expose_headers(vec![actix_web::http::header::CONTENT_DISPOSITION])
                    .max_age(3600),
            )
            .app_data(web::Data::new(pipeline.clone()))
            .app_data(history.clone())
            .app_data(config.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .workers(workers)
    .bind(&bind_address)?
    .run()
    .await
}
