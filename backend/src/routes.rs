use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use log::{error, info, warn};
use shared::{HealthResponse, PredictResponse};

use crate::error::PredictError;
use crate::inference::{self, model::Classifier, model::InferenceError};

const FILE_FIELD: &str = "file";

/// Request-independent context handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/predict").route(web::post().to(handle_predict)))
        .service(web::resource("/health").route(web::get().to(health)));
}

async fn handle_predict(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, PredictError> {
    let image = match read_file_field(&mut payload).await {
        Some(image) => image,
        None => {
            warn!("POST /predict without file part");
            return Err(PredictError::MissingFile);
        }
    };

    let classifier = state.classifier.clone();
    let outcome = web::block(move || inference::predict(classifier.as_ref(), &image))
        .await
        .unwrap_or_else(|e| {
            Err(PredictError::Inference(InferenceError::Backend(format!(
                "inference worker unavailable: {}",
                e
            ))))
        });

    match outcome {
        Ok(probabilities) => {
            info!("Prediction ok");
            Ok(HttpResponse::Ok().json(PredictResponse { probabilities }))
        }
        Err(e) => {
            error!("Prediction failed: {}", e);
            Err(e)
        }
    }
}

/// Collects the bytes of the first `file` part that carries a filename.
/// Other parts, including a plain `file` form value, are drained and
/// ignored; a body that is not valid multipart counts as having no file.
async fn read_file_field(payload: &mut Multipart) -> Option<Vec<u8>> {
    let mut file = None;
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Unreadable multipart body: {}", e);
                break;
            }
        };

        let is_upload = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .is_some();
        let wanted = file.is_none() && is_upload && field.name() == Some(FILE_FIELD);
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(bytes) if wanted => data.extend_from_slice(&bytes),
                Ok(_) => {}
                Err(e) => {
                    warn!("Upload interrupted: {}", e);
                    return file;
                }
            }
        }
        if wanted {
            file = Some(data);
        }
    }
    file
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::up())
}
