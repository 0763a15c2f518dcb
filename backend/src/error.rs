use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorResponse;

use crate::inference::model::InferenceError;

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("no file")]
    MissingFile,
    #[error("cannot identify image file: {0}")]
    Decode(#[from] image::ImageError),
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        match self {
            PredictError::MissingFile => StatusCode::BAD_REQUEST,
            // undecodable uploads are reported as 500, same as model failures
            PredictError::Decode(_) | PredictError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
