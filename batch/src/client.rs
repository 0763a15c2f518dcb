use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use shared::PredictResponse;

use crate::error::BatchError;

/// Anything that can turn an image file into a probability vector.
pub trait PredictClient {
    fn classify(&self, path: &Path) -> Result<Vec<f32>, BatchError>;
}

impl<T: PredictClient + ?Sized> PredictClient for &T {
    fn classify(&self, path: &Path) -> Result<Vec<f32>, BatchError> {
        (**self).classify(path)
    }
}

/// Calls `POST /predict` on the inference service, one blocking request per
/// file.
pub struct HttpPredictClient {
    client: Client,
    url: String,
}

impl HttpPredictClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, BatchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl PredictClient for HttpPredictClient {
    fn classify(&self, path: &Path) -> Result<Vec<f32>, BatchError> {
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let form = multipart::Form::new().part("file", multipart::Part::bytes(bytes).file_name(file_name));
        let body = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()?
            .error_for_status()?
            .text()?;

        parse_probabilities(&body)
    }
}

fn parse_probabilities(body: &str) -> Result<Vec<f32>, BatchError> {
    serde_json::from_str::<PredictResponse>(body)
        .map(|response| response.probabilities)
        .map_err(|e| BatchError::MalformedResponse(e.to_string()))
}
