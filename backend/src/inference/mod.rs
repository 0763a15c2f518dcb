pub mod model;
pub mod preprocess;

use shared::CLASS_COUNT;

use crate::error::PredictError;
use model::{Classifier, InferenceError};

/// Runs one uploaded image through preprocessing and the model.
pub fn predict(classifier: &dyn Classifier, image: &[u8]) -> Result<Vec<f32>, PredictError> {
    let input = preprocess::preprocess(image)?;
    let scores = classifier.classify(input)?;
    if scores.len() != CLASS_COUNT {
        return Err(InferenceError::OutputShape {
            expected: CLASS_COUNT,
            actual: scores.len(),
        }
        .into());
    }
    Ok(scores)
}
