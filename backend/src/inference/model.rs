use std::path::Path;
use std::sync::Arc;

use ndarray::Array4;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model backend error: {0}")]
    Backend(String),
    #[error("model returned {actual} scores, expected {expected}")]
    OutputShape { expected: usize, actual: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to load model from {path}: {reason}")]
    Load { path: String, reason: String },
    #[error("no model backend compiled in; rebuild with `--features torch` to load {path}")]
    BackendUnavailable { path: String },
}

/// An already-loaded model: one preprocessed batch in, the scores of its
/// first (only) item out.
pub trait Classifier: Send + Sync {
    fn classify(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

#[cfg(feature = "torch")]
pub use torch::TorchModel;

#[cfg(feature = "torch")]
mod torch {
    use std::path::Path;
    use std::sync::Mutex;

    use ndarray::Array4;
    use tch::{CModule, Device, Kind, Tensor};

    use super::{Classifier, InferenceError, ModelError};

    /// TorchScript export of the classifier. `CModule` is not `Sync`, so
    /// every forward pass goes through the lock.
    pub struct TorchModel {
        module: Mutex<CModule>,
        device: Device,
    }

    impl TorchModel {
        pub fn load(model_path: &Path) -> Result<Self, ModelError> {
            let device = Device::cuda_if_available();
            let mut module =
                CModule::load_on_device(model_path, device).map_err(|e| ModelError::Load {
                    path: model_path.display().to_string(),
                    reason: e.to_string(),
                })?;
            module.set_eval();
            log::info!("TorchScript module ready on {:?}", device);
            Ok(Self {
                module: Mutex::new(module),
                device,
            })
        }
    }

    impl Classifier for TorchModel {
        fn classify(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
            let shape: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
            let data: Vec<f32> = input.iter().copied().collect();
            let tensor = Tensor::from_slice(&data).reshape(shape.as_slice()).to_device(self.device);

            let module = self
                .module
                .lock()
                .map_err(|_| InferenceError::Backend("model lock poisoned".to_string()))?;
            let output = tch::no_grad(|| module.forward_ts(&[tensor]))
                .map_err(|e| InferenceError::Backend(e.to_string()))?;
            drop(module);

            let first = output.to_kind(Kind::Float).get(0).view([-1]);
            let num_elements = first.size()[0] as usize;
            let mut scores = vec![0.0f32; num_elements];
            first.copy_data(&mut scores, num_elements);
            Ok(scores)
        }
    }
}

/// Loads the model artifact once at startup.
pub fn load_classifier(model_path: &Path) -> Result<Arc<dyn Classifier>, ModelError> {
    log::info!("Loading model from {}", model_path.display());
    let model = load_backend(model_path)?;
    log::info!("Model loaded successfully");
    Ok(model)
}

#[cfg(feature = "torch")]
fn load_backend(model_path: &Path) -> Result<Arc<dyn Classifier>, ModelError> {
    Ok(Arc::new(TorchModel::load(model_path)?))
}

#[cfg(not(feature = "torch"))]
fn load_backend(model_path: &Path) -> Result<Arc<dyn Classifier>, ModelError> {
    Err(ModelError::BackendUnavailable {
        path: model_path.display().to_string(),
    })
}
