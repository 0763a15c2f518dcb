//! Nightly batch job for the fashion classifier.
//!
//! Scans the incoming directory for images, sends each one to the
//! inference service, writes the top-3 classes per image to a timestamped
//! CSV and moves the image to the processed directory.

pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod ranking;
pub mod runner;

pub use client::{HttpPredictClient, PredictClient};
pub use config::BatchConfig;
pub use error::BatchError;
pub use runner::{BatchRunner, RunSummary};
