use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::BatchError;

pub const HEADER: [&str; 4] = ["filename", "rank", "class_id", "probability"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    pub filename: String,
    pub rank: usize,
    pub class_id: usize,
    pub probability: String,
}

impl PredictionRow {
    pub fn new(filename: &str, rank: usize, class_id: usize, probability: f32) -> Self {
        Self {
            filename: filename.to_string(),
            rank,
            class_id,
            probability: format!("{:.4}", probability),
        }
    }
}

pub fn csv_file_name(started_at: DateTime<Local>) -> String {
    format!("batch_predictions_{}.csv", started_at.format("%Y%m%d_%H%M%S"))
}

/// CSV table for one batch run. Rows are flushed per image so a crash
/// mid-run keeps everything written so far.
pub struct PredictionWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl PredictionWriter {
    pub fn create(output_dir: &Path, started_at: DateTime<Local>) -> Result<Self, BatchError> {
        let path = output_dir.join(csv_file_name(started_at));
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(Self { writer, path })
    }

    /// Writes one row per rank, starting at rank 1.
    pub fn write_ranking(&mut self, filename: &str, ranking: &[(usize, f32)]) -> Result<(), BatchError> {
        for (rank, (class_id, probability)) in ranking.iter().enumerate() {
            self.writer
                .serialize(PredictionRow::new(filename, rank + 1, *class_id, *probability))?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
