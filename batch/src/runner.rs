use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{error, info};
use shared::FashionClass;

use crate::client::PredictClient;
use crate::config::BatchConfig;
use crate::error::BatchError;
use crate::output::PredictionWriter;
use crate::ranking::{top_k, TOP_K};

/// Outcome of one pass over the incoming directory.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    /// Files classified, recorded and archived.
    pub processed: Vec<String>,
    /// Files that failed at some step, with the reason.
    pub failed: Vec<(String, String)>,
    /// CSV written by this run; `None` when there was nothing to do.
    pub output: Option<PathBuf>,
}

pub struct BatchRunner<C> {
    config: BatchConfig,
    client: C,
}

impl<C: PredictClient> BatchRunner<C> {
    pub fn new(config: BatchConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Image files waiting in the incoming directory, sorted by path.
    pub fn list_pending(&self) -> io::Result<Vec<PathBuf>> {
        let mut pending = Vec::new();
        for entry in fs::read_dir(&self.config.incoming_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let accepted = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.config.accepts_extension(ext));
            if accepted {
                pending.push(path);
            }
        }
        pending.sort();
        Ok(pending)
    }

    /// Processes every pending file once. Per-file failures are logged and
    /// leave the file where it was; only setup failures abort the run.
    pub fn run(&self) -> Result<RunSummary, BatchError> {
        fs::create_dir_all(&self.config.incoming_dir)?;
        fs::create_dir_all(&self.config.processed_dir)?;

        let pending = self.list_pending()?;
        if pending.is_empty() {
            info!("No new images found -- exiting.");
            return Ok(RunSummary::default());
        }
        info!("Found {} image(s) in {}", pending.len(), self.config.incoming_dir.display());

        let mut writer = PredictionWriter::create(&self.config.output_dir, Local::now())?;
        let mut summary = RunSummary {
            output: Some(writer.path().to_path_buf()),
            ..RunSummary::default()
        };

        for path in &pending {
            let name = display_name(path);
            match self.process_file(path, &name, &mut writer) {
                Ok(()) => summary.processed.push(name),
                Err(e) => {
                    error!("Error processing {}: {}", name, e);
                    summary.failed.push((name, e.to_string()));
                }
            }
        }

        info!(
            "Batch finished -- {} ok, {} failed, results in {}",
            summary.processed.len(),
            summary.failed.len(),
            writer.path().display()
        );
        Ok(summary)
    }

    fn process_file(
        &self,
        path: &Path,
        name: &str,
        writer: &mut PredictionWriter,
    ) -> Result<(), BatchError> {
        let scores = self.client.classify(path)?;
        let ranking = top_k(&scores, TOP_K);
        writer.write_ranking(name, &ranking)?;

        let summary: Vec<String> = ranking
            .iter()
            .map(|(class_id, _)| match FashionClass::from_id(*class_id) {
                Some(class) => format!("{} ({})", class_id, class),
                None => class_id.to_string(),
            })
            .collect();
        info!("{} -> {} (top-{})", name, summary.join(", "), TOP_K);

        // move under the raw file name; `name` is lossy for non-UTF-8 names
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("{} has no file name", name))
        })?;
        archive(path, &self.config.processed_dir.join(file_name))?;
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Moves a file, copying when a plain rename cannot cross filesystems.
fn archive(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_moves_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("shoe.png");
        let target_dir = dir.path().join("done");
        fs::create_dir(&target_dir).unwrap();
        fs::write(&from, b"png").unwrap();

        archive(&from, &target_dir.join("shoe.png")).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(target_dir.join("shoe.png")).unwrap(), b"png");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_keep_their_bytes_when_archived() {
        use crate::error::BatchError;
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        struct AlwaysShirt;

        impl PredictClient for AlwaysShirt {
            fn classify(&self, _path: &Path) -> Result<Vec<f32>, BatchError> {
                let mut scores = vec![0.0; 10];
                scores[6] = 1.0;
                Ok(scores)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let incoming = dir.path().join("incoming");
        let processed = dir.path().join("processed");
        fs::create_dir(&incoming).unwrap();
        let raw_name = OsStr::from_bytes(b"caf\xe9.png");
        fs::write(incoming.join(raw_name), b"image bytes").unwrap();

        let config = BatchConfig::from_lookup(|key| match key {
            "INCOMING_DIR" => Some(incoming.display().to_string()),
            "PROCESSED_DIR" => Some(processed.display().to_string()),
            "OUTPUT_DIR" => Some(dir.path().display().to_string()),
            _ => None,
        })
        .unwrap();
        let summary = BatchRunner::new(config, AlwaysShirt).run().unwrap();

        assert_eq!(summary.processed, vec!["caf\u{FFFD}.png"]);
        assert!(processed.join(raw_name).is_file());
        assert_eq!(fs::read_dir(&incoming).unwrap().count(), 0);
    }

    #[test]
    fn archive_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(archive(&dir.path().join("gone.png"), &dir.path().join("x.png")).is_err());
    }
}
