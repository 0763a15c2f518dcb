use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use env_logger::{Env, Target};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("logger already initialised: {0}")]
    AlreadyInitialised(#[from] log::SetLoggerError),
}

/// Duplicates every log line to stderr and an append-only file.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // stderr is best effort, the file is the durable sink
        let _ = io::stderr().write_all(buf);
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stderr().flush();
        self.file.flush()
    }
}

pub fn log_file_path(log_dir: &Path, name: &str) -> PathBuf {
    log_dir.join(format!("{}.log", name))
}

/// Installs the global logger for a component.
///
/// Lines look like `2024-05-01 12:00:00,123 [INFO] backend::routes: Prediction ok`
/// and go to stderr and `<log_dir>/<name>.log`. `RUST_LOG` overrides the
/// default `info` filter.
pub fn init_logging(name: &str, log_dir: &Path) -> Result<PathBuf, LoggingError> {
    let path = log_file_path(log_dir, name);
    let file = fs::create_dir_all(log_dir)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&path))
        .map_err(|source| LoggingError::LogFile {
            path: path.clone(),
            source,
        })?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .try_init()?;

    Ok(path)
}
