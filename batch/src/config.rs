use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Where the batch job reads, writes and archives, and how it talks to the
/// inference service.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub api_url: String,
    pub incoming_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub request_timeout: Duration,
    pub extensions: Vec<String>,
    pub ignore_extension_case: bool,
}

impl BatchConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let path = |key: &str, default: &str| PathBuf::from(get(key).unwrap_or_else(|| default.to_string()));

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 => Duration::from_secs_f64(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "REQUEST_TIMEOUT_SECS",
                        value,
                    });
                }
            },
            None => Duration::from_secs(10),
        };

        let ignore_extension_case = match get("IGNORE_EXTENSION_CASE") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                key: "IGNORE_EXTENSION_CASE",
                value,
            })?,
            None => false,
        };

        let extensions = get("IMAGE_EXTENSIONS")
            .unwrap_or_else(|| "jpg,jpeg,png".to_string())
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();

        Ok(Self {
            api_url: get("API_URL").unwrap_or_else(|| "http://localhost:5000/predict".to_string()),
            incoming_dir: path("INCOMING_DIR", "incoming_images"),
            processed_dir: path("PROCESSED_DIR", "processed"),
            output_dir: path("OUTPUT_DIR", "."),
            log_dir: path("LOG_DIR", "logs"),
            request_timeout,
            extensions,
            ignore_extension_case,
        })
    }

    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|allowed| {
            if self.ignore_extension_case {
                allowed.eq_ignore_ascii_case(ext)
            } else {
                allowed == ext
            }
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
