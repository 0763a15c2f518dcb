use batch::{BatchConfig, BatchRunner, HttpPredictClient};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = BatchConfig::from_env()?;
    shared::logging::init_logging("batch_predict", &config.log_dir)?;
    log::info!("Sending images from {} to {}", config.incoming_dir.display(), config.api_url);

    let client = HttpPredictClient::new(&config.api_url, config.request_timeout)?;
    let summary = BatchRunner::new(config, client).run()?;

    // per-file failures are already logged and do not change the exit code
    if !summary.failed.is_empty() {
        log::warn!("{} image(s) left in the incoming directory", summary.failed.len());
    }
    Ok(())
}
