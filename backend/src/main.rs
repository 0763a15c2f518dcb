mod config;
mod error;
mod inference;
mod routes;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use config::ServiceConfig;
use inference::model::load_classifier;
use routes::{configure_routes, AppState};
use std::env;

fn startup_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = ServiceConfig::from_env().map_err(startup_error)?;
    shared::logging::init_logging("api", &config.log_dir).map_err(startup_error)?;

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    }

    // The server must not bind until the model is usable.
    let classifier = match load_classifier(&config.model_path) {
        Ok(classifier) => classifier,
        Err(e) => {
            log::error!("Failed to load model at startup: {}", e);
            return Err(startup_error(format!("Model loading failed: {}", e)));
        }
    };
    let state = AppState::new(classifier);

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%a \"%r\" %s %b %Dms"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
