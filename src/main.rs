// src/main.rs
use std::process::ExitCode;

use box_advisor::api;
use box_advisor::config::{AppConfig, LogFormat, LoggingConfig};
use box_advisor::engine::Recommender;
use box_advisor::inventory::{Guidelines, Store};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    match config.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_result = dotenvy::dotenv();

    // Logging first; everything below reports through it.
    init_logging(&LoggingConfig::from_env());
    if let Err(err) = dotenv_result {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            warn!(error = %err, "could not load .env");
        }
    }

    let app_config = AppConfig::from_env();
    info!("box advisor starting");

    let guidelines = match Guidelines::from_yaml_file(app_config.store.guidelines_file()) {
        Ok(guidelines) => guidelines,
        Err(err) => {
            error!(error = %err, "could not load packing guidelines");
            return ExitCode::FAILURE;
        }
    };
    let store = match Store::from_yaml_file(app_config.store.store_file()) {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "could not load store inventory");
            return ExitCode::FAILURE;
        }
    };

    let engine_config = match app_config.engine.apply(guidelines.engine) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid engine overrides");
            return ExitCode::FAILURE;
        }
    };
    if !app_config.engine.is_empty() {
        info!(overrides = ?app_config.engine, "engine overrides applied");
    }

    let rules = store.packing_rules(guidelines.rules);
    let recommender = Recommender::new(engine_config, rules.clearance_table());

    match api::start_api_server(app_config.api, recommender, store.boxes, rules).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "API server terminated with an error");
            ExitCode::FAILURE
        }
    }
}
