use anyhow::{Context, Result};
use clap::ArgMatches;
use log::LevelFilter;
use std::path::PathBuf;

use fraudscore_classifiers::load_model;
use fraudscore_cli::cli::build_cli;
use fraudscore_cli::config::{peek_debug, ServerConfig};
use fraudscore_cli::server;
use fraudscore_cli::server::types::PredictResponse;

fn init_logging(debug: bool) {
    let default_filter = if debug {
        "error,fraudscore=debug,actix_web=debug"
    } else {
        "error,fraudscore=info,actix_web=info"
    };
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("FRAUDSCORE_LOG", default_filter))
        .format_timestamp_millis()
        .init();
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let (name, sub_m) = matches
        .subcommand()
        .expect("Subcommand is required by CLI configuration");
    let config_path: Option<&PathBuf> = sub_m.get_one("config");
    init_logging(sub_m.get_flag("debug") || peek_debug(config_path));

    match name {
        "serve" => handle_serve(config_path, sub_m),
        "predict" => handle_predict(config_path, sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn load_config(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<ServerConfig> {
    match config_path {
        Some(path) => log::info!("[fraudscore] Using config: {:?}", path),
        None => {
            let defaults = serde_json::to_string_pretty(&ServerConfig::default()).unwrap_or_default();
            eprintln!("[fraudscore] No config file provided; using defaults:\n{}", defaults);
        }
    }
    ServerConfig::from_arguments(config_path, matches)
}

fn handle_serve(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<()> {
    let config = load_config(config_path, matches)?;

    let predictor = match load_model(&config.model) {
        Ok(predictor) => predictor,
        Err(e) => {
            log::error!("Cannot serve without a model: {}", e);
            std::process::exit(1)
        }
    };

    actix_web::rt::System::new()
        .block_on(server::run(config, predictor))
        .context("HTTP server failed")
}

fn handle_predict(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<()> {
    let config = load_config(config_path, matches)?;
    let features: &Vec<f64> = matches
        .get_one("features")
        .expect("features is a required argument");

    let predictor = load_model(&config.model)
        .with_context(|| format!("Failed to load model: {}", config.model.path.display()))?;
    let prediction = predictor
        .predict_one(features)
        .context("Prediction failed")?;

    println!("{}", serde_json::to_string(&PredictResponse { prediction })?);
    Ok(())
}
