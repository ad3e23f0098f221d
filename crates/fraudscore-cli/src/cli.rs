use clap::{Arg, ArgAction, Command, ValueHint};
use std::path::PathBuf;

/// Parse a comma separated feature vector such as `0,-1.5,3e2`.
pub fn parse_features(s: &str) -> Result<Vec<f64>, String> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .enumerate()
        .map(|(i, v)| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("feature {} ({:?}): {}", i, v.trim(), e))
        })
        .collect()
}

fn config_arg() -> Arg {
    Arg::new("config")
        .help("Path to a JSON configuration file")
        .required(false)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn model_args() -> [Arg; 2] {
    [
        Arg::new("model_path")
            .short('m')
            .long("model")
            .help("Path to the model artifact. Overrides model.path from the configuration file.")
            .value_parser(clap::value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath),
        Arg::new("format")
            .short('f')
            .long("format")
            .help("Model artifact format. Overrides model.format from the configuration file.")
            .value_parser(["gbdt", "xgboost", "logistic"])
            .value_hint(ValueHint::Other),
    ]
}

fn debug_arg() -> Arg {
    Arg::new("debug")
        .long("debug")
        .help("Enable debug logging")
        .action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    Command::new("fraudscore")
        .version(clap::crate_version!())
        .about("\u{1F6E1} fraudscore - serve a pre-trained fraud classifier over HTTP")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("serve")
                .about("Load the model and serve POST /predict")
                .arg(config_arg())
                .arg(
                    Arg::new("host")
                        .long("host")
                        .help("Address to bind. Overrides host from the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Hostname),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .help("TCP port to listen on. Overrides port from the configuration file.")
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(
                    Arg::new("workers")
                        .short('w')
                        .long("workers")
                        .help("Number of HTTP worker threads. Defaults to the number of CPUs.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .args(model_args())
                .arg(debug_arg()),
        )
        .subcommand(
            Command::new("predict")
                .about("Score a single feature vector and print the prediction as JSON")
                .arg(config_arg())
                .arg(
                    Arg::new("features")
                        .long("features")
                        .help("Comma separated feature values, e.g. 0,0.5,-1.2")
                        .required(true)
                        .allow_hyphen_values(true)
                        .value_parser(parse_features),
                )
                .args(model_args())
                .arg(debug_arg()),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}
