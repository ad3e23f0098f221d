use actix_web::http::Uri;
use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use fraudscore_classifiers::{ModelConfig, ModelFormat};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API. Empty (or `"*"`) allows any origin.
    pub allowed_origins: Vec<String>,
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig {
            allowed_origins: Vec::new(),
            max_age: 3600,
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub debug: bool,
    pub json_limit: usize,
    pub model: ModelConfig,
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: String::from("127.0.0.1"),
            port: 5000,
            workers: None,
            debug: false,
            json_limit: 64 * 1024,
            model: ModelConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read a JSON config file. Keys that are missing or fail to parse keep
    /// their default value. The `model` and `cors` sections fall back key by
    /// key, so one bad entry does not discard its siblings.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let partial: serde_json::Value = serde_json::from_str(&config_json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        let mut config = ServerConfig::default();

        macro_rules! load_or_default {
            (@set $source:expr, $target:expr, $field:ident, $key:expr) => {
                if let Some(val) = $source.get(stringify!($field)) {
                    if let Ok(parsed) = serde_json::from_value(val.clone()) {
                        $target.$field = parsed;
                    } else {
                        log::warn!(
                            "Config Invalid value for '{}', using default: {:?}",
                            $key,
                            $target.$field
                        );
                    }
                } else {
                    log::debug!(
                        "Config '{}' not set, using default: {:?}",
                        $key,
                        $target.$field
                    );
                }
            };
            ($field:ident) => {
                load_or_default!(@set partial, config, $field, stringify!($field))
            };
            ($section:ident . $field:ident) => {
                if let Some(section) = partial.get(stringify!($section)) {
                    load_or_default!(
                        @set section,
                        config.$section,
                        $field,
                        concat!(stringify!($section), ".", stringify!($field))
                    )
                }
            };
        }

        load_or_default!(host);
        load_or_default!(port);
        load_or_default!(workers);
        load_or_default!(debug);
        load_or_default!(json_limit);

        load_or_default!(model.path);
        load_or_default!(model.format);
        load_or_default!(model.objective);
        load_or_default!(model.n_features);
        load_or_default!(model.threshold);

        load_or_default!(cors.allowed_origins);
        load_or_default!(cors.max_age);

        Ok(config)
    }

    /// Build the effective config for a `serve` or `predict` invocation:
    /// file (or defaults), then command-line overrides, then validation.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };
        config.apply_overrides(matches)?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides only apply for arguments the subcommand defines and the
    /// user actually passed.
    pub fn apply_overrides(&mut self, matches: &ArgMatches) -> Result<()> {
        if let Some(host) = matches.try_get_one::<String>("host").ok().flatten() {
            self.host = host.clone();
        }
        if let Some(port) = matches.try_get_one::<u16>("port").ok().flatten() {
            self.port = *port;
        }
        if let Some(workers) = matches.try_get_one::<usize>("workers").ok().flatten() {
            self.workers = Some(*workers);
        }
        if let Some(path) = matches.try_get_one::<PathBuf>("model_path").ok().flatten() {
            self.model.path = path.clone();
        }
        if let Some(format) = matches.try_get_one::<String>("format").ok().flatten() {
            self.model.format = ModelFormat::from_str(format).map_err(anyhow::Error::msg)?;
        }
        if matches
            .try_get_one::<bool>("debug")
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
        {
            self.debug = true;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("host must not be empty");
        }
        if self.workers == Some(0) {
            anyhow::bail!("workers must be at least 1");
        }
        if self.json_limit == 0 {
            anyhow::bail!("json_limit must be greater than zero");
        }
        for origin in self.cors.allowed_origins.iter().filter(|o| o.as_str() != "*") {
            let uri = origin
                .parse::<Uri>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))?;
            if uri.scheme().is_none() || uri.host().is_none() {
                anyhow::bail!(
                    "Invalid CORS origin: {} (expected scheme://host[:port])",
                    origin
                );
            }
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read only the `debug` key of a config file, so logging can be set up
/// before the full config is loaded. Any failure reads as `false`.
pub fn peek_debug(config_path: Option<&PathBuf>) -> bool {
    config_path
        .and_then(|path| fs::read_to_string(path).ok())
        .and_then(|json| serde_json::from_str::<serde_json::Value>(&json).ok())
        .and_then(|value| value.get("debug").and_then(|d| d.as_bool()))
        .unwrap_or(false)
}
