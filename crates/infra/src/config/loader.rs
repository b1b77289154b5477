//! Configuration loader
//!
//! Loads the pipeline configuration from environment variables or a TOML
//! file. Every setting has a default, so an empty environment still yields
//! a usable (rule-based only) configuration.
//!
//! ## Loading Strategy
//! 1. `.env` files are applied first via `dotenvy`
//! 2. If any `VETRA_*` variable is set, configuration comes from the
//!    environment
//! 3. Otherwise the loader probes for a TOML file
//! 4. With neither present, defaults apply
//!
//! ## Environment Variables
//! - `VETRA_OPENAI_API_KEY`: extraction service key (optional)
//! - `VETRA_OPENAI_MODEL`: model identifier
//! - `VETRA_MODEL_TIMEOUT_SECS`: model call timeout in seconds
//! - `VETRA_DEFAULT_TIMEZONE`: IANA zone used when the user has none
//!
//! ## File Locations
//! The loader probes `./vetra.toml` and `./config.toml`, then the same
//! names one directory up.

use std::path::{Path, PathBuf};

use vetra_domain::{PipelineConfig, Result, VetraError};

const ENV_VARS: [&str; 4] = [
    "VETRA_OPENAI_API_KEY",
    "VETRA_OPENAI_MODEL",
    "VETRA_MODEL_TIMEOUT_SECS",
    "VETRA_DEFAULT_TIMEZONE",
];

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `VetraError::Config` when an environment variable holds an
/// unparseable value or a discovered config file is invalid.
pub fn load() -> Result<PipelineConfig> {
    let _ = dotenvy::dotenv();

    if ENV_VARS.iter().any(|key| std::env::var_os(key).is_some()) {
        tracing::info!("configuration loaded from environment variables");
        return load_from_env();
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("no configuration found, using defaults");
            Ok(PipelineConfig::default())
        }
    }
}

/// Load configuration from environment variables, with defaults for any
/// variable that is not set.
///
/// # Errors
/// Returns `VetraError::Config` when `VETRA_MODEL_TIMEOUT_SECS` is not a
/// number.
pub fn load_from_env() -> Result<PipelineConfig> {
    let mut config = PipelineConfig::default();

    config.openai_api_key = std::env::var("VETRA_OPENAI_API_KEY").ok().filter(|k| !k.is_empty());

    if let Ok(model) = std::env::var("VETRA_OPENAI_MODEL") {
        config.openai_model = model;
    }

    if let Ok(timeout) = std::env::var("VETRA_MODEL_TIMEOUT_SECS") {
        config.model_timeout_secs = timeout
            .parse::<u64>()
            .map_err(|e| VetraError::Config(format!("Invalid model timeout: {}", e)))?;
    }

    if let Ok(timezone) = std::env::var("VETRA_DEFAULT_TIMEZONE") {
        config.default_timezone = timezone;
    }

    Ok(config)
}

/// Load configuration from a TOML file.
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `VetraError::Config` if the file is missing, none is found, or
/// its contents are not valid TOML.
pub fn load_from_file(path: Option<PathBuf>) -> Result<PipelineConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(VetraError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            VetraError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VetraError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<PipelineConfig> {
    toml::from_str(contents).map_err(|e| {
        VetraError::Config(format!("Invalid TOML in {}: {}", path.display(), e))
    })
}

/// Probe the standard locations for a configuration file.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let candidates = [
        cwd.join("vetra.toml"),
        cwd.join("config.toml"),
        cwd.join("../vetra.toml"),
        cwd.join("../config.toml"),
    ];

    candidates.into_iter().find(|path| path.exists())
}
