//! Configuration structures
//!
//! Loaded by `vetra-infra::config` from environment variables or a TOML
//! file; consumed when wiring the pipeline together.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EXTRACTION_MODEL, DEFAULT_TIMEZONE, MODEL_EXTRACTION_TIMEOUT_SECS};
use crate::utils::timezone::resolve_timezone_alias;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// API key for the structured-extraction service. When absent the
    /// pipeline runs rule-based only.
    pub openai_api_key: Option<String>,
    /// Model identifier for the extraction service.
    #[serde(default = "default_model")]
    pub openai_model: String,
    /// Upper bound on one model-extraction attempt, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub model_timeout_secs: u64,
    /// Zone used when a user's timezone cannot be determined.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

impl PipelineConfig {
    /// Resolve the configured default timezone, accepting aliases and bare
    /// city names. An unknown value falls back to UTC so a bad setting never
    /// blocks extraction.
    pub fn default_zone(&self) -> Tz {
        resolve_timezone_alias(&self.default_timezone).unwrap_or(Tz::UTC)
    }
}

fn default_model() -> String {
    DEFAULT_EXTRACTION_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    MODEL_EXTRACTION_TIMEOUT_SECS
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: default_model(),
            model_timeout_secs: default_timeout_secs(),
            default_timezone: default_timezone(),
        }
    }
}
