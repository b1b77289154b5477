//! Pipeline wiring
//!
//! Assembles an [`ExtractionPipeline`] from a [`PipelineConfig`]. Without an
//! API key the pipeline runs rule-based only; with one, the OpenAI extractor
//! is attached as the preferred strategy.

use std::sync::Arc;
use std::time::Duration;

use vetra_core::ExtractionPipeline;
use vetra_domain::{resolve_timezone_alias, PipelineConfig, Result};

use crate::extraction::OpenAiExtractor;
use crate::http::HttpClient;

/// Build a ready-to-use extraction pipeline from configuration.
///
/// # Errors
/// Returns `VetraError` when the underlying HTTP client cannot be
/// constructed.
pub fn build_pipeline(config: &PipelineConfig) -> Result<ExtractionPipeline> {
    if resolve_timezone_alias(&config.default_timezone).is_none() {
        tracing::warn!(
            zone = %config.default_timezone,
            "configured default timezone is not recognized, contexts built from it will use UTC"
        );
    }

    let timeout = Duration::from_secs(config.model_timeout_secs);
    let mut pipeline = ExtractionPipeline::new().with_model_timeout(timeout);

    if let Some(api_key) = &config.openai_api_key {
        // Retries stay off: the pipeline owns fallback, and a retry would
        // eat into its timeout budget.
        let http_client = HttpClient::builder().timeout(timeout).max_attempts(1).build()?;
        let extractor = OpenAiExtractor::new(api_key.clone(), http_client)
            .with_model(config.openai_model.clone());
        pipeline = pipeline.with_model(Arc::new(extractor));
        tracing::info!(model = %config.openai_model, "model-based extraction enabled");
    } else {
        tracing::info!("no extraction API key configured, running rule-based only");
    }

    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use vetra_domain::ReferenceContext;

    use super::*;

    #[tokio::test]
    async fn keyless_config_builds_a_working_rule_pipeline() {
        let config = PipelineConfig::default();
        let pipeline = build_pipeline(&config).expect("should build");

        let instant = Utc.with_ymd_and_hms(2025, 6, 11, 4, 0, 0).single().unwrap();
        let ctx = ReferenceContext::new(instant, chrono_tz::Tz::UTC);

        let events = pipeline.extract_events("звонок завтра в 11:00", &ctx).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "звонок");
    }

    #[tokio::test]
    async fn unknown_default_timezone_does_not_block_building() {
        let mut config = PipelineConfig::default();
        config.default_timezone = "Mars/Olympus_Mons".to_string();

        let pipeline = build_pipeline(&config).expect("should build");
        assert_eq!(config.default_zone(), chrono_tz::Tz::UTC);

        let instant = Utc.with_ymd_and_hms(2025, 6, 11, 4, 0, 0).single().unwrap();
        let ctx = ReferenceContext::new(instant, config.default_zone());
        let events = pipeline.extract_events("встреча завтра в 14:00", &ctx).await;
        assert_eq!(events.len(), 1);
    }
}
