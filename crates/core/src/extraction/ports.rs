//! Extraction service ports
//!
//! Trait and wire types for the external structured-extraction service.
//! Infrastructure adapters implement [`StructuredExtractor`]; the pipeline
//! only sees this interface.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request forwarded to the extraction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Raw message text, untouched.
    pub text: String,
    /// The user's current date, so the service resolves "tomorrow" the same
    /// way the local resolver would.
    pub reference_date: NaiveDate,
    /// Optional ISO 639-1 language hint.
    pub language_hint: Option<String>,
}

/// A time expression as returned by the extraction service. The service may
/// answer with a fully resolved ISO date-time or echo back the phrase it
/// could not resolve, in which case the local resolver takes over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeExpression {
    Iso(DateTime<FixedOffset>),
    Phrase(String),
}

/// One event as extracted by the service, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExtraction {
    /// When the event happens.
    pub when: TimeExpression,
    /// Short label for the event.
    pub label: String,
    /// Optional category hint ("meeting", "call", ...).
    pub category_hint: Option<String>,
}

/// Failures of the extraction service. Every variant triggers rule-based
/// fallback; none of them is surfaced to the end user.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("network error: {0}")]
    Network(String),

    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("service returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("service response did not match the expected schema: {0}")]
    InvalidSchema(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limited, retry after {0}s")]
    RateLimit(u64),
}

/// Port for the model-based extraction service.
#[async_trait]
pub trait StructuredExtractor: Send + Sync {
    /// Extract event candidates from free-form text.
    ///
    /// An empty `Vec` is a valid answer meaning "no events found"; it is
    /// distinct from an error.
    async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<Vec<RawExtraction>, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_time_expressions_deserialize_untagged() {
        let raw: RawExtraction = serde_json::from_str(
            r#"{"when":"2025-06-12T14:00:00+05:00","label":"встреча","category_hint":"meeting"}"#,
        )
        .unwrap();
        assert!(matches!(raw.when, TimeExpression::Iso(_)));
    }

    #[test]
    fn unresolved_phrases_deserialize_as_text() {
        let raw: RawExtraction =
            serde_json::from_str(r#"{"when":"завтра в 14:00","label":"встреча","category_hint":null}"#)
                .unwrap();
        assert_eq!(raw.when, TimeExpression::Phrase("завтра в 14:00".to_string()));
    }
}
