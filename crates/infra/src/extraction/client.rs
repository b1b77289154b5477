/// OpenAI API client implementing the structured-extraction port
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use vetra_core::{ExtractionError, ExtractionRequest, RawExtraction, StructuredExtractor, TimeExpression};
use vetra_domain::constants::DEFAULT_EXTRACTION_MODEL;
use vetra_domain::VetraError;

use crate::http::HttpClient;

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, EventExtractionResponse,
    ExtractedEventPayload, JsonSchema, ResponseFormat,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MAX_TOKENS: u32 = 2_000;
const DEFAULT_TEMPERATURE: f32 = 0.0;

/// OpenAI API client extracting calendar events from chat text.
pub struct OpenAiExtractor {
    http_client: HttpClient,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAiExtractor {
    /// Create a new extractor.
    ///
    /// The HTTP client should be configured with `max_attempts(1)`; the
    /// pipeline owns the fallback behavior, so transparent retries here
    /// would only eat into its timeout budget.
    pub fn new(api_key: String, http_client: HttpClient) -> Self {
        Self {
            http_client,
            api_key,
            model: DEFAULT_EXTRACTION_MODEL.to_string(),
            api_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Create a new client with a custom model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create a new client with a custom API URL (for testing).
    #[cfg(test)]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    fn build_system_prompt(request: &ExtractionRequest) -> String {
        let mut prompt = format!(
            "You extract calendar events from chat messages written in Russian or English.\n\
             Today's date for the user is {}.\n\
             Return every event the message mentions. For each event return:\n\
             - time: an ISO 8601 date-time with UTC offset when you can fully resolve it, \
             otherwise the exact time phrase from the message\n\
             - label: a short summary of the event, in the language of the message, \
             without the time expression\n\
             - category: one of meeting, call, work_block, social; omit it when unsure\n\
             Do not invent events; if the message mentions none, return an empty list.",
            request.reference_date
        );

        if let Some(hint) = &request.language_hint {
            prompt.push_str(&format!("\nThe message is most likely written in '{hint}'."));
        }

        prompt
    }

    fn extraction_schema() -> JsonSchema {
        JsonSchema {
            name: "event_extraction_response".to_string(),
            schema: json!({
                "type": "object",
                "properties": {
                    "events": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "time": { "type": "string" },
                                "label": { "type": "string" },
                                "category": {
                                    "type": "string",
                                    "enum": ["meeting", "call", "work_block", "social"]
                                }
                            },
                            "required": ["time", "label"],
                            "additionalProperties": false
                        }
                    }
                },
                "required": ["events"],
                "additionalProperties": false
            }),
            strict: Some(true),
        }
    }

    async fn call_api(
        &self,
        request: &ExtractionRequest,
    ) -> Result<Vec<ExtractedEventPayload>, ExtractionError> {
        let request_payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Self::build_system_prompt(request),
                },
                ChatMessage { role: "user".to_string(), content: request.text.clone() },
            ],
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: Some(Self::extraction_schema()),
            },
        };

        let request_builder = self
            .http_client
            .request(Method::POST, &self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_payload);

        let response = self.http_client.send(request_builder).await.map_err(|err| match err {
            VetraError::Network(msg) => ExtractionError::Network(msg),
            other => ExtractionError::Network(format!("HTTP error: {}", other)),
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "received extraction API response");

        if !status.is_success() {
            return Err(Self::error_for_status(status.as_u16(), response).await);
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::InvalidSchema(format!("failed to parse response: {}", e)))?;

        let choice = chat_response.choices.first().ok_or_else(|| {
            ExtractionError::InvalidSchema("response contained no choices".to_string())
        })?;
        let content = &choice.message.content;
        let extraction: EventExtractionResponse = serde_json::from_str(content).map_err(|e| {
            ExtractionError::InvalidSchema(format!(
                "failed to parse events: {}. Content: {}",
                e, content
            ))
        })?;

        info!(
            events = extraction.events.len(),
            tokens = chat_response.usage.total_tokens,
            "model extraction complete"
        );

        Ok(extraction.events)
    }

    async fn error_for_status(status: u16, response: reqwest::Response) -> ExtractionError {
        let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());

        match status {
            401 | 403 => ExtractionError::Authentication(format!("API key rejected ({})", status)),
            429 => {
                // Retry-after header parsing is not worth it here; the
                // pipeline falls back to rules either way.
                ExtractionError::RateLimit(60)
            }
            _ => ExtractionError::Api { status, message },
        }
    }
}

/// Convert a wire payload into the pipeline's candidate shape. Times that
/// parse as RFC 3339 become ISO expressions; everything else is handed to
/// the local resolver as a phrase.
fn into_raw_extraction(payload: ExtractedEventPayload) -> RawExtraction {
    let when = match DateTime::parse_from_rfc3339(payload.time.trim()) {
        Ok(dt) => TimeExpression::Iso(dt),
        Err(_) => TimeExpression::Phrase(payload.time),
    };
    RawExtraction { when, label: payload.label, category_hint: payload.category }
}

#[async_trait]
impl StructuredExtractor for OpenAiExtractor {
    async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<Vec<RawExtraction>, ExtractionError> {
        if request.text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let events = self.call_api(&request).await?;
        Ok(events.into_iter().map(into_raw_extraction).collect())
    }
}
