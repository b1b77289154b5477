/// Wire types for the OpenAI Chat Completions API
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One event as extracted by the model, before local validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ExtractedEventPayload {
    /// ISO 8601 date-time with offset, or the unresolved source phrase.
    pub time: String,
    /// Short label for the event.
    pub label: String,
    /// Optional category hint ("meeting", "call", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Top-level structure the model is asked to produce.
#[derive(Debug, Deserialize)]
pub(crate) struct EventExtractionResponse {
    pub events: Vec<ExtractedEventPayload>,
}

/// Internal types for the Chat Completions API
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<JsonSchema>,
}

/// JSON schema wrapper used by OpenAI when `response_format = "json_schema"`.
#[derive(Debug, Serialize)]
pub(crate) struct JsonSchema {
    pub name: String,
    pub schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

/// Response from the Chat Completions API
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Usage {
    pub total_tokens: i32,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
}
