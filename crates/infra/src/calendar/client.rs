/// Google Calendar client implementing the calendar-writer port
use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info};
use vetra_core::CalendarWriter;
use vetra_domain::{CreatedEvent, EventDescriptor, Result, VetraError};

use crate::http::HttpClient;

use super::types::{EventPayload, EventTime, InsertedEvent};

const CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";
const DEFAULT_CALENDAR_ID: &str = "primary";

/// Google Calendar API client for inserting extracted events.
pub struct GoogleCalendarClient {
    http_client: HttpClient,
    access_token: String,
    calendar_id: String,
    timezone: Option<String>,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Create a client writing to the user's primary calendar.
    pub fn new(access_token: String, http_client: HttpClient) -> Self {
        Self {
            http_client,
            access_token,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            timezone: None,
            base_url: CALENDAR_API_URL.to_string(),
        }
    }

    /// Target a specific calendar instead of `primary`.
    #[must_use]
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Attach the user's IANA zone to event payloads.
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Create a client with a custom API URL (for testing).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn event_payload(&self, event: &EventDescriptor) -> EventPayload {
        EventPayload {
            summary: event.summary.clone(),
            start: EventTime {
                date_time: event.start.to_rfc3339(),
                time_zone: self.timezone.clone(),
            },
            end: EventTime { date_time: event.end.to_rfc3339(), time_zone: self.timezone.clone() },
        }
    }
}

#[async_trait]
impl CalendarWriter for GoogleCalendarClient {
    async fn insert_event(&self, event: &EventDescriptor) -> Result<CreatedEvent> {
        let url = format!("{}/calendars/{}/events", self.base_url, self.calendar_id);
        let payload = self.event_payload(event);

        let request_builder = self
            .http_client
            .request(Method::POST, &url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Content-Type", "application/json")
            .json(&payload);

        let response = self.http_client.send(request_builder).await?;
        let status = response.status();
        debug!(status = status.as_u16(), "received calendar API response");

        if !status.is_success() {
            let code = status.as_u16();
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(match code {
                401 | 403 => {
                    VetraError::Config(format!("calendar access token rejected ({})", code))
                }
                400..=499 => {
                    VetraError::InvalidInput(format!("calendar API status {}: {}", code, body))
                }
                _ => VetraError::Network(format!("calendar API status {}: {}", code, body)),
            });
        }

        let inserted: InsertedEvent = response.json().await.map_err(|e| {
            VetraError::Internal(format!("failed to parse calendar response: {}", e))
        })?;

        info!(event_id = %inserted.id, summary = %event.summary, "event inserted");

        Ok(CreatedEvent { id: inserted.id, html_link: inserted.html_link })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::DateTime;
    use vetra_domain::EventCategory;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(base_url: String) -> GoogleCalendarClient {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .max_attempts(1)
            .build()
            .expect("http client");

        GoogleCalendarClient::new("test-token".to_string(), http_client)
            .with_timezone("Asia/Almaty")
            .with_base_url(base_url)
    }

    fn sample_event() -> EventDescriptor {
        let start = DateTime::parse_from_rfc3339("2025-06-12T14:00:00+05:00").unwrap();
        EventDescriptor {
            start,
            end: start + chrono::Duration::hours(1),
            summary: "встреча с Артёмом".to_string(),
            category: EventCategory::Meeting,
        }
    }

    #[tokio::test]
    async fn inserts_an_event() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_partial_json(serde_json::json!({
                "summary": "встреча с Артёмом",
                "start": { "dateTime": "2025-06-12T14:00:00+05:00", "timeZone": "Asia/Almaty" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt-123",
                "htmlLink": "https://calendar.google.com/event?eid=evt-123"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let created = client.insert_event(&sample_event()).await.expect("should insert");

        assert_eq!(created.id, "evt-123");
        assert!(created.html_link.is_some());
    }

    #[tokio::test]
    async fn rejected_token_maps_to_config_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Credentials"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let result = client.insert_event(&sample_event()).await;

        assert!(matches!(result, Err(VetraError::Config(_))));
    }

    #[tokio::test]
    async fn bad_request_maps_to_invalid_input() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let result = client.insert_event(&sample_event()).await;

        assert!(matches!(result, Err(VetraError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn custom_calendar_id_changes_the_path() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/team-calendar/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt-456"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri()).with_calendar_id("team-calendar");
        let created = client.insert_event(&sample_event()).await.expect("should insert");

        assert_eq!(created.id, "evt-456");
    }
}
