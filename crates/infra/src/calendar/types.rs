/// Wire types for the Google Calendar events API
use serde::{Deserialize, Serialize};

/// Request body for `events.insert`.
#[derive(Debug, Serialize)]
pub(crate) struct EventPayload {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

/// A single event boundary. `date_time` carries the offset, so `time_zone`
/// only matters for recurring events; it is sent when the client knows the
/// user's zone.
#[derive(Debug, Serialize)]
pub(crate) struct EventTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Response from `events.insert`.
#[derive(Debug, Deserialize)]
pub(crate) struct InsertedEvent {
    pub id: String,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
}
