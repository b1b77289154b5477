//! Common data types used throughout the pipeline

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Category assigned to an extracted event, inferred from keywords in its
/// summary. Drives the default duration when the message names no end time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Meeting,
    Call,
    WorkBlock,
    Social,
    Generic,
}

impl EventCategory {
    /// Parse a category hint string as returned by the extraction service.
    /// Unknown hints map to `Generic` rather than failing the candidate.
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_ascii_lowercase().as_str() {
            "meeting" => Self::Meeting,
            "call" => Self::Call,
            "work_block" | "work-block" | "work" => Self::WorkBlock,
            "social" => Self::Social,
            _ => Self::Generic,
        }
    }
}

/// Which extraction strategy produced a candidate. Retained for diagnostics,
/// never shown to the end user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Model,
    Rule,
}

/// Intermediate, possibly incomplete result of extraction.
///
/// Candidates are created per extraction call and discarded once converted
/// into an [`EventDescriptor`] or rejected; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCandidate {
    /// Start of the event, anchored to the reference timezone's offset.
    pub start: DateTime<FixedOffset>,
    /// End of the event; filled by duration inference when missing.
    pub end: Option<DateTime<FixedOffset>>,
    /// Non-empty text describing the event.
    pub summary: String,
    /// Category inferred from summary keywords (or a service hint).
    pub category: EventCategory,
    /// Extraction strategy that produced this candidate.
    pub source: CandidateSource,
}

/// Final output unit of the pipeline: a validated, timezone-anchored event
/// ready for persistence. `end` is always strictly after `start`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDescriptor {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub summary: String,
    pub category: EventCategory,
}

/// Immutable input to one extraction call: the frame against which every
/// relative phrase ("tomorrow", "завтра в 14:00") is resolved.
#[derive(Debug, Clone)]
pub struct ReferenceContext {
    /// The instant "now" is resolved against.
    pub reference_instant: DateTime<Utc>,
    /// IANA zone the user's events live in.
    pub timezone: Tz,
    /// Optional ISO 639-1 language hint forwarded to the extraction service.
    pub language_hint: Option<String>,
}

impl ReferenceContext {
    /// Create a context with no language hint.
    pub fn new(reference_instant: DateTime<Utc>, timezone: Tz) -> Self {
        Self { reference_instant, timezone, language_hint: None }
    }

    /// Attach a language hint for the extraction service.
    #[must_use]
    pub fn with_language_hint(mut self, hint: impl Into<String>) -> Self {
        self.language_hint = Some(hint.into());
        self
    }

    /// The reference instant expressed in the user's timezone.
    pub fn local_reference(&self) -> DateTime<Tz> {
        self.reference_instant.with_timezone(&self.timezone)
    }

    /// The reference date in the user's timezone.
    pub fn reference_date(&self) -> NaiveDate {
        self.local_reference().date_naive()
    }
}

/// Result of persisting one event via a calendar collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEvent {
    /// Provider-assigned event id.
    pub id: String,
    /// Link to the event in the provider's UI, when available.
    pub html_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn category_hint_parsing_is_lenient() {
        assert_eq!(EventCategory::from_hint("Meeting"), EventCategory::Meeting);
        assert_eq!(EventCategory::from_hint("work-block"), EventCategory::WorkBlock);
        assert_eq!(EventCategory::from_hint("  call "), EventCategory::Call);
        assert_eq!(EventCategory::from_hint("brunch?"), EventCategory::Generic);
    }

    #[test]
    fn local_reference_uses_context_timezone() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 11, 6, 0, 0).single().unwrap();
        let ctx = ReferenceContext::new(instant, chrono_tz::Asia::Almaty);

        let local = ctx.local_reference();
        assert_eq!(local.date_naive(), ctx.reference_date());
        // Almaty sits east of UTC, so the local clock reads later than 06:00.
        assert!(local.naive_local() > instant.naive_utc());
    }

    #[test]
    fn descriptor_round_trips_through_serde() {
        let start = DateTime::parse_from_rfc3339("2025-06-12T14:00:00+05:00").unwrap();
        let descriptor = EventDescriptor {
            start,
            end: start + chrono::Duration::hours(1),
            summary: "встреча".to_string(),
            category: EventCategory::Meeting,
        };

        let json = serde_json::to_string(&descriptor).unwrap();
        let back: EventDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
        assert!(json.contains("\"meeting\""));
    }
}
