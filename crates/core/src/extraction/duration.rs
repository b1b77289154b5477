//! Duration inference
//!
//! Assigns an end time to events that arrived without one, based on the
//! event's category. Category is inferred from keywords in the summary;
//! anything unrecognized gets the generic default.

use chrono::{DateTime, Duration, FixedOffset};
use once_cell::sync::Lazy;
use vetra_domain::constants::{
    CALL_DURATION_MINUTES, GENERIC_DURATION_MINUTES, MEETING_DURATION_MINUTES,
    SOCIAL_DURATION_MINUTES, WORK_BLOCK_DURATION_MINUTES,
};
use vetra_domain::EventCategory;

/// Keyword tables checked in order; the first category with a hit wins.
/// Call outranks Meeting so "созвон по проекту" stays a 30-minute slot
/// even when the text also smells like a meeting.
static CATEGORY_KEYWORDS: Lazy<Vec<(EventCategory, Vec<&'static str>)>> = Lazy::new(|| {
    vec![
        (
            EventCategory::Call,
            vec!["call", "звонок", "созвон", "созвониться", "позвонить"],
        ),
        (
            EventCategory::WorkBlock,
            vec![
                "work",
                "работа",
                "работать",
                "поработать",
                "focus",
                "coding",
                "разработка",
                "study",
                "учеба",
                "учёба",
            ],
        ),
        (
            EventCategory::Social,
            vec![
                "dinner",
                "ужин",
                "party",
                "вечеринка",
                "drinks",
                "birthday",
                "день рождения",
                "днюха",
            ],
        ),
        (
            EventCategory::Meeting,
            vec![
                "meeting",
                "встреча",
                "встретиться",
                "встречу",
                "sync",
                "standup",
                "interview",
                "собеседование",
                "интервью",
            ],
        ),
    ]
});

/// Infer an event category from summary text.
///
/// Matching is case-insensitive substring search, which is deliberately
/// loose: "обед" and other unlisted activities fall through to
/// [`EventCategory::Generic`] rather than guessing.
pub fn infer_category(summary: &str) -> EventCategory {
    let lowered = summary.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS.iter() {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return *category;
        }
    }
    EventCategory::Generic
}

/// Supplies per-category default durations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationInferencer;

impl DurationInferencer {
    pub fn new() -> Self {
        Self
    }

    /// Default duration for a category, in minutes.
    pub fn default_minutes(&self, category: EventCategory) -> i64 {
        match category {
            EventCategory::Call => CALL_DURATION_MINUTES,
            EventCategory::Meeting => MEETING_DURATION_MINUTES,
            EventCategory::WorkBlock => WORK_BLOCK_DURATION_MINUTES,
            EventCategory::Social => SOCIAL_DURATION_MINUTES,
            EventCategory::Generic => GENERIC_DURATION_MINUTES,
        }
    }

    /// Compute an end time from a start and its category.
    pub fn infer_end(
        &self,
        start: DateTime<FixedOffset>,
        category: EventCategory,
    ) -> DateTime<FixedOffset> {
        start + Duration::minutes(self.default_minutes(category))
    }
}
