//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! pipeline.

// Default event durations by category, in minutes
pub const CALL_DURATION_MINUTES: i64 = 30;
pub const MEETING_DURATION_MINUTES: i64 = 60;
pub const WORK_BLOCK_DURATION_MINUTES: i64 = 120;
pub const SOCIAL_DURATION_MINUTES: i64 = 90;
pub const GENERIC_DURATION_MINUTES: i64 = 60;

// Model-based extraction
pub const MODEL_EXTRACTION_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_EXTRACTION_MODEL: &str = "gpt-4o-mini";

// Time resolution
/// Clock hour used when a phrase names a date but no time ("завтра").
pub const DEFAULT_EVENT_HOUR: u32 = 9;

// Summaries
pub const MAX_SUMMARY_LENGTH: usize = 120;
pub const SUMMARY_TRUNCATE_SUFFIX: &str = "...";

// Fallback zone when the user's calendar reports nothing usable
pub const DEFAULT_TIMEZONE: &str = "Asia/Almaty";
