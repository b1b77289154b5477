//! Rule-based extraction
//!
//! Deterministic fallback extractor: splits a message into clauses, runs
//! each through the time resolver, and derives the event summary from what
//! remains of the clause after the time expressions are scrubbed out.
//!
//! Every candidate this extractor emits already carries a future start;
//! clauses whose time has passed, or that carry no recognizable time at
//! all, are dropped silently.

use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use vetra_domain::constants::{MAX_SUMMARY_LENGTH, SUMMARY_TRUNCATE_SUFFIX};
use vetra_domain::{CandidateSource, EventCandidate, ReferenceContext};

use super::duration::infer_category;
use super::resolver::TimeResolver;

/// Clause boundaries: commas, semicolons, newlines, and sentence-ending
/// punctuation followed by whitespace.
static CLAUSE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;\n]|[.!?]\s+").unwrap());

/// Explicit time range: "с 9:00 до 17:00", "from 9 to 5pm".
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\bс|\bfrom)\s+(\d{1,2}(?::\d{2})?(?:\s*(?:am|pm))?)\s+(?:до|to|until)\s+(\d{1,2}(?::\d{2})?(?:\s*(?:am|pm))?)",
    )
    .unwrap()
});

/// Time and date expressions scrubbed from a clause before it becomes the
/// event summary. Ranges go first so their endpoints do not survive as
/// stray clock times.
static SUMMARY_SCRUB_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:\bс|\bfrom)\s+\d{1,2}(?::\d{2})?(?:\s*(?:am|pm))?\s+(?:до|to|until)\s+\d{1,2}(?::\d{2})?(?:\s*(?:am|pm))?",
        r"(?i)(?:\b(?:в|at)\s+)?\d{1,2}:\d{2}(?:\s*(?:am|pm))?",
        r"(?i)(?:\b(?:в|at)\s+)?\d{1,2}\s*(?:am|pm)\b",
        r"(?i)\b(?:в|at)\s+\d{1,2}\b",
        r"(?i)\b(?:in|через)\s+\d+\s+(?:day|days|день|дня|дней|hour|hours|час|часа|часов|minute|minutes|min|mins|минута|минуту|минуты|минут)\b",
        r"(?i)\b(?:послезавтра|завтра|сегодня|day after tomorrow|tomorrow|today)\b",
        r"(?i)(?:\b(?:next|следующ\w+|в|во|on)\s+)?\b(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|понедельник|вторник|среда|среду|четверг|пятница|пятницу|суббота|субботу|воскресенье)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Connective words stripped from summary edges once the time expressions
/// are gone ("встреча с ... в" leaves a dangling "в").
const EDGE_FILLERS: [&str; 14] =
    ["в", "во", "на", "и", "с", "до", "у", "at", "on", "in", "from", "to", "the", "a"];

/// Deterministic pattern-matching extractor.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedExtractor {
    resolver: TimeResolver,
}

impl RuleBasedExtractor {
    pub fn new(resolver: TimeResolver) -> Self {
        Self { resolver }
    }

    /// Extract event candidates from free-form text.
    ///
    /// Candidates come back in the order their clauses appear in the text.
    /// An empty result means no future-dated event was found; this is not
    /// an error.
    pub fn extract(&self, text: &str, ctx: &ReferenceContext) -> Vec<EventCandidate> {
        let mut candidates = Vec::new();

        for clause in CLAUSE_SPLIT_RE.split(text) {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            if let Some(candidate) = self.extract_clause(clause, ctx) {
                candidates.push(candidate);
            }
        }

        candidates
    }

    fn extract_clause(&self, clause: &str, ctx: &ReferenceContext) -> Option<EventCandidate> {
        let (start, end) = if let Some((range_start, range_end)) = self.resolve_range(clause, ctx)
        {
            (range_start, Some(range_end))
        } else {
            match self.resolver.resolve(clause, ctx) {
                Ok(start) => (start, None),
                Err(err) => {
                    debug!(clause, %err, "clause carries no resolvable time, skipping");
                    return None;
                }
            }
        };

        if start <= ctx.reference_instant {
            debug!(clause, %start, "clause resolves to the past, skipping");
            return None;
        }

        let summary = self.derive_summary(clause);
        if summary.is_empty() {
            debug!(clause, "nothing left after scrubbing time expressions, skipping");
            return None;
        }

        let category = infer_category(&summary);
        Some(EventCandidate { start, end, summary, category, source: CandidateSource::Rule })
    }

    /// Resolve an explicit "с X до Y" / "from X to Y" range. Both endpoints
    /// share the clause's date anchor; an end at or before the start is an
    /// overnight range and lands on the next day.
    fn resolve_range(
        &self,
        clause: &str,
        ctx: &ReferenceContext,
    ) -> Option<(chrono::DateTime<chrono::FixedOffset>, chrono::DateTime<chrono::FixedOffset>)>
    {
        let caps = RANGE_RE.captures(clause)?;
        let start_time = self.resolver.resolve_clock(&caps[1]).ok()?;
        let end_time = self.resolver.resolve_clock(&caps[2]).ok()?;

        let anchor = self.resolver.resolve_date_anchor(clause, ctx);
        let mut date = anchor.unwrap_or_else(|| ctx.reference_date());

        let mut start = self.resolver.anchor_local(date, start_time, ctx.timezone, clause).ok()?;

        // No date qualifier and the range already started: take tomorrow's
        // occurrence, same as for single times.
        if anchor.is_none() && start <= ctx.reference_instant {
            date += Duration::days(1);
            start = self.resolver.anchor_local(date, start_time, ctx.timezone, clause).ok()?;
        }

        let mut end = self.resolver.anchor_local(date, end_time, ctx.timezone, clause).ok()?;
        if end <= start {
            end = self
                .resolver
                .anchor_local(date + Duration::days(1), end_time, ctx.timezone, clause)
                .ok()?;
        }

        Some((start, end))
    }

    /// Turn a clause into an event summary by scrubbing out the time and
    /// date expressions, then tidying what remains.
    fn derive_summary(&self, clause: &str) -> String {
        let mut text = clause.to_string();
        for scrub in SUMMARY_SCRUB_RES.iter() {
            text = scrub.replace_all(&text, " ").into_owned();
        }

        let mut words: Vec<&str> = text.split_whitespace().collect();
        while words.first().is_some_and(|w| is_edge_filler(w)) {
            words.remove(0);
        }
        while words.last().is_some_and(|w| is_edge_filler(w)) {
            words.pop();
        }

        let joined = words.join(" ");
        let trimmed = joined.trim_matches(|c: char| c.is_whitespace() || ",.;:!?-".contains(c));
        truncate_summary(trimmed)
    }
}

fn is_edge_filler(word: &str) -> bool {
    let cleaned = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
    cleaned.is_empty() || EDGE_FILLERS.contains(&cleaned.as_str())
}

fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() <= MAX_SUMMARY_LENGTH {
        return summary.to_string();
    }
    let keep = MAX_SUMMARY_LENGTH - SUMMARY_TRUNCATE_SUFFIX.chars().count();
    let truncated: String = summary.chars().take(keep).collect();
    format!("{}{}", truncated.trim_end(), SUMMARY_TRUNCATE_SUFFIX)
}
