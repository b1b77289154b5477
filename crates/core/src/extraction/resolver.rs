//! Time phrase resolution
//!
//! Resolves relative and absolute date-and-time phrases ("завтра в 14:00",
//! "monday at 2pm", "через 2 дня") against a reference instant and timezone
//! into concrete, offset-anchored date-times.
//!
//! Resolution rules:
//! - A bare weekday name means the *next* occurrence strictly after the
//!   reference date; saying "Monday" on a Monday resolves 7 days out. A
//!   leading "next"/"следующий" modifier is accepted and changes nothing.
//! - A clock time without a date qualifier resolves to its next future
//!   occurrence: if that time already passed today, the date rolls forward
//!   one day.
//! - Offsets are taken from the resolved date in the target zone, so a
//!   phrase resolving across a DST transition gets the destination offset,
//!   not the reference date's.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveTime, TimeZone,
    Weekday,
};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use vetra_domain::constants::DEFAULT_EVENT_HOUR;
use vetra_domain::ReferenceContext;

/// Failure to turn a phrase into a date-time. Callers treat this as "no
/// time found" and drop the owning clause; it is never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("no time expression recognized in \"{0}\"")]
    Unrecognized(String),

    #[error("\"{0}\" does not map to a valid local time in {1}")]
    InvalidLocalTime(String, Tz),
}

/// Named disambiguation rule for bare hour values without an AM/PM marker.
///
/// Chat messages like "обед в 2" almost always mean the afternoon, so the
/// default maps bare hours 1-6 to PM. Explicit `HH:MM` times are taken as
/// 24-hour notation and never adjusted. The rule is a judgment call carried
/// over from production behavior and kept overridable pending empirical
/// validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmallHourRule {
    /// Bare hours 1-6 without a qualifier are interpreted as PM.
    #[default]
    AssumePm,
    /// Bare hours are taken literally.
    Literal,
}

/// "HH:MM" with an optional meridiem suffix.
static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2}):(\d{2})(?:\s*(am|pm))?\b").unwrap());

/// Bare hour with a mandatory meridiem ("2pm", "11 am").
static AMPM_HOUR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*(am|pm)\b").unwrap());

/// Bare hour introduced by a time preposition ("в 5", "at 11").
static BARE_HOUR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:\b|^)(?:в|at)\s+(\d{1,2})\b").unwrap());

/// Isolated hour, used for range endpoints ("с 9 до 17").
static LONE_HOUR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d{1,2})\s*$").unwrap());

/// Relative offset: "in 2 days", "через 2 дня", "через 30 минут".
static RELATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:in|через)\s+(\d+)\s+(day|days|день|дня|дней|hour|hours|час|часа|часов|minute|minutes|min|mins|минута|минуту|минуты|минут)\b",
    )
    .unwrap()
});

/// Named day anchors. Longer phrases come first so "day after tomorrow"
/// wins over the "tomorrow" it contains.
static NAMED_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(послезавтра|завтра|сегодня|day after tomorrow|tomorrow|today)\b").unwrap()
});

/// Weekday names, English plus Russian nominative and accusative forms.
static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday|понедельник|вторник|среда|среду|четверг|пятница|пятницу|суббота|субботу|воскресенье)\b",
    )
    .unwrap()
});

/// Date-level anchor extracted from a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateAnchor {
    /// Whole days relative to the reference date ("завтра" = 1).
    DayOffset(i64),
    /// Displacement from the reference instant itself ("через 2 часа").
    InstantOffset(i64),
    /// Next occurrence of a weekday, strictly after the reference date.
    NextWeekday(Weekday),
}

/// Resolves date-and-time phrases against a [`ReferenceContext`].
#[derive(Debug, Clone, Default)]
pub struct TimeResolver {
    small_hour_rule: SmallHourRule,
}

impl TimeResolver {
    /// Create a resolver with the default [`SmallHourRule::AssumePm`] rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the bare-hour disambiguation rule.
    #[must_use]
    pub fn with_small_hour_rule(mut self, rule: SmallHourRule) -> Self {
        self.small_hour_rule = rule;
        self
    }

    /// Resolve a phrase into a concrete date-time anchored in the context's
    /// timezone.
    ///
    /// # Errors
    /// Returns [`ResolutionError::Unrecognized`] when the phrase carries
    /// neither a clock time nor a date anchor, and
    /// [`ResolutionError::InvalidLocalTime`] when the combination lands in a
    /// hole of the target zone's local timeline.
    pub fn resolve(
        &self,
        phrase: &str,
        ctx: &ReferenceContext,
    ) -> Result<DateTime<FixedOffset>, ResolutionError> {
        let anchor = self.parse_date_anchor(phrase);
        let time = self.parse_time_of_day(phrase);

        if anchor.is_none() && time.is_none() {
            return Err(ResolutionError::Unrecognized(phrase.trim().to_string()));
        }

        // Instant offsets ignore the clock entirely: "через 2 часа" means a
        // displacement from now, whatever the wall clock says.
        if let Some(DateAnchor::InstantOffset(minutes)) = anchor {
            let shifted = ctx.reference_instant + Duration::minutes(minutes);
            return Ok(shifted.with_timezone(&ctx.timezone).fixed_offset());
        }

        let reference_date = ctx.reference_date();
        let date = match anchor {
            Some(DateAnchor::DayOffset(days)) => reference_date + Duration::days(days),
            Some(DateAnchor::NextWeekday(target)) => next_weekday(reference_date, target),
            _ => reference_date,
        };

        let time_of_day = time.unwrap_or_else(default_event_time);
        let mut resolved = self.anchor_local(date, time_of_day, ctx.timezone, phrase)?;

        // Rollforward: a clock time with no date qualifier means its next
        // future occurrence.
        if anchor.is_none() && resolved <= ctx.reference_instant {
            resolved =
                self.anchor_local(date + Duration::days(1), time_of_day, ctx.timezone, phrase)?;
        }

        Ok(resolved)
    }

    /// Parse a clock expression in isolation ("9:00", "5pm", "9").
    ///
    /// Used for range endpoints, where the surrounding clause supplies the
    /// date. Bare hours go through the same [`SmallHourRule`] as full
    /// phrases.
    ///
    /// # Errors
    /// Returns [`ResolutionError::Unrecognized`] when the expression is not
    /// a clock time.
    pub fn resolve_clock(&self, expr: &str) -> Result<NaiveTime, ResolutionError> {
        if let Some(time) = self.parse_time_of_day(expr) {
            return Ok(time);
        }
        if let Some(caps) = LONE_HOUR_RE.captures(expr) {
            if let Some(time) = self.bare_hour_time(&caps[1]) {
                return Ok(time);
            }
        }
        Err(ResolutionError::Unrecognized(expr.trim().to_string()))
    }

    /// Extract the date-level anchor of a phrase, if any.
    pub fn resolve_date_anchor(&self, phrase: &str, ctx: &ReferenceContext) -> Option<NaiveDate> {
        let reference_date = ctx.reference_date();
        match self.parse_date_anchor(phrase)? {
            DateAnchor::DayOffset(days) => Some(reference_date + Duration::days(days)),
            DateAnchor::NextWeekday(target) => Some(next_weekday(reference_date, target)),
            DateAnchor::InstantOffset(minutes) => Some(
                (ctx.reference_instant + Duration::minutes(minutes))
                    .with_timezone(&ctx.timezone)
                    .date_naive(),
            ),
        }
    }

    /// Anchor a naive date and time in the given zone, resolving DST edges.
    ///
    /// Ambiguous local times (fall-back) take the earliest offset; times in
    /// a spring-forward gap shift one hour later.
    ///
    /// # Errors
    /// Returns [`ResolutionError::InvalidLocalTime`] when even the shifted
    /// time cannot be mapped into the zone.
    pub fn anchor_local(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        timezone: Tz,
        phrase: &str,
    ) -> Result<DateTime<FixedOffset>, ResolutionError> {
        let naive = date.and_time(time);
        match timezone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt.fixed_offset()),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest.fixed_offset()),
            LocalResult::None => (naive + Duration::hours(1))
                .and_local_timezone(timezone)
                .earliest()
                .map(|dt| dt.fixed_offset())
                .ok_or_else(|| {
                    ResolutionError::InvalidLocalTime(phrase.trim().to_string(), timezone)
                }),
        }
    }

    fn parse_date_anchor(&self, phrase: &str) -> Option<DateAnchor> {
        if let Some(caps) = RELATIVE_RE.captures(phrase) {
            let amount: i64 = caps[1].parse().ok()?;
            let unit = caps[2].to_lowercase();
            return Some(match unit.as_str() {
                "day" | "days" | "день" | "дня" | "дней" => DateAnchor::DayOffset(amount),
                "hour" | "hours" | "час" | "часа" | "часов" => {
                    DateAnchor::InstantOffset(amount * 60)
                }
                _ => DateAnchor::InstantOffset(amount),
            });
        }

        if let Some(caps) = NAMED_DAY_RE.captures(phrase) {
            let name = caps[1].to_lowercase();
            return Some(match name.as_str() {
                "сегодня" | "today" => DateAnchor::DayOffset(0),
                "послезавтра" | "day after tomorrow" => DateAnchor::DayOffset(2),
                _ => DateAnchor::DayOffset(1),
            });
        }

        if let Some(caps) = WEEKDAY_RE.captures(phrase) {
            return Some(DateAnchor::NextWeekday(weekday_from_name(&caps[1])?));
        }

        None
    }

    fn parse_time_of_day(&self, phrase: &str) -> Option<NaiveTime> {
        // "HH:MM" is 24-hour notation unless a meridiem says otherwise.
        for caps in CLOCK_RE.captures_iter(phrase) {
            let hour: u32 = caps[1].parse().ok()?;
            let minute: u32 = caps[2].parse().ok()?;
            let hour = match caps.get(3) {
                Some(meridiem) if hour <= 12 => meridiem_hour(hour, meridiem.as_str()),
                _ => hour,
            };
            if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                return Some(time);
            }
        }

        if let Some(caps) = AMPM_HOUR_RE.captures(phrase) {
            let hour: u32 = caps[1].parse().ok()?;
            if hour <= 12 {
                return NaiveTime::from_hms_opt(meridiem_hour(hour, &caps[2]), 0, 0);
            }
        }

        if let Some(caps) = BARE_HOUR_RE.captures(phrase) {
            return self.bare_hour_time(&caps[1]);
        }

        None
    }

    fn bare_hour_time(&self, digits: &str) -> Option<NaiveTime> {
        let hour: u32 = digits.parse().ok()?;
        if hour > 23 {
            return None;
        }
        NaiveTime::from_hms_opt(self.apply_small_hour_rule(hour), 0, 0)
    }

    fn apply_small_hour_rule(&self, hour: u32) -> u32 {
        match self.small_hour_rule {
            SmallHourRule::AssumePm if (1..=6).contains(&hour) => hour + 12,
            _ => hour,
        }
    }
}

fn default_event_time() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_EVENT_HOUR, 0, 0).unwrap_or_default()
}

fn meridiem_hour(hour: u32, meridiem: &str) -> u32 {
    match meridiem.to_ascii_lowercase().as_str() {
        "am" => hour % 12,
        _ => hour % 12 + 12,
    }
}

/// Next occurrence of `target` strictly after `from`; never the same day.
fn next_weekday(from: NaiveDate, target: Weekday) -> NaiveDate {
    let ahead = (i64::from(target.num_days_from_monday())
        - i64::from(from.weekday().num_days_from_monday()))
    .rem_euclid(7);
    let ahead = if ahead == 0 { 7 } else { ahead };
    from + Duration::days(ahead)
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" | "понедельник" => Some(Weekday::Mon),
        "tuesday" | "вторник" => Some(Weekday::Tue),
        "wednesday" | "среда" | "среду" => Some(Weekday::Wed),
        "thursday" | "четверг" => Some(Weekday::Thu),
        "friday" | "пятница" | "пятницу" => Some(Weekday::Fri),
        "saturday" | "суббота" | "субботу" => Some(Weekday::Sat),
        "sunday" | "воскресенье" => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike, Utc};
    use chrono_tz::Tz;
    use vetra_domain::ReferenceContext;

    use super::*;

    /// 2025-06-11 is a Wednesday; 09:00 local in Almaty.
    fn almaty_context() -> ReferenceContext {
        let instant = chrono_tz::Asia::Almaty
            .with_ymd_and_hms(2025, 6, 11, 9, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        ReferenceContext::new(instant, chrono_tz::Asia::Almaty)
    }

    #[test]
    fn clock_time_is_taken_exactly() {
        let ctx = almaty_context();
        let resolver = TimeResolver::new();

        for hour in 0..24 {
            let phrase = format!("встреча завтра в {hour}:30");
            let resolved = resolver.resolve(&phrase, &ctx).unwrap();
            assert_eq!(resolved.hour(), hour, "phrase: {phrase}");
            assert_eq!(resolved.minute(), 30);
        }
    }

    #[test]
    fn tomorrow_resolves_to_next_day() {
        let ctx = almaty_context();
        let resolved = TimeResolver::new().resolve("завтра в 14:00", &ctx).unwrap();

        let expected = chrono_tz::Asia::Almaty
            .with_ymd_and_hms(2025, 6, 12, 14, 0, 0)
            .single()
            .unwrap()
            .fixed_offset();
        assert_eq!(resolved, expected);
    }

    #[test]
    fn weekday_on_its_own_day_is_seven_days_out() {
        let ctx = almaty_context();
        // Reference is a Wednesday; "в среду" must not resolve to today.
        let resolved = TimeResolver::new().resolve("в среду в 10:00", &ctx).unwrap();
        assert_eq!(resolved.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 18).unwrap());
    }

    #[test]
    fn weekday_resolves_strictly_forward() {
        let ctx = almaty_context();
        let resolved = TimeResolver::new().resolve("meeting friday at 10:00", &ctx).unwrap();
        assert_eq!(resolved.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 13).unwrap());
    }

    #[test]
    fn next_modifier_changes_nothing() {
        let ctx = almaty_context();
        let resolver = TimeResolver::new();

        let bare = resolver.resolve("friday at 10:00", &ctx).unwrap();
        let with_next = resolver.resolve("next friday at 10:00", &ctx).unwrap();
        assert_eq!(with_next, bare);
        assert_eq!(with_next.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 13).unwrap());

        let ru_bare = resolver.resolve("в пятницу в 10:00", &ctx).unwrap();
        let ru_next = resolver.resolve("в следующую пятницу в 10:00", &ctx).unwrap();
        assert_eq!(ru_next, ru_bare);
        assert_eq!(ru_next, bare);
    }

    #[test]
    fn passed_clock_time_rolls_to_next_day() {
        let ctx = almaty_context(); // local 09:00
        let resolved = TimeResolver::new().resolve("в 8:00", &ctx).unwrap();
        assert_eq!(resolved.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 12).unwrap());
        assert_eq!(resolved.hour(), 8);

        let later = TimeResolver::new().resolve("в 10:00", &ctx).unwrap();
        assert_eq!(later.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
    }

    #[test]
    fn relative_day_offsets_resolve() {
        let ctx = almaty_context();
        let resolver = TimeResolver::new();

        let ru = resolver.resolve("через 2 дня в 15:00", &ctx).unwrap();
        assert_eq!(ru.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 13).unwrap());
        assert_eq!(ru.hour(), 15);

        let en = resolver.resolve("in 3 days at 11:00", &ctx).unwrap();
        assert_eq!(en.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 14).unwrap());
    }

    #[test]
    fn hour_offset_is_instant_displacement() {
        let ctx = almaty_context();
        let resolved = TimeResolver::new().resolve("через 2 часа", &ctx).unwrap();
        assert_eq!(resolved.hour(), 11);
        assert_eq!(resolved.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
    }

    #[test]
    fn meridiem_hours_convert() {
        let ctx = almaty_context();
        let resolver = TimeResolver::new();

        assert_eq!(resolver.resolve("meeting tomorrow at 2pm", &ctx).unwrap().hour(), 14);
        assert_eq!(resolver.resolve("call tomorrow at 12am", &ctx).unwrap().hour(), 0);
        assert_eq!(resolver.resolve("lunch tomorrow at 12pm", &ctx).unwrap().hour(), 12);
    }

    #[test]
    fn small_hours_assume_pm_by_default() {
        let ctx = almaty_context();
        let resolved = TimeResolver::new().resolve("обед завтра в 2", &ctx).unwrap();
        assert_eq!(resolved.hour(), 14);
    }

    #[test]
    fn small_hour_rule_is_overridable() {
        let ctx = almaty_context();
        let resolver = TimeResolver::new().with_small_hour_rule(SmallHourRule::Literal);
        let resolved = resolver.resolve("завтра в 2", &ctx).unwrap();
        assert_eq!(resolved.hour(), 2);
    }

    #[test]
    fn explicit_minutes_are_never_shifted() {
        // "5:30" is 24-hour notation, not a small-hour case.
        let ctx = almaty_context();
        let resolved = TimeResolver::new().resolve("завтра в 5:30", &ctx).unwrap();
        assert_eq!(resolved.hour(), 5);
    }

    #[test]
    fn date_without_time_uses_default_hour() {
        let ctx = almaty_context();
        let resolved = TimeResolver::new().resolve("завтра", &ctx).unwrap();
        assert_eq!(resolved.hour(), DEFAULT_EVENT_HOUR);
    }

    #[test]
    fn unparseable_phrase_is_a_typed_failure() {
        let ctx = almaty_context();
        let result = TimeResolver::new().resolve("просто текст без времени", &ctx);
        assert!(matches!(result, Err(ResolutionError::Unrecognized(_))));
    }

    #[test]
    fn dst_offset_comes_from_the_resolved_date() {
        // Reference in EST (-05:00); two days later the US has switched to
        // EDT (-04:00). The resolved offset must be the destination's.
        let tz: Tz = chrono_tz::America::New_York;
        let instant =
            tz.with_ymd_and_hms(2025, 3, 8, 9, 0, 0).single().unwrap().with_timezone(&Utc);
        let ctx = ReferenceContext::new(instant, tz);

        let resolved = TimeResolver::new().resolve("in 2 days at 10:00", &ctx).unwrap();
        assert_eq!(resolved.offset().local_minus_utc(), -4 * 3600);
        assert_eq!(resolved.hour(), 10);
    }

    #[test]
    fn spring_forward_gap_shifts_one_hour() {
        let tz: Tz = chrono_tz::America::New_York;
        let instant =
            tz.with_ymd_and_hms(2025, 3, 8, 9, 0, 0).single().unwrap().with_timezone(&Utc);
        let ctx = ReferenceContext::new(instant, tz);

        // 02:30 on 2025-03-09 does not exist in New York.
        let resolved = TimeResolver::new()
            .with_small_hour_rule(SmallHourRule::Literal)
            .resolve("завтра в 2:30", &ctx)
            .unwrap();
        assert_eq!(resolved.hour(), 3);
        assert_eq!(resolved.minute(), 30);
    }

    #[test]
    fn fall_back_ambiguity_takes_the_earliest_offset() {
        let tz: Tz = chrono_tz::America::New_York;
        let instant =
            tz.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).single().unwrap().with_timezone(&Utc);
        let ctx = ReferenceContext::new(instant, tz);

        // 01:30 on 2025-11-02 occurs twice in New York; the first pass is
        // still EDT.
        let resolved = TimeResolver::new().resolve("завтра в 1:30", &ctx).unwrap();
        assert_eq!(resolved.offset().local_minus_utc(), -4 * 3600);
        assert_eq!(resolved.hour(), 1);
        assert_eq!(resolved.minute(), 30);
    }

    #[test]
    fn clock_expressions_parse_in_isolation() {
        let resolver = TimeResolver::new();

        assert_eq!(resolver.resolve_clock("9:00").unwrap(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(resolver.resolve_clock("5pm").unwrap(), NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        // Lone small hour goes through the PM rule.
        assert_eq!(resolver.resolve_clock("3").unwrap(), NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert!(resolver.resolve_clock("пятница").is_err());
    }
}
