//! Timezone validation and alias resolution.
//!
//! Calendar providers report IANA identifiers, but users type things like
//! "almaty" or "new york". This module normalizes both into a `chrono_tz::Tz`
//! and falls back to UTC rather than failing when a zone is unknown.

use std::collections::HashMap;

use chrono_tz::Tz;
use once_cell::sync::Lazy;

/// Friendly-name aliases for commonly requested zones.
static TIMEZONE_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Europe
        ("london", "Europe/London"),
        ("paris", "Europe/Paris"),
        ("berlin", "Europe/Berlin"),
        ("moscow", "Europe/Moscow"),
        ("rome", "Europe/Rome"),
        ("madrid", "Europe/Madrid"),
        // Asia
        ("tokyo", "Asia/Tokyo"),
        ("beijing", "Asia/Shanghai"),
        ("shanghai", "Asia/Shanghai"),
        ("delhi", "Asia/Kolkata"),
        ("mumbai", "Asia/Kolkata"),
        ("dubai", "Asia/Dubai"),
        ("singapore", "Asia/Singapore"),
        ("hong_kong", "Asia/Hong_Kong"),
        ("almaty", "Asia/Almaty"),
        ("tashkent", "Asia/Tashkent"),
        ("astana", "Asia/Almaty"),
        // Americas
        ("new_york", "America/New_York"),
        ("los_angeles", "America/Los_Angeles"),
        ("chicago", "America/Chicago"),
        ("toronto", "America/Toronto"),
        ("vancouver", "America/Vancouver"),
        ("mexico_city", "America/Mexico_City"),
        ("sao_paulo", "America/Sao_Paulo"),
        ("buenos_aires", "America/Argentina/Buenos_Aires"),
        // Australia / Oceania
        ("sydney", "Australia/Sydney"),
        ("melbourne", "Australia/Melbourne"),
        ("perth", "Australia/Perth"),
        ("auckland", "Pacific/Auckland"),
        // Africa
        ("cairo", "Africa/Cairo"),
        ("lagos", "Africa/Lagos"),
        ("johannesburg", "Africa/Johannesburg"),
    ])
});

/// Region prefixes probed when input looks like a bare city name.
const REGION_PREFIXES: [&str; 6] =
    ["Europe/", "Asia/", "America/", "Australia/", "Africa/", "Pacific/"];

/// Validate a timezone identifier, falling back to UTC when it is unknown.
///
/// Callers that must distinguish "unknown" from "UTC" should parse the
/// identifier themselves; the pipeline treats an unusable zone as UTC so a
/// bad calendar setting never blocks extraction.
pub fn validate_timezone(identifier: &str) -> Tz {
    identifier.parse::<Tz>().unwrap_or(Tz::UTC)
}

/// Resolve user input (an alias, a city name, or a proper IANA identifier)
/// into a timezone. Returns `None` when nothing matches.
pub fn resolve_timezone_alias(input: &str) -> Option<Tz> {
    let cleaned = input.trim().to_lowercase().replace([' ', '-'], "_");

    if let Some(resolved) = TIMEZONE_ALIASES.get(cleaned.as_str()) {
        return resolved.parse::<Tz>().ok();
    }

    if let Ok(tz) = input.trim().parse::<Tz>() {
        return Some(tz);
    }

    // Probe common region prefixes: "warsaw" -> "Europe/Warsaw"
    let city = title_case(&cleaned);
    for prefix in REGION_PREFIXES {
        if let Ok(tz) = format!("{prefix}{city}").parse::<Tz>() {
            return Some(tz);
        }
    }

    None
}

fn title_case(input: &str) -> String {
    input
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}
