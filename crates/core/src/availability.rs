//! Owner-declared blocked dates: input filtering for the availability ledger.
//!
//! Blocked dates arrive from clients as arbitrary strings. Only entries that
//! are strict ISO `YYYY-MM-DD` and denote a real calendar day are kept;
//! everything else is silently dropped before persistence, matching the API
//! contract (a malformed entry is indistinguishable from one never sent).

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"))
}

/// Keep only well-formed, real calendar dates, trimmed and deduplicated,
/// preserving first-seen order.
pub fn filter_valid_dates(raw: &[String]) -> Vec<NaiveDate> {
    let mut seen = Vec::new();
    for entry in raw {
        let trimmed = entry.trim();
        if !iso_date_re().is_match(trimmed) {
            continue;
        }
        // The pattern admits impossible days like 2024-13-40; chrono rejects
        // them here.
        let Ok(date) = trimmed.parse::<NaiveDate>() else {
            continue;
        };
        if !seen.contains(&date) {
            seen.push(date);
        }
    }
    seen
}
