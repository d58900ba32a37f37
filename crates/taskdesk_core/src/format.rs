//! Date and text formatting helpers for task display.

use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static BR_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{1,2})/(\d{1,2})/(\d{4})\s*$").expect("valid br date regex")
});

const ELLIPSIS: &str = "...";

/// Formats `date` as `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `"Hoje"` for today, `"Ontem"` for yesterday, otherwise `DD/MM/YYYY`.
pub fn format_date_relative(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "Hoje".to_string();
    }
    if today.checked_sub_days(Days::new(1)) == Some(date) {
        return "Ontem".to_string();
    }
    format_date(date)
}

/// Parses `DD/MM/YYYY` into a calendar date.
///
/// Returns `None` for blank, malformed or impossible dates.
pub fn parse_date_from_br(value: &str) -> Option<NaiveDate> {
    let captures = BR_DATE_RE.captures(value)?;
    let day = captures[1].parse().ok()?;
    let month = captures[2].parse().ok()?;
    let year = captures[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Cuts `text` to `max_chars` characters, appending `...` when it was longer.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
