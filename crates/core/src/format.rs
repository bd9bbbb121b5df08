//! Display formatting

use jiff::{Timestamp, tz::TimeZone};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso};

/// Format an amount in rupees, e.g. `₹1,234.50`.
pub fn format_currency(amount: Decimal) -> String {
    let minor = (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .unwrap_or(i64::MAX);

    format!("{}", Money::from_minor(minor, iso::INR))
}

/// Format the calendar date of `at` in `zone`, e.g. `18 Oct 2026`.
pub fn format_date(at: Timestamp, zone: &TimeZone) -> String {
    at.to_zoned(zone.clone()).strftime("%d %b %Y").to_string()
}

/// Format the date and time of `at` in `zone`, e.g. `18 Oct 2026, 14:05`.
pub fn format_date_time(at: Timestamp, zone: &TimeZone) -> String {
    at.to_zoned(zone.clone())
        .strftime("%d %b %Y, %H:%M")
        .to_string()
}

/// Shorten `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");

    truncated
}
