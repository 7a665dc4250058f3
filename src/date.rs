//! Date parsing module
//!
//! The day of the hospitality event is usually in the recent past, so besides
//! explicit dates the parser understands relative expressions that look
//! backwards from today.

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use crate::error::{Error, Result};

/// Date expression types
#[derive(Debug, Clone, PartialEq)]
pub enum DateExpression {
    /// Use today's date
    Today,
    /// The day before today
    Yesterday,
    /// Use an explicit date
    Explicit(NaiveDate),
    /// Most recent occurrence of a weekday (today counts), minus `weeks_back` weeks
    LastWeekday { day: Weekday, weeks_back: u32 },
}

/// Parse a date expression string into a DateExpression
///
/// Supported formats:
/// - `""` (empty) or `"today"` / `"heute"` → Today
/// - `"yesterday"` / `"gestern"` → Yesterday
/// - `"2024-03-07"` → Explicit date (ISO format)
/// - `"07.03.2024"` → Explicit date (German format)
/// - `"Friday"` / `"Freitag"` → last Friday (or today if today is Friday)
/// - `"Friday-1"` → the Friday one week before that
pub fn parse_date_expression(expr: &str) -> Result<DateExpression> {
    let expr = expr.trim();

    if expr.is_empty() || expr.eq_ignore_ascii_case("today") || expr.eq_ignore_ascii_case("heute") {
        return Ok(DateExpression::Today);
    }

    if expr.eq_ignore_ascii_case("yesterday") || expr.eq_ignore_ascii_case("gestern") {
        return Ok(DateExpression::Yesterday);
    }

    // ISO format: 2024-03-07
    if let Ok(date) = NaiveDate::parse_from_str(expr, "%Y-%m-%d") {
        return Ok(DateExpression::Explicit(date));
    }

    // German format: 07.03.2024
    if let Ok(date) = NaiveDate::parse_from_str(expr, "%d.%m.%Y") {
        return Ok(DateExpression::Explicit(date));
    }

    // Weekday with optional offset: "Friday" or "Friday-2"
    if let Some((day_str, offset_str)) = expr.split_once('-') {
        let day = parse_weekday(day_str.trim())?;
        let weeks_back: u32 = offset_str.trim().parse()
            .map_err(|_| Error::InvalidDateExpression(format!("Invalid offset: {}", offset_str)))?;
        return Ok(DateExpression::LastWeekday { day, weeks_back });
    } else if let Ok(day) = parse_weekday(expr) {
        return Ok(DateExpression::LastWeekday { day, weeks_back: 0 });
    }

    Err(Error::InvalidDateExpression(format!("Unable to parse date expression: {}", expr)))
}

/// Parse a weekday name, English or German (case-insensitive)
fn parse_weekday(s: &str) -> Result<Weekday> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "monday" | "mon" | "montag" | "mo" => Ok(Weekday::Mon),
        "tuesday" | "tue" | "dienstag" | "di" => Ok(Weekday::Tue),
        "wednesday" | "wed" | "mittwoch" | "mi" => Ok(Weekday::Wed),
        "thursday" | "thu" | "donnerstag" | "do" => Ok(Weekday::Thu),
        "friday" | "fri" | "freitag" | "fr" => Ok(Weekday::Fri),
        "saturday" | "sat" | "samstag" | "sa" => Ok(Weekday::Sat),
        "sunday" | "sun" | "sonntag" | "so" => Ok(Weekday::Sun),
        _ => Err(Error::InvalidDateExpression(format!("Unknown weekday: {}", s))),
    }
}

/// Resolve a DateExpression against the local calendar
pub fn resolve_date(expr: &DateExpression) -> Result<NaiveDate> {
    resolve_date_from(expr, Local::now().date_naive())
}

/// Resolve a DateExpression relative to a given `today`
///
/// Fails when the expression reaches outside the calendar range, e.g. a
/// weekday offset of millions of weeks.
pub fn resolve_date_from(expr: &DateExpression, today: NaiveDate) -> Result<NaiveDate> {
    match expr {
        DateExpression::Today => Ok(today),
        DateExpression::Yesterday => days_before(today, 1),
        DateExpression::Explicit(date) => Ok(*date),
        DateExpression::LastWeekday { day, weeks_back } => {
            find_last_weekday(today, *day, *weeks_back)
        }
    }
}

fn days_before(today: NaiveDate, days: u64) -> Result<NaiveDate> {
    today.checked_sub_days(Days::new(days)).ok_or_else(|| {
        Error::InvalidDateExpression(format!("{} days before {} is out of range", days, today))
    })
}

/// Find the most recent occurrence of `target_day` on or before `today`,
/// then step back `weeks_back` whole weeks
fn find_last_weekday(today: NaiveDate, target_day: Weekday, weeks_back: u32) -> Result<NaiveDate> {
    let today_num = today.weekday().num_days_from_monday();
    let target_num = target_day.num_days_from_monday();

    let days_since = (today_num + 7 - target_num) % 7;
    days_before(today, days_since as u64 + weeks_back as u64 * 7)
}

/// Format a date the German way with leading zeros, e.g. "07.03.2024"
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
