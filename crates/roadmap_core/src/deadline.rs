//! Deadline parsing and classification.
//!
//! # Responsibility
//! - Turn stored deadline text into a status category and a signed day count.
//! - Derive the per-task badge shown next to unchecked tasks.
//!
//! # Invariants
//! - Time-of-day is discarded before differencing; only calendar dates are
//!   compared, so a deadline of today is never reported as overdue.
//! - Malformed input never panics; it classifies as `DeadlineStatus::None`.

use crate::model::roadmap::Task;
use chrono::{DateTime, Local, NaiveDate};
use std::fmt::{Display, Formatter};

/// Storage format for deadlines written by this crate.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

const SOON_WINDOW_DAYS: i64 = 3;
const DISPLAY_FORMAT: &str = "%b %-d, %Y";

/// Deadline category relative to the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeadlineStatus {
    /// No deadline, or the stored text is not a date.
    None,
    /// Date is before today.
    Overdue,
    /// Date is today.
    Today,
    /// Date is one to three days ahead.
    Soon,
    /// Date is more than three days ahead. Carries no badge styling.
    Later,
}

/// Current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses stored deadline text into a calendar date.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps; the latter are converted to
/// the local date and their time-of-day dropped.
pub fn parse_deadline(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DEADLINE_FORMAT) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Local).date_naive())
}

/// Signed whole days from `today` until `deadline`.
///
/// Returns `None` when the deadline is absent or unparseable.
pub fn days_left_on(deadline: Option<&str>, today: NaiveDate) -> Option<i64> {
    let date = parse_deadline(deadline?)?;
    Some(date.signed_duration_since(today).num_days())
}

/// Classifies `deadline` against `today`.
pub fn classify_on(deadline: Option<&str>, today: NaiveDate) -> DeadlineStatus {
    match days_left_on(deadline, today) {
        None => DeadlineStatus::None,
        Some(days) if days < 0 => DeadlineStatus::Overdue,
        Some(0) => DeadlineStatus::Today,
        Some(days) if days <= SOON_WINDOW_DAYS => DeadlineStatus::Soon,
        Some(_) => DeadlineStatus::Later,
    }
}

/// Signed whole days until `deadline`, measured from the local date.
pub fn days_left(deadline: Option<&str>) -> Option<i64> {
    days_left_on(deadline, today())
}

/// Classifies `deadline` against the local date.
pub fn classify(deadline: Option<&str>) -> DeadlineStatus {
    classify_on(deadline, today())
}

/// Countdown badge for an unchecked task with a usable deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineBadge {
    /// Due in this many days (always positive).
    DaysLeft(i64),
    DueToday,
    /// Overdue by this many days (always positive).
    Overdue(i64),
}

impl Display for DeadlineBadge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DaysLeft(days) => write!(f, "{days} {} left", day_unit(*days)),
            Self::DueToday => f.write_str("Today"),
            Self::Overdue(days) => write!(f, "Overdue by {days} {}", day_unit(*days)),
        }
    }
}

/// Returns the badge for `task`, or `None` when it is checked or has no
/// parseable deadline.
pub fn deadline_badge(task: &Task, today: NaiveDate) -> Option<DeadlineBadge> {
    if task.checked {
        return None;
    }
    let badge = match days_left_on(task.deadline.as_deref(), today)? {
        days if days > 0 => DeadlineBadge::DaysLeft(days),
        0 => DeadlineBadge::DueToday,
        days => DeadlineBadge::Overdue(-days),
    };
    Some(badge)
}

/// Human-readable deadline, e.g. `Oct 18, 2026`.
///
/// Absent deadlines render as an empty string; unparseable text is shown
/// verbatim.
pub fn format_deadline(deadline: Option<&str>) -> String {
    let Some(raw) = deadline.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return String::new();
    };
    match parse_deadline(raw) {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

fn day_unit(days: i64) -> &'static str {
    if days == 1 {
        "day"
    } else {
        "days"
    }
}
