//! "remind me to <task> at <time>" parsing.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b").expect("valid time regex")
});

static TASK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"remind\s+me\s+to\s+(.+?)(?:\s+at\s+[\d:]+|\s*$)").expect("valid task regex")
});

/// Outcome of parsing a reminder request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderRequest {
    /// Task and a concrete, strictly-future time.
    Complete { task: String, at: NaiveDateTime },
    /// A task but no usable time.
    MissingTime { task: String },
    /// No "remind me to <task>" phrase.
    MissingTask,
}

/// Parse `text` relative to `now`. A time-of-day not after `now` rolls
/// forward exactly one day.
pub fn parse(text: &str, now: NaiveDateTime) -> ReminderRequest {
    let Some(task) = TASK
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
    else {
        return ReminderRequest::MissingTask;
    };

    match TIME.captures(text).and_then(|c| {
        let hour: u32 = c.get(1)?.as_str().parse().ok()?;
        let minute: u32 = c.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
        time_of_day(hour, minute, c.get(3).map(|m| m.as_str()))
    }) {
        Some(time) => {
            let mut at = now.date().and_time(time);
            if at <= now {
                at += Duration::days(1);
            }
            ReminderRequest::Complete { task, at }
        }
        None => ReminderRequest::MissingTime { task },
    }
}

/// 12-hour clock with optional meridiem; `None` if out of range.
fn time_of_day(mut hour: u32, minute: u32, meridiem: Option<&str>) -> Option<NaiveTime> {
    match meridiem {
        Some("pm") if hour < 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}
