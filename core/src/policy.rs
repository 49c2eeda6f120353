//! Selection and ordering policy for fetched todos.
//!
//! # Design
//! Pure functions over `Todo` values so the week-window rules are testable
//! with a pinned "now." The provider feeds these with the wall clock; tests
//! feed them fixed instants. Due dates are parsed here, once, and a malformed
//! date is logged and treated exactly like an absent one.

use chrono::{DateTime, Datelike, Days, Duration, NaiveTime, TimeZone, Utc};
use tracing::{debug, warn};

use crate::types::Todo;

/// Sort position for items whose due date is present but unparsable: after
/// every real date, before items with no date at all.
const UNPARSABLE_SORT_KEY: i64 = i64::MAX - 1;
/// Sort position for items with no due date.
const DATELESS_SORT_KEY: i64 = i64::MAX;

/// Parse a wire due date (ISO-8601 UTC, second or millisecond precision).
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 23:59:59.999 of the upcoming Sunday relative to `now`, in `now`'s
/// calendar. When `now` already falls on a Sunday the window ends that same
/// day.
pub fn end_of_week<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let days_ahead = u64::from(6 - now.weekday().num_days_from_monday());
    let end_date = now.date_naive() + Days::new(days_ahead);
    let end = end_date.and_time(end_of_day());
    now.timezone()
        .from_local_datetime(&end)
        .latest()
        .unwrap_or_else(|| now.clone() + Duration::days(days_ahead as i64))
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("static wall-clock time")
}

/// Apply the selection policy: drop completed items, drop items without a
/// parsable due date, keep everything due up to and including the end of the
/// current calendar week. Past-due items are kept.
pub fn select_for_week<Tz: TimeZone>(todos: Vec<Todo>, now: &DateTime<Tz>) -> Vec<Todo> {
    let cutoff = end_of_week(now).with_timezone(&Utc);
    let total = todos.len();
    let kept: Vec<Todo> = todos
        .into_iter()
        .filter(|todo| {
            if todo.completed {
                return false;
            }
            let Some(raw) = todo.due_date.as_deref() else {
                debug!(title = %todo.title, "dropping todo without due date");
                return false;
            };
            match parse_due_date(raw) {
                Some(due) => due <= cutoff,
                None => {
                    warn!(title = %todo.title, raw, "dropping todo with unparsable due date");
                    false
                }
            }
        })
        .collect();
    debug!(total, kept = kept.len(), "applied week-window selection");
    kept
}

/// Order items ascending by due date, unparsable dates after every real
/// date, dateless items last, ties broken by ascending title so rendering is
/// deterministic.
pub fn sort_for_display(todos: &mut [Todo]) {
    todos.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)).then_with(|| a.title.cmp(&b.title)));
}

fn sort_key(todo: &Todo) -> i64 {
    match todo.due_date.as_deref() {
        Some(raw) => parse_due_date(raw)
            .map(|due| due.timestamp_millis())
            .unwrap_or(UNPARSABLE_SORT_KEY),
        None => DATELESS_SORT_KEY,
    }
}
