//! Render pipeline: fetch results to per-instance display rows.
//!
//! # Design
//! Rendering is pure over the provider's snapshot and a caller-supplied
//! "now"; nothing here touches the host or the network. The host pushes
//! `Populated` rows into its list surface; when that surface rejects them,
//! the update pipeline falls back to `fallback_text`, a single multi-line
//! block with the same content.

use std::cmp::Ordering;
use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, trace, warn};

use crate::policy::parse_due_date;
use crate::types::{FetchResult, Todo, WidgetInstanceId};

/// Shown when the week window holds nothing.
pub const EMPTY_MESSAGE: &str = "no tasks this week";

/// Derived, ephemeral display state for one widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    /// No snapshot yet (refresh in flight, no prior value).
    Loading,
    /// Ordered display rows, already truncated.
    Populated(Vec<DisplayRow>),
    Empty(String),
    Error(String),
}

/// One list row: bullet-prefixed title plus an optional due-date line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// Item id, for the host's tap-to-intent binding.
    pub id: String,
    pub text: String,
    pub due: Option<DueLine>,
}

/// Secondary line under a row, preformatted in local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueLine {
    /// "May 29, 2024"
    pub date_text: String,
    /// "3:30 PM"
    pub time_text: String,
    /// "Wed, May 29" (used by the plain-text fallback)
    pub day_text: String,
    pub color: DueColor,
}

/// Urgency tag relative to the local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueColor {
    /// Strictly before the start of today.
    Red,
    /// Falls within today.
    Orange,
    /// After today.
    Blue,
}

/// Build the render state for one widget instance from the current snapshot.
/// Items are expected in provider sort order; only the first `max_rows`
/// survive.
pub fn render<Tz>(
    instance: WidgetInstanceId,
    result: Option<&FetchResult>,
    now: &DateTime<Tz>,
    max_rows: usize,
) -> RenderState
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    trace!(instance, "rendering widget instance");
    match result {
        None => RenderState::Loading,
        Some(Err(error)) => RenderState::Error(error.to_string()),
        Some(Ok(todos)) if todos.is_empty() => RenderState::Empty(EMPTY_MESSAGE.to_string()),
        Some(Ok(todos)) => {
            if todos.len() > max_rows {
                debug!(instance, shown = max_rows, total = todos.len(), "truncating todo list");
            }
            let rows = todos
                .iter()
                .take(max_rows)
                .map(|todo| display_row(todo, now))
                .collect();
            RenderState::Populated(rows)
        }
    }
}

/// Degraded representation: the same rows as one multi-line text block.
pub fn fallback_text(rows: &[DisplayRow]) -> String {
    rows.iter()
        .map(|row| match &row.due {
            Some(due) => format!("{} ({})", row.text, due.day_text),
            None => row.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_row<Tz>(todo: &Todo, now: &DateTime<Tz>) -> DisplayRow
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let due = todo.due_date.as_deref().and_then(|raw| match parse_due_date(raw) {
        Some(due) => Some(due_line(due, now)),
        None => {
            warn!(title = %todo.title, raw, "skipping due-date line for unparsable date");
            None
        }
    });
    DisplayRow {
        id: todo.id.clone(),
        text: format!("\u{2022} {}", todo.title),
        due,
    }
}

fn due_line<Tz>(due: DateTime<Utc>, now: &DateTime<Tz>) -> DueLine
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let due_local = due.with_timezone(&now.timezone());
    let color = match due_local.date_naive().cmp(&now.date_naive()) {
        Ordering::Less => DueColor::Red,
        Ordering::Equal => DueColor::Orange,
        Ordering::Greater => DueColor::Blue,
    };
    DueLine {
        date_text: due_local.format("%b %-d, %Y").to_string(),
        time_text: due_local.format("%-I:%M %p").to_string(),
        day_text: due_local.format("%a, %b %-d").to_string(),
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 28, 12, 0, 0).unwrap()
    }

    fn todo(id: &str, title: &str, due_date: Option<&str>) -> Todo {
        Todo {
            id: id.to_string(),
            title: title.to_string(),
            completed: false,
            due_date: due_date.map(str::to_string),
        }
    }

    #[test]
    fn absent_result_renders_loading() {
        assert_eq!(render(1, None, &now(), 10), RenderState::Loading);
    }

    #[test]
    fn empty_list_renders_empty_message() {
        let result: FetchResult = Ok(Vec::new());
        assert_eq!(
            render(1, Some(&result), &now(), 10),
            RenderState::Empty("no tasks this week".to_string())
        );
    }

    #[test]
    fn failure_renders_error_message() {
        let result: FetchResult = Err(FetchError::Timeout);
        assert_eq!(
            render(1, Some(&result), &now(), 10),
            RenderState::Error("request timed out".to_string())
        );
    }

    #[test]
    fn rows_carry_bullet_title_and_formatted_due_line() {
        let result: FetchResult = Ok(vec![todo("7", "Pay rent", Some("2024-05-29T15:30:00Z"))]);
        let RenderState::Populated(rows) = render(1, Some(&result), &now(), 10) else {
            panic!("expected populated state");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "7");
        assert_eq!(rows[0].text, "\u{2022} Pay rent");
        let due = rows[0].due.as_ref().unwrap();
        assert_eq!(due.date_text, "May 29, 2024");
        assert_eq!(due.time_text, "3:30 PM");
        assert_eq!(due.day_text, "Wed, May 29");
        assert_eq!(due.color, DueColor::Blue);
    }

    #[test]
    fn color_classification_around_today() {
        let cases = [
            ("2024-05-27T23:00:00Z", DueColor::Red),
            ("2024-05-28T00:00:00Z", DueColor::Orange),
            ("2024-05-28T23:59:00Z", DueColor::Orange),
            ("2024-05-29T00:00:00Z", DueColor::Blue),
        ];
        for (raw, expected) in cases {
            let result: FetchResult = Ok(vec![todo("1", "t", Some(raw))]);
            let RenderState::Populated(rows) = render(1, Some(&result), &now(), 10) else {
                panic!("expected populated state");
            };
            assert_eq!(rows[0].due.as_ref().unwrap().color, expected, "due {raw}");
        }
    }

    #[test]
    fn unparsable_due_date_renders_title_only() {
        let result: FetchResult = Ok(vec![todo("1", "Odd", Some("not-a-date"))]);
        let RenderState::Populated(rows) = render(1, Some(&result), &now(), 10) else {
            panic!("expected populated state");
        };
        assert!(rows[0].due.is_none());
        assert_eq!(rows[0].text, "\u{2022} Odd");
    }

    #[test]
    fn truncates_to_max_rows_in_given_order() {
        let todos: Vec<Todo> = (0..12)
            .map(|i| todo(&i.to_string(), &format!("Task {i:02}"), Some("2024-05-29T10:00:00Z")))
            .collect();
        let result: FetchResult = Ok(todos);
        let RenderState::Populated(rows) = render(1, Some(&result), &now(), 10) else {
            panic!("expected populated state");
        };
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].text, "\u{2022} Task 00");
        assert_eq!(rows[9].text, "\u{2022} Task 09");
    }

    #[test]
    fn fallback_text_joins_rows_with_day_dates() {
        let result: FetchResult = Ok(vec![
            todo("1", "Pay rent", Some("2024-05-29T15:30:00Z")),
            todo("2", "Odd", Some("not-a-date")),
        ]);
        let RenderState::Populated(rows) = render(1, Some(&result), &now(), 10) else {
            panic!("expected populated state");
        };
        assert_eq!(
            fallback_text(&rows),
            "\u{2022} Pay rent (Wed, May 29)\n\u{2022} Odd"
        );
    }
}
