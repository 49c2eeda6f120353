//! Domain DTOs for the widget core.
//!
//! # Design
//! `Todo` mirrors the wire schema of `GET /api/todos` but is defined
//! independently from the mock-server crate. Integration tests catch any
//! schema drift between the two. Items are immutable values: constructed by
//! deserializing a network payload, discarded at the end of a refresh cycle.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// One placed copy of the widget on the host shell.
pub type WidgetInstanceId = i32;

/// The provider's single current success-or-failure snapshot of remote data.
pub type FetchResult = Result<Vec<Todo>, FetchError>;

/// A single todo item returned by the remote endpoint.
///
/// `due_date`, when present, is an ISO-8601 UTC timestamp with second or
/// millisecond precision (`yyyy-MM-ddTHH:mm:ss[.SSS]Z`). It stays a raw
/// string here; parsing happens in the selection policy so that a malformed
/// date never fails a whole payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_deserializes_with_due_date() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":"1","title":"Water plants","completed":false,"due_date":"2024-06-03T09:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(todo.id, "1");
        assert_eq!(todo.due_date.as_deref(), Some("2024-06-03T09:00:00Z"));
    }

    #[test]
    fn todo_deserializes_with_null_due_date() {
        let todo: Todo =
            serde_json::from_str(r#"{"id":"2","title":"Someday","completed":false,"due_date":null}"#)
                .unwrap();
        assert!(todo.due_date.is_none());
    }

    #[test]
    fn todo_deserializes_with_absent_due_date() {
        let todo: Todo =
            serde_json::from_str(r#"{"id":"3","title":"No date field","completed":true}"#).unwrap();
        assert!(todo.due_date.is_none());
        assert!(todo.completed);
    }

    #[test]
    fn todo_roundtrips_through_json() {
        let todo = Todo {
            id: "abc".to_string(),
            title: "Roundtrip".to_string(),
            completed: false,
            due_date: Some("2024-06-03T09:00:00.250Z".to_string()),
        };
        let json = serde_json::to_string(&todo).unwrap();
        let back: Todo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, todo);
    }

    #[test]
    fn todo_rejects_missing_title() {
        let result: Result<Todo, _> = serde_json::from_str(r#"{"id":"4","completed":false}"#);
        assert!(result.is_err());
    }
}
