use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::IntoResponse;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub due_date: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Todo>>>;

/// Shared server state. Tests keep a clone to seed todos and to arm the
/// failure switch while the router serves requests.
#[derive(Clone, Default)]
pub struct AppState {
    db: Db,
    fail_remaining: Arc<AtomicUsize>,
    garble_remaining: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` list requests answer HTTP 500, then recover.
    pub fn fail_next(&self, n: usize) {
        self.fail_remaining.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` list requests answer 200 with a body that is not a
    /// todo array.
    pub fn garble_next(&self, n: usize) {
        self.garble_remaining.store(n, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        take(&self.fail_remaining)
    }

    fn take_garble(&self) -> bool {
        take(&self.garble_remaining)
    }

    /// Insert a todo directly, bypassing HTTP.
    pub async fn seed(&self, todo: Todo) {
        self.db.write().await.insert(todo.id, todo);
    }
}

pub fn app() -> Router {
    app_with(AppState::new())
}

pub fn app_with(state: AppState) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, AppState::new()).await
}

pub async fn run_with(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

fn take(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

async fn list_todos(State(state): State<AppState>) -> axum::response::Response {
    if state.take_failure() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if state.take_garble() {
        return Json(serde_json::json!({"todos": "not an array"})).into_response();
    }
    let todos = state.db.read().await;
    Json(todos.values().cloned().collect::<Vec<_>>()).into_response()
}

async fn create_todo(
    State(state): State<AppState>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let todo = Todo {
        id: Uuid::new_v4(),
        title: input.title,
        completed: input.completed,
        due_date: input.due_date,
    };
    state.db.write().await.insert(todo.id, todo.clone());
    (StatusCode::CREATED, Json(todo))
}
