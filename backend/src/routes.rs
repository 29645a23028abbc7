use crate::error::Result;
use crate::store::TodoStore;
use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, patch},
    Router,
};
use serde_json::json;
use shared::{CreateTodoRequest, Todo, TodoId, UpdateTodoRequest};
use std::sync::Arc;

pub type SharedStore = Arc<dyn TodoStore>;

/// API routes for the todo collection.
pub fn api_router(store: SharedStore) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/:id", patch(update_todo).delete(delete_todo))
        .with_state(store)
}

async fn list_todos(State(store): State<SharedStore>) -> Result<Json<Vec<Todo>>> {
    Ok(Json(store.list().await?))
}

async fn create_todo(
    State(store): State<SharedStore>,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<Json<Todo>> {
    let todo = store.create(payload.text).await?;
    tracing::info!(id = %todo.id, "todo created");
    Ok(Json(todo))
}

async fn update_todo(
    Path(id): Path<TodoId>,
    State(store): State<SharedStore>,
    Json(payload): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>> {
    tracing::debug!(%id, ?payload, "updating todo");
    Ok(Json(store.update(&id, payload).await?))
}

async fn delete_todo(
    Path(id): Path<TodoId>,
    State(store): State<SharedStore>,
) -> Result<Json<serde_json::Value>> {
    store.delete(&id).await?;
    tracing::info!(%id, "todo deleted");
    Ok(Json(json!({"message": "Todo deleted successfully"})))
}
