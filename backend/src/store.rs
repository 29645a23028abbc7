use crate::error::{Result, StoreError};
use async_trait::async_trait;
use shared::{Todo, TodoId, UpdateTodoRequest};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Persistence for todos. Listing returns todos in creation order.
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Todo>>;
    async fn create(&self, text: String) -> Result<Todo>;
    async fn update(&self, id: &TodoId, changes: UpdateTodoRequest) -> Result<Todo>;
    async fn delete(&self, id: &TodoId) -> Result<()>;
}

fn checked_text(text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StoreError::InvalidText);
    }
    Ok(text.to_string())
}

/// Build a fresh todo with a new id.
pub fn new_todo(text: &str) -> Result<Todo> {
    Ok(Todo::new(Uuid::new_v4().to_string(), checked_text(text)?))
}

/// Apply a partial update. Nothing is changed if the new text is blank.
pub fn apply_changes(todo: &mut Todo, changes: UpdateTodoRequest) -> Result<()> {
    let text = changes.text.as_deref().map(checked_text).transpose()?;
    if let Some(text) = text {
        todo.text = text;
    }
    if let Some(completed) = changes.completed {
        todo.completed = completed;
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        Ok(self.todos.read().await.clone())
    }

    async fn create(&self, text: String) -> Result<Todo> {
        let todo = new_todo(&text)?;
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &TodoId, changes: UpdateTodoRequest) -> Result<Todo> {
        let mut todos = self.todos.write().await;
        let todo = todos
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or(StoreError::NotFound)?;
        apply_changes(todo, changes)?;
        Ok(todo.clone())
    }

    async fn delete(&self, id: &TodoId) -> Result<()> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| &t.id != id);
        if todos.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
