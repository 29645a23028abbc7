use crate::api::TodoApi;
use crate::state::{Change, UpdateKind};
use shared::{CreateTodoRequest, TodoId, UpdateTodoRequest};

/// Runs todo operations against the store and turns confirmed results into
/// [`Change`]s.
///
/// Failures stop here: they are logged and reported as `None`, so the list
/// stays as it was before the operation.
#[derive(Debug, Clone)]
pub struct TaskClient<A> {
    api: A,
}

impl<A: TodoApi> TaskClient<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    #[cfg(test)]
    pub(crate) fn api(&self) -> &A {
        &self.api
    }

    pub async fn fetch_all(&self) -> Option<Change> {
        match self.api.list().await {
            Ok(todos) => Some(Change::Loaded(todos)),
            Err(e) => {
                tracing::warn!(error = %e, "error fetching todos");
                None
            }
        }
    }

    /// `text` must already be trimmed and non-empty.
    pub async fn create(&self, text: String) -> Option<Change> {
        match self.api.create(&CreateTodoRequest { text }).await {
            Ok(todo) => {
                tracing::debug!(id = %todo.id, "todo created");
                Some(Change::Created(todo))
            }
            Err(e) => {
                tracing::warn!(error = %e, "error adding todo");
                None
            }
        }
    }

    pub async fn set_completed(&self, id: TodoId, completed: bool) -> Option<Change> {
        self.update(id, UpdateTodoRequest::completed(completed), UpdateKind::Toggle)
            .await
    }

    pub async fn save_text(&self, id: TodoId, text: String) -> Option<Change> {
        self.update(id, UpdateTodoRequest::text(text), UpdateKind::Edit)
            .await
    }

    async fn update(
        &self,
        id: TodoId,
        request: UpdateTodoRequest,
        kind: UpdateKind,
    ) -> Option<Change> {
        match self.api.update(&id, &request).await {
            Ok(todo) => Some(Change::Updated { todo, kind }),
            Err(e) if e.is_not_found() => {
                tracing::warn!(%id, ?kind, "todo no longer exists in store");
                None
            }
            Err(e) => {
                tracing::warn!(%id, ?kind, error = %e, "error updating todo");
                None
            }
        }
    }

    pub async fn delete(&self, id: TodoId) -> Option<Change> {
        match self.api.delete(&id).await {
            Ok(()) => Some(Change::Deleted(id)),
            Err(e) => {
                tracing::warn!(%id, error = %e, "error deleting todo");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use crate::api::TodoApi;
    use crate::error::{ApiError, Result};
    use shared::{CreateTodoRequest, Todo, TodoId, UpdateTodoRequest};
    use std::cell::{Cell, RefCell};

    /// In-memory store that records every request it receives.
    #[derive(Debug, Default)]
    pub struct FakeApi {
        pub todos: RefCell<Vec<Todo>>,
        pub calls: RefCell<Vec<String>>,
        pub offline: Cell<bool>,
        next_id: Cell<u32>,
    }

    impl FakeApi {
        pub fn with_todos(todos: Vec<Todo>) -> Self {
            let api = Self::default();
            *api.todos.borrow_mut() = todos;
            api
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }

        fn record(&self, call: String) -> Result<()> {
            self.calls.borrow_mut().push(call);
            if self.offline.get() {
                return Err(ApiError::Network("connection refused".into()));
            }
            Ok(())
        }
    }

    impl TodoApi for FakeApi {
        async fn list(&self) -> Result<Vec<Todo>> {
            self.record("GET /api/todos".into())?;
            Ok(self.todos.borrow().clone())
        }

        async fn create(&self, request: &CreateTodoRequest) -> Result<Todo> {
            self.record(format!("POST /api/todos {}", request.text))?;
            let id = self.next_id.get() + 100;
            self.next_id.set(self.next_id.get() + 1);
            let todo = Todo::new(id.to_string(), request.text.clone());
            self.todos.borrow_mut().push(todo.clone());
            Ok(todo)
        }

        async fn update(&self, id: &TodoId, request: &UpdateTodoRequest) -> Result<Todo> {
            self.record(format!("PATCH /api/todos/{id}"))?;
            let mut todos = self.todos.borrow_mut();
            let todo = todos
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or(ApiError::NotFound)?;
            if let Some(text) = &request.text {
                todo.text = text.clone();
            }
            if let Some(completed) = request.completed {
                todo.completed = completed;
            }
            Ok(todo.clone())
        }

        async fn delete(&self, id: &TodoId) -> Result<()> {
            self.record(format!("DELETE /api/todos/{id}"))?;
            let mut todos = self.todos.borrow_mut();
            let before = todos.len();
            todos.retain(|t| &t.id != id);
            if todos.len() == before {
                return Err(ApiError::NotFound);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeApi;
    use super::*;
    use crate::state::{EditSession, TodoList};
    use shared::Todo;

    fn todo(id: &str, text: &str, completed: bool) -> Todo {
        Todo {
            id: TodoId::from(id),
            text: text.to_string(),
            completed,
        }
    }

    async fn loaded_list(client: &TaskClient<FakeApi>) -> TodoList {
        let mut list = TodoList::new();
        if let Some(change) = client.fetch_all().await {
            list.apply(change);
        }
        list
    }

    #[tokio::test]
    async fn toggle_edit_delete_scenario() {
        let client = TaskClient::new(FakeApi::with_todos(vec![todo("1", "buy milk", false)]));
        let mut list = loaded_list(&client).await;
        let id = TodoId::from("1");

        let completed = list.toggle_target(&id).unwrap();
        list.apply(client.set_completed(id.clone(), completed).await.unwrap());
        assert_eq!(list.todos(), &[todo("1", "buy milk", true)]);

        list.apply(Change::StartEdit(list.get(&id).cloned().unwrap()));
        list.apply(Change::EditDraft("buy oat milk".into()));
        let draft = list.pending_save(&id).unwrap();
        list.apply(client.save_text(id.clone(), draft).await.unwrap());
        assert_eq!(list.todos(), &[todo("1", "buy oat milk", true)]);
        assert_eq!(list.edit_session(), &EditSession::Idle);

        list.apply(client.delete(id).await.unwrap());
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_leaves_list_empty() {
        let api = FakeApi::with_todos(vec![todo("1", "a", false)]);
        api.offline.set(true);
        let client = TaskClient::new(api);

        assert_eq!(client.fetch_all().await, None);
        assert!(loaded_list(&client).await.is_empty());
    }

    #[tokio::test]
    async fn failed_create_keeps_input_for_retry() {
        let client = TaskClient::new(FakeApi::default());
        let mut list = TodoList::new();
        list.apply(Change::NewTodoText("walk dog".into()));

        client.api().offline.set(true);
        let text = list.pending_submission().unwrap();
        assert_eq!(client.create(text).await, None);
        assert!(list.is_empty());
        assert_eq!(list.new_text(), "walk dog");

        client.api().offline.set(false);
        let text = list.pending_submission().unwrap();
        list.apply(client.create(text).await.unwrap());
        assert_eq!(list.todos().len(), 1);
        assert_eq!(list.todos()[0].text, "walk dog");
        assert!(!list.todos()[0].completed);
        assert_eq!(list.new_text(), "");
    }

    #[tokio::test]
    async fn create_sends_trimmed_text() {
        let client = TaskClient::new(FakeApi::default());
        let mut list = TodoList::new();
        list.apply(Change::NewTodoText("  buy milk  ".into()));

        let text = list.pending_submission().unwrap();
        client.create(text).await.unwrap();

        assert_eq!(client.api().calls.borrow().as_slice(), ["POST /api/todos buy milk"]);
    }

    #[tokio::test]
    async fn blank_input_issues_no_request() {
        let client = TaskClient::new(FakeApi::default());
        let mut list = TodoList::new();
        list.apply(Change::NewTodoText("   ".into()));

        if let Some(text) = list.pending_submission() {
            client.create(text).await;
        }

        assert_eq!(client.api().call_count(), 0);
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn toggle_of_absent_todo_issues_no_request() {
        let client = TaskClient::new(FakeApi::default());
        let list = loaded_list(&client).await;
        let calls_after_load = client.api().call_count();

        let missing = TodoId::from("nope");
        if let Some(completed) = list.toggle_target(&missing) {
            client.set_completed(missing, completed).await;
        }

        assert_eq!(client.api().call_count(), calls_after_load);
    }

    #[tokio::test]
    async fn failed_delete_keeps_todo() {
        let client = TaskClient::new(FakeApi::with_todos(vec![todo("1", "a", false)]));
        let mut list = loaded_list(&client).await;

        client.api().offline.set(true);
        if let Some(change) = client.delete(TodoId::from("1")).await {
            list.apply(change);
        }

        assert_eq!(list.todos(), &[todo("1", "a", false)]);
    }

    #[tokio::test]
    async fn not_found_update_is_swallowed() {
        let client = TaskClient::new(FakeApi::with_todos(vec![todo("1", "a", false)]));
        let mut list = loaded_list(&client).await;
        client.api().todos.borrow_mut().clear();

        assert_eq!(client.set_completed(TodoId::from("1"), true).await, None);
        assert_eq!(client.delete(TodoId::from("1")).await, None);
        if let Some(change) = client.save_text(TodoId::from("1"), "b".into()).await {
            list.apply(change);
        }

        assert_eq!(list.todos(), &[todo("1", "a", false)]);
    }

    #[tokio::test]
    async fn failed_save_keeps_edit_session_open() {
        let client = TaskClient::new(FakeApi::with_todos(vec![todo("1", "a", false)]));
        let mut list = loaded_list(&client).await;
        let id = TodoId::from("1");
        list.apply(Change::StartEdit(todo("1", "a", false)));
        list.apply(Change::EditDraft("b".into()));

        client.api().offline.set(true);
        let draft = list.pending_save(&id).unwrap();
        if let Some(change) = client.save_text(id.clone(), draft).await {
            list.apply(change);
        }

        assert_eq!(list.edit_session().draft(), Some("b"));
        assert_eq!(list.todos()[0].text, "a");
    }

    #[tokio::test]
    async fn update_result_comes_from_store() {
        // The store holds a newer text than the local copy; the response wins.
        let client = TaskClient::new(FakeApi::with_todos(vec![todo("1", "server text", false)]));
        let mut list = TodoList::new();
        list.apply(Change::Loaded(vec![todo("1", "stale text", false)]));

        let id = TodoId::from("1");
        let completed = list.toggle_target(&id).unwrap();
        list.apply(client.set_completed(id, completed).await.unwrap());

        assert_eq!(list.todos(), &[todo("1", "server text", true)]);
    }
}
