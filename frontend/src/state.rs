//! Local list state: the ordered todo cache, the single edit slot and the
//! new-todo input buffer.
//!
//! Every mutation goes through [`TodoList::apply`]. Changes that come from
//! the store are only ever applied after the store confirmed them.

use shared::{Todo, TodoId};

/// The one shared edit slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing { id: TodoId, draft: String },
}

impl EditSession {
    pub fn editing_id(&self) -> Option<&TodoId> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing { id, .. } => Some(id),
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing { draft, .. } => Some(draft),
        }
    }
}

/// Why a todo was updated. An edit-save closes the edit session, a toggle
/// leaves it alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Toggle,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Full reload from the store.
    Loaded(Vec<Todo>),
    Created(Todo),
    /// Toggled or edited todo as returned by the store.
    Updated { todo: Todo, kind: UpdateKind },
    Deleted(TodoId),
    StartEdit(Todo),
    EditDraft(String),
    CancelEdit,
    NewTodoText(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    todos: Vec<Todo>,
    edit: EditSession,
    new_text: String,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    pub fn new_text(&self) -> &str {
        &self.new_text
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    pub fn is_editing(&self, id: &TodoId) -> bool {
        self.edit.editing_id() == Some(id)
    }

    /// The `completed` value a toggle of `id` should send, or `None` when the
    /// todo is not in the list and no request may be issued.
    pub fn toggle_target(&self, id: &TodoId) -> Option<bool> {
        self.get(id).map(|todo| !todo.completed)
    }

    /// Trimmed new-todo text, or `None` when there is nothing to submit.
    pub fn pending_submission(&self) -> Option<String> {
        non_blank(&self.new_text)
    }

    /// Trimmed draft for `id`, or `None` if `id` is not the todo being
    /// edited or the draft is blank.
    pub fn pending_save(&self, id: &TodoId) -> Option<String> {
        match &self.edit {
            EditSession::Editing { id: editing, draft } if editing == id => non_blank(draft),
            _ => None,
        }
    }

    pub fn apply(&mut self, change: Change) {
        match change {
            Change::Loaded(todos) => {
                tracing::info!(count = todos.len(), "todos loaded");
                self.todos = todos;
            }
            Change::Created(todo) => {
                // Ids are unique; a repeated create response replaces in place.
                match self.todos.iter_mut().find(|t| t.id == todo.id) {
                    Some(existing) => *existing = todo,
                    None => self.todos.push(todo),
                }
                self.new_text.clear();
            }
            Change::Updated { todo, kind } => {
                if kind == UpdateKind::Edit && self.is_editing(&todo.id) {
                    self.edit = EditSession::Idle;
                }
                match self.todos.iter_mut().find(|t| t.id == todo.id) {
                    Some(existing) => *existing = todo,
                    None => tracing::debug!(id = %todo.id, "update for todo no longer in list"),
                }
            }
            Change::Deleted(id) => {
                self.todos.retain(|todo| todo.id != id);
            }
            Change::StartEdit(todo) => {
                self.edit = EditSession::Editing {
                    id: todo.id,
                    draft: todo.text,
                };
            }
            Change::EditDraft(text) => {
                if let EditSession::Editing { draft, .. } = &mut self.edit {
                    *draft = text;
                }
            }
            Change::CancelEdit => {
                self.edit = EditSession::Idle;
            }
            Change::NewTodoText(text) => {
                self.new_text = text;
            }
        }
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
