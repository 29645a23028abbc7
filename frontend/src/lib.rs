use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{Todo, TodoId};

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;

use api::FetchApi;
use client::TaskClient;
use config::ApiConfig;
use state::{Change, TodoList};

#[derive(Debug, Clone)]
pub enum Msg {
    LoadTodos,
    /// A change confirmed by the store, or a purely local one.
    Apply(Change),
    /// An operation failed and was already logged; nothing to apply.
    Unchanged,
    SetNewText(String),
    Submit,
    Toggle(TodoId),
    StartEdit(TodoId),
    SetDraft(String),
    SaveEdit(TodoId),
    CancelEdit,
    Delete(TodoId),
}

#[derive(Debug, Clone)]
pub struct Model {
    list: TodoList,
    client: TaskClient<FetchApi>,
}

impl Model {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            list: TodoList::new(),
            client: TaskClient::new(FetchApi::new(config)),
        }
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }
}

fn settle(change: Option<Change>) -> Msg {
    change.map(Msg::Apply).unwrap_or(Msg::Unchanged)
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::LoadTodos })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::LoadTodos => {
                let client = self.client.clone();
                Cmd::new(async move { settle(client.fetch_all().await) })
            }
            Msg::Apply(change) => {
                self.list.apply(change);
                Cmd::none()
            }
            Msg::Unchanged => Cmd::none(),
            Msg::SetNewText(value) => {
                self.list.apply(Change::NewTodoText(value));
                Cmd::none()
            }
            Msg::Submit => {
                let Some(todo_text) = self.list.pending_submission() else {
                    return Cmd::none();
                };
                let client = self.client.clone();
                Cmd::new(async move { settle(client.create(todo_text).await) })
            }
            Msg::Toggle(todo_id) => {
                let Some(completed) = self.list.toggle_target(&todo_id) else {
                    tracing::debug!(id = %todo_id, "toggle for todo not in list");
                    return Cmd::none();
                };
                let client = self.client.clone();
                Cmd::new(async move { settle(client.set_completed(todo_id, completed).await) })
            }
            Msg::StartEdit(todo_id) => {
                if let Some(todo) = self.list.get(&todo_id).cloned() {
                    self.list.apply(Change::StartEdit(todo));
                }
                Cmd::none()
            }
            Msg::SetDraft(draft) => {
                self.list.apply(Change::EditDraft(draft));
                Cmd::none()
            }
            Msg::SaveEdit(todo_id) => {
                let Some(draft) = self.list.pending_save(&todo_id) else {
                    return Cmd::none();
                };
                let client = self.client.clone();
                Cmd::new(async move { settle(client.save_text(todo_id, draft).await) })
            }
            Msg::CancelEdit => {
                self.list.apply(Change::CancelEdit);
                Cmd::none()
            }
            Msg::Delete(todo_id) => {
                let client = self.client.clone();
                Cmd::new(async move { settle(client.delete(todo_id).await) })
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        div(
            [class("min-h-screen bg-ctp-base text-ctp-text flex items-center justify-center p-4")],
            [div(
                [class("bg-ctp-mantle rounded-2xl shadow-xl w-full max-w-lg p-6 border border-ctp-surface0")],
                [
                    h1([class("text-3xl font-bold text-ctp-text mb-8 text-center")], [text("Task Manager")]),
                    self.view_create_form(),
                    div([class("mt-6")], [self.view_todo_list()]),
                ],
            )],
        )
    }
}

impl Model {
    fn view_create_form(&self) -> Node<Msg> {
        div(
            [class("flex items-center gap-3 bg-ctp-surface0 border border-ctp-surface2 p-2 rounded-lg")],
            [
                input([
                    r#type("text"),
                    placeholder("What needs to be done?"),
                    value(self.list.new_text().to_string()),
                    on_input(|event| Msg::SetNewText(event.value())),
                    class("flex-1 px-3 py-2 bg-transparent text-ctp-text placeholder-ctp-subtext0 focus:outline-none"),
                ], []),
                button([
                    on_click(|_| Msg::Submit),
                    class("bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-semibold px-4 py-2 rounded-lg transition-colors duration-200"),
                ], [text("Add Task")]),
            ],
        )
    }

    fn view_todo_list(&self) -> Node<Msg> {
        if self.list.is_empty() {
            return div([class("text-center text-ctp-overlay0 py-10")], [
                span([], [text("No tasks yet. Add your first task!")]),
            ]);
        }
        div(
            [class("flex flex-col gap-3")],
            self.list.todos().iter().map(|todo| self.view_todo(todo)).collect::<Vec<_>>(),
        )
    }

    fn view_todo(&self, todo: &Todo) -> Node<Msg> {
        let draft = self
            .list
            .edit_session()
            .draft()
            .filter(|_| self.list.is_editing(&todo.id));

        div(
            [key(todo.id.to_string())],
            [match draft {
                Some(draft) => self.view_edit_row(todo, draft),
                None => self.view_todo_row(todo),
            }],
        )
    }

    fn view_edit_row(&self, todo: &Todo, draft: &str) -> Node<Msg> {
        div([class("flex items-center gap-3 bg-ctp-surface0 p-3 rounded-lg border border-ctp-blue")], [
            input([
                r#type("text"),
                value(draft.to_string()),
                on_input(|event| Msg::SetDraft(event.value())),
                class("flex-1 px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-lg text-ctp-text focus:outline-none"),
            ], []),
            button([
                on_click({
                    let captured_id = todo.id.clone();
                    move |_| Msg::SaveEdit(captured_id.clone())
                }),
                class("bg-ctp-green hover:bg-ctp-teal text-ctp-base px-3 py-2 rounded-lg"),
            ], [text("Save")]),
            button([
                on_click(|_| Msg::CancelEdit),
                class("bg-ctp-overlay0 hover:bg-ctp-overlay1 text-ctp-text px-3 py-2 rounded-lg"),
            ], [text("Cancel")]),
        ])
    }

    fn view_todo_row(&self, todo: &Todo) -> Node<Msg> {
        div([class("flex items-center justify-between bg-ctp-surface0 border border-ctp-surface1 rounded-lg px-4 py-3")], [
            div([class("flex items-center gap-3 min-w-0")], [
                // A button, not a native checkbox: the mark only moves once
                // the store has confirmed the toggle.
                button([
                    r#type("button"),
                    id(&format!("toggle-{}", todo.id)),
                    on_click({
                        let captured_id = todo.id.clone();
                        move |_| Msg::Toggle(captured_id.clone())
                    }),
                    class(&format!(
                        "h-7 w-7 flex-shrink-0 border-2 flex items-center justify-center rounded-full transition {}",
                        if todo.completed {
                            "bg-ctp-green border-ctp-green text-ctp-base"
                        } else {
                            "border-ctp-surface2 hover:border-ctp-blue"
                        }
                    )),
                ], [
                    if todo.completed {
                        text("✓")
                    } else {
                        span([], [])
                    }
                ]),
                span([class(&format!(
                    "truncate font-medium {}",
                    if todo.completed {
                        "line-through text-ctp-overlay1"
                    } else {
                        "text-ctp-text"
                    }
                ))], [text(&todo.text)]),
            ]),
            div([class("flex gap-1.5")], [
                button([
                    on_click({
                        let captured_id = todo.id.clone();
                        move |_| Msg::StartEdit(captured_id.clone())
                    }),
                    r#type("button"),
                    class("px-2 py-1 rounded-lg bg-ctp-blue/20 text-ctp-blue hover:bg-ctp-blue/30"),
                ], [text("Edit")]),
                button([
                    on_click({
                        let captured_id = todo.id.clone();
                        move |_| Msg::Delete(captured_id.clone())
                    }),
                    r#type("button"),
                    class("px-2 py-1 rounded-lg bg-ctp-red/20 text-ctp-red hover:bg-ctp-red/30"),
                ], [text("Delete")]),
            ]),
        ])
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    let config = ApiConfig::from_build_env();
    tracing::info!(base_url = config.base_url(), "starting todo client");
    Program::mount_to_body(Model::new(config));
}
