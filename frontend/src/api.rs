use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use serde::de::DeserializeOwned;
use shared::{CreateTodoRequest, Todo, TodoId, UpdateTodoRequest};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// Transport to the remote todo store.
///
/// Every call is one request. Implementations report failures; they never
/// touch list state.
#[allow(async_fn_in_trait)]
pub trait TodoApi {
    async fn list(&self) -> Result<Vec<Todo>>;
    async fn create(&self, request: &CreateTodoRequest) -> Result<Todo>;
    async fn update(&self, id: &TodoId, request: &UpdateTodoRequest) -> Result<Todo>;
    async fn delete(&self, id: &TodoId) -> Result<()>;
}

/// Browser `fetch` transport.
#[derive(Debug, Clone)]
pub struct FetchApi {
    config: ApiConfig,
}

impl FetchApi {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }
}

impl TodoApi for FetchApi {
    async fn list(&self) -> Result<Vec<Todo>> {
        let text = send("GET", &self.config.todos_url(), None).await?;
        decode(&text)
    }

    async fn create(&self, request: &CreateTodoRequest) -> Result<Todo> {
        let body = serde_json::to_string(request)?;
        let text = send("POST", &self.config.todos_url(), Some(body)).await?;
        decode(&text)
    }

    async fn update(&self, id: &TodoId, request: &UpdateTodoRequest) -> Result<Todo> {
        let body = serde_json::to_string(request)?;
        tracing::debug!(%id, %body, "PATCH todo");
        let text = send("PATCH", &self.config.todo_url(id.as_str()), Some(body)).await?;
        decode(&text)
    }

    async fn delete(&self, id: &TodoId) -> Result<()> {
        send("DELETE", &self.config.todo_url(id.as_str()), None).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}

fn js_error(context: &str, value: JsValue) -> ApiError {
    match value.as_string() {
        Some(detail) => ApiError::Network(format!("{context}: {detail}")),
        None => ApiError::Network(format!("{context}: {value:?}")),
    }
}

/// Issue one request and return the response body of a 2xx reply.
async fn send(method: &str, url: &str, body: Option<String>) -> Result<String> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| js_error("failed to create request", e))?;

    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| js_error("failed to set header", e))?;
    }

    let window =
        web_sys::window().ok_or_else(|| ApiError::Network("no window available".into()))?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| js_error("failed to send request", e))?
        .into();

    if !response.ok() {
        return Err(ApiError::from_status(response.status()));
    }

    let text_promise = response
        .text()
        .map_err(|e| js_error("failed to read response", e))?;
    JsFuture::from(text_promise)
        .await
        .map_err(|e| js_error("failed to get text", e))?
        .as_string()
        .ok_or_else(|| ApiError::Network("response body is not text".into()))
}
