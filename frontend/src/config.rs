use crate::error::{ApiError, Result};

/// Base address of the todo store, baked in at build time.
const API_URL: Option<&str> = option_env!("TODO_API_URL");

/// Where the todo store lives. Resolved once at startup and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// An empty base means same-origin relative requests.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !base_url.is_empty()
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            return Err(ApiError::Config(format!(
                "base url must start with http:// or https://, got '{base_url}'"
            )));
        }
        Ok(Self {
            base_url: base_url.to_string(),
        })
    }

    /// Configuration from `TODO_API_URL`, falling back to same-origin.
    pub fn from_build_env() -> Self {
        match API_URL.map(Self::new) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "ignoring TODO_API_URL, using same origin");
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn todos_url(&self) -> String {
        format!("{}/api/todos", self.base_url)
    }

    pub fn todo_url(&self, id: &str) -> String {
        format!("{}/api/todos/{}", self.base_url, id)
    }
}
