use thiserror::Error;

/// Failures talking to the todo store.
///
/// Everything except `NotFound` is a network-level failure from the point of
/// view of the list: the change simply does not happen.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("store returned HTTP {status}")]
    Status { status: u16 },

    #[error("todo not found")]
    NotFound,

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Map a non-2xx status code onto the error taxonomy.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => ApiError::NotFound,
            status => ApiError::Status { status },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_status_maps_to_not_found() {
        assert!(ApiError::from_status(404).is_not_found());
    }

    #[test]
    fn other_statuses_keep_their_code() {
        match ApiError::from_status(503) {
            ApiError::Status { status } => assert_eq!(status, 503),
            other => panic!("expected Status variant, got {other:?}"),
        }
        assert!(!ApiError::from_status(500).is_not_found());
    }
}
