use thiserror::Error;
use uuid::Uuid;

/// Failures talking to the remote task service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service refused the request, e.g. it could not parse the due-string.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("service unavailable: {0}")]
    Transport(String),

    #[error("unexpected response from service: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// Whether resubmitting the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt task store: {0}")]
    Json(#[from] serde_json::Error),

    #[error("task store lock poisoned")]
    Poisoned,

    #[error("task store worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum DueUpdateError {
    #[error("task {0} no longer exists locally")]
    TaskNotFound(Uuid),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("local storage error: {0}")]
    Store(#[from] StoreError),
}

impl DueUpdateError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service(e) => e.is_retryable(),
            Self::TaskNotFound(_) | Self::Store(_) => false,
        }
    }
}
