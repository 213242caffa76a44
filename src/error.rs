use thiserror::Error;

/// Failure of a file-manager operation. Rendered to text only by the front-ends.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error during {operation}: {message}")]
    Store {
        operation: &'static str,
        message: String,
    },

    #[error("Local I/O error: {0}")]
    LocalIo(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl AppError {
    pub fn store(operation: &'static str, message: impl Into<String>) -> Self {
        AppError::Store {
            operation,
            message: message.into(),
        }
    }

    /// Short tag naming the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Store { .. } => "store-error",
            AppError::LocalIo(_) => "local-io-error",
            AppError::Parse(_) => "parse-error",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
