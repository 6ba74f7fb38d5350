//! Error types for line balancing.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised while loading, validating, or balancing an instance.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("invalid instance: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("derived metrics not populated for task: {0}")]
    MetricsNotPopulated(String),

    #[error("instance already balanced: {0}")]
    AlreadyBalanced(String),

    #[error("balancing stalled with unassigned tasks: {}", .unassigned.join(", "))]
    Stalled { unassigned: Vec<String> },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Vec<ValidationError>> for BalanceError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, BalanceError>;
