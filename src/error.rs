use thiserror::Error;

use crate::core::DebtId;

/// Failures at the data-entry boundary. The simulation engine itself never
/// fails; these come from validating or loading caller input.
#[derive(Error, Debug)]
pub enum PayoffError {
    #[error("debt {id}: {reason}")]
    InvalidDebt { id: DebtId, reason: String },

    #[error("{field} must be a finite number >= 0")]
    InvalidAmount { field: &'static str },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PayoffResult<T> = Result<T, PayoffError>;
