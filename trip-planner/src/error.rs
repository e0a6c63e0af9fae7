//! Error types for the trip planner

use thiserror::Error;
use uuid::Uuid;

/// Result type for trip operations
pub type Result<T> = std::result::Result<T, Error>;

/// Trip planner errors
#[derive(Error, Debug)]
pub enum Error {
    /// Member is not on the trip roster
    #[error("Unknown member: {0}")]
    UnknownMember(String),

    /// Member is already on the trip roster
    #[error("Duplicate member: {0}")]
    DuplicateMember(String),

    /// Member name is empty
    #[error("Member name must not be blank")]
    BlankMember,

    /// No expense with this ID
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),

    /// Expense rejected on entry
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),

    /// Trip document is malformed
    #[error("Invalid trip document: {0}")]
    InvalidDocument(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
