//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// Malformed input or mismatched identifiers
    Validation(Vec<String>),
    /// One or more referenced records are absent
    NotFound(Vec<String>),
    /// Delete blocked by dependent records
    Conflict(String),
    /// Uniqueness violation (name, name pair or ISBN)
    Duplicate(String),
    /// Database/persistence error
    Database(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(vec![message.into()])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(vec![message.into()])
    }

    /// Messages carried by this error, in the order they were recorded.
    pub fn messages(&self) -> Vec<String> {
        match self {
            DomainError::Validation(msgs) | DomainError::NotFound(msgs) => msgs.clone(),
            DomainError::Conflict(msg) | DomainError::Duplicate(msg) => vec![msg.clone()],
            DomainError::Database(msg) => vec![msg.clone()],
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Validation(msgs) => write!(f, "Validation error: {}", msgs.join("; ")),
            DomainError::NotFound(msgs) => write!(f, "Not found: {}", msgs.join("; ")),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Duplicate(msg) => write!(f, "Duplicate: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}
