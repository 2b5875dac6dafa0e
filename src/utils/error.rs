use serde::Serialize;
use std::fmt;

/// Single validation failure for one request field
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Domain error taxonomy. Raised by the repository/service layers and
/// translated to HTTP status codes only in the api layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UserError {
    NotFound(String),
    EmailAlreadyTaken,
    InvalidPassword(String),
    Validation(Vec<FieldError>),
    Database(String),
    Internal(String),
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserError::NotFound(msg) => write!(f, "Not found: {}", msg),
            UserError::EmailAlreadyTaken => write!(f, "Email already taken"),
            UserError::InvalidPassword(msg) => write!(f, "Invalid password: {}", msg),
            UserError::Validation(fields) => write!(f, "Validation failed ({} fields)", fields.len()),
            UserError::Database(msg) => write!(f, "Database error: {}", msg),
            UserError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for UserError {}
