use sea_orm::{DbErr, SqlErr};
use susu_sdk::SusuError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Storage errors pass through unmodified.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl DomainError {
    #[must_use]
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// The underlying storage error is a unique-constraint violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(e) => matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))),
            _ => false,
        }
    }
}

impl From<SusuError> for DomainError {
    fn from(e: SusuError) -> Self {
        match e {
            SusuError::NotFound { entity, id } => Self::NotFound { entity, id },
            SusuError::Conflict { message } => Self::Conflict { message },
            SusuError::Validation { field, message } => Self::Validation { field, message },
            SusuError::Internal => Self::Database(DbErr::Custom("internal error".to_owned())),
        }
    }
}

impl From<DomainError> for SusuError {
    fn from(e: DomainError) -> Self {
        if e.is_unique_violation() {
            return Self::conflict("a record with the same unique value already exists");
        }
        match e {
            DomainError::NotFound { entity, id } => Self::not_found(entity, id),
            DomainError::Validation { field, message } => Self::validation(field, message),
            DomainError::Conflict { message } => Self::conflict(message),
            DomainError::Database(err) => {
                tracing::error!(error = %err, "database error");
                Self::internal()
            }
        }
    }
}
