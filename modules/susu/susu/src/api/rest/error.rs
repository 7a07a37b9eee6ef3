use susu_errors::Problem;

use crate::domain::error::DomainError;

pub type ApiResult<T> = Result<T, Problem>;

/// Map a domain error to an RFC 9457 problem tagged with the current trace id.
///
/// Storage failures are logged here and reach the client as an opaque 500,
/// except unique-constraint violations which become 409.
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        if e.is_unique_violation() {
            tracing::debug!(error = %e, "unique constraint violated");
            return Problem::conflict(
                "unique_violation",
                "a record with the same unique value already exists",
            )
            .with_current_trace();
        }

        let problem = match e {
            DomainError::NotFound { .. } => Problem::not_found("not_found", e.to_string()),
            DomainError::Validation { field, message } => Problem::unprocessable(&field, message),
            DomainError::Conflict { message } => Problem::conflict("conflict", message),
            DomainError::Database(err) => {
                tracing::error!(error = %err, "database error");
                Problem::internal()
            }
        };
        problem.with_current_trace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use sea_orm::DbErr;

    #[test]
    fn not_found_keeps_entity_and_id_in_detail() {
        let p: Problem = DomainError::not_found("User", 42).into();
        assert_eq!(p.status, StatusCode::NOT_FOUND);
        assert_eq!(p.code, "not_found");
        assert_eq!(p.detail, "User not found: 42");
    }

    #[test]
    fn validation_maps_to_422_with_violation() {
        let p: Problem = DomainError::validation("email", "too long").into();
        assert_eq!(p.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(p.errors.len(), 1);
        assert_eq!(p.errors[0].field, "email");
    }

    #[test]
    fn conflict_maps_to_409() {
        let p: Problem = DomainError::conflict("marking already paid").into();
        assert_eq!(p.status, StatusCode::CONFLICT);
        assert_eq!(p.detail, "marking already paid");
    }

    #[test]
    fn database_error_is_hidden() {
        let p: Problem = DomainError::Database(DbErr::Custom("connection reset".to_owned())).into();
        assert_eq!(p.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!p.detail.contains("connection reset"));
    }
}
