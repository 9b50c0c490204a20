use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Every failure a request can surface. Each variant maps to one status code;
/// nothing is retried internally and nothing is downgraded to a generic error
/// except actual storage failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("missing or invalid identity headers")]
    Unauthorized,

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Turn a unique-constraint violation into a Conflict with a meaningful
    /// message; anything else stays a database error. Used where an insert
    /// races against the slot or room-name uniqueness constraints.
    pub fn conflict_on_unique(err: sqlx::Error, msg: &str) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.is_unique_violation() {
                return Self::Conflict(msg.to_string());
            }
        }
        Self::Database(err)
    }

    /// Same shape for foreign-key violations: a delete that trips a
    /// referencing row is a Conflict, not an internal error.
    pub fn conflict_on_fk(err: sqlx::Error, msg: &str) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.is_foreign_key_violation() {
                return Self::Conflict(msg.to_string());
            }
        }
        Self::Database(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response();
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::ErrorKind;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[derive(Debug)]
    struct StubDbError {
        fk: bool,
    }

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "constraint violation")
        }
    }

    impl std::error::Error for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "constraint violation"
        }

        fn kind(&self) -> ErrorKind {
            if self.fk {
                ErrorKind::ForeignKeyViolation
            } else {
                ErrorKind::UniqueViolation
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    fn unique_violation() -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDbError { fk: false }))
    }

    fn fk_violation() -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDbError { fk: true }))
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(AppError::validation("bad date")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::permission_denied("not yours")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AppError::not_found("no such room")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Conflict("slot already booked".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::InvalidTransition("already approved".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = AppError::conflict_on_unique(unique_violation(), "slot already booked");
        match err {
            AppError::Conflict(msg) => assert_eq!(msg, "slot already booked"),
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_fk_violation_maps_to_conflict() {
        let err = AppError::conflict_on_fk(fk_violation(), "room still has bookings");
        match err {
            AppError::Conflict(msg) => assert_eq!(msg, "room still has bookings"),
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_violation_kind_stays_internal() {
        // Each mapper only claims its own constraint kind.
        let err = AppError::conflict_on_unique(fk_violation(), "slot already booked");
        assert!(matches!(err, AppError::Database(_)));
        let err = AppError::conflict_on_fk(unique_violation(), "room still has bookings");
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_non_unique_db_error_stays_internal() {
        let err = AppError::conflict_on_unique(sqlx::Error::PoolClosed, "slot already booked");
        assert!(matches!(err, AppError::Database(_)));
    }
}
