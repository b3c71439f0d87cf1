use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fitslot_core::error::CoreError;
use fitslot_db::StoreError;
use fitslot_worker::WorkerError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures. Implements [`IntoResponse`] to produce consistent
/// `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fitslot_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage error from `fitslot_db`.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<WorkerError> for AppError {
    fn from(err: WorkerError) -> Self {
        match err {
            WorkerError::Core(e) => AppError::Core(e),
            WorkerError::Store(e) => AppError::Store(e),
        }
    }
}

impl AppError {
    /// HTTP status, machine-readable code and client-facing message.
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidRange(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_RANGE", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Store(store) => match store {
                StoreError::Conflict { constraint } => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Write conflicts with existing data: {constraint}"),
                ),
                StoreError::Rejected { constraint } => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Write rejected by constraint: {constraint}"),
                ),
                StoreError::Unavailable(msg) => {
                    tracing::error!(error = %msg, "Storage unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "STORAGE_UNAVAILABLE",
                        "Storage is temporarily unavailable".to_string(),
                    )
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_and_code(err: AppError) -> (StatusCode, &'static str) {
        let (status, code, _) = err.classify();
        (status, code)
    }

    #[test]
    fn core_errors_map_to_client_statuses() {
        assert_eq!(
            status_and_code(CoreError::NotFound { entity: "Trainer", id: 1 }.into()),
            (StatusCode::NOT_FOUND, "NOT_FOUND")
        );
        assert_eq!(
            status_and_code(CoreError::InvalidRange("x".into()).into()),
            (StatusCode::BAD_REQUEST, "INVALID_RANGE")
        );
        assert_eq!(
            status_and_code(CoreError::Validation("x".into()).into()),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        );
        assert_eq!(
            status_and_code(CoreError::Conflict("x".into()).into()),
            (StatusCode::CONFLICT, "CONFLICT")
        );
    }

    #[test]
    fn internal_messages_are_not_leaked() {
        let (status, code, message) =
            AppError::from(CoreError::Internal("secret detail".into())).classify();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
        assert!(!message.contains("secret"));
    }

    #[test]
    fn store_errors_map_through_worker_errors() {
        let unavailable = AppError::from(WorkerError::Store(StoreError::Unavailable("down".into())));
        assert_eq!(
            status_and_code(unavailable),
            (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE")
        );

        let conflict = AppError::from(StoreError::Conflict {
            constraint: "ex_bookings_no_overlap".into(),
        });
        assert_eq!(status_and_code(conflict), (StatusCode::CONFLICT, "CONFLICT"));
    }
}
