use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::dao::storage::StorageError;

/// Domain failures raised by room operations.
///
/// Every variant carries a human-readable reason; callers are expected to
/// display it and leave their state unchanged. None of these abort the
/// surrounding request handler beyond the failing operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// No room document exists for the given code.
    #[error("room `{0}` not found")]
    RoomNotFound(String),
    /// A room with the requested code already exists.
    #[error("room code `{0}` is already taken")]
    DuplicateCode(String),
    /// The operation requires an active game (or an open room when joining).
    #[error("room is not active")]
    RoomInactive,
    /// The word pool is too small for the room's grid size.
    #[error("not enough words: have {have}, need {need}")]
    InsufficientWords {
        /// Words currently in the pool.
        have: usize,
        /// Words required (`grid_size²`).
        need: usize,
    },
    /// The game has already been started.
    #[error("game has already started")]
    AlreadyStarted,
    /// The acting player is not in the room roster.
    #[error("`{0}` is not registered in this room")]
    NotAMember(String),
    /// The player has no grid yet.
    #[error("no bingo grid has been assigned to `{0}` yet")]
    GridNotReady(String),
    /// The target cell is already marked; re-marking is rejected.
    #[error("cell ({row}, {col}) is already marked")]
    AlreadyMarked {
        /// Cell row.
        row: u8,
        /// Cell column.
        col: u8,
    },
    /// The referenced cell does not exist in the grid.
    #[error("cell ({row}, {col}) does not exist")]
    UnknownCell {
        /// Cell row.
        row: u8,
        /// Cell column.
        col: u8,
    },
    /// No pending approval exists at the given index.
    #[error("no pending approval at index {0}")]
    InvalidApprovalIndex(usize),
    /// The called-out word is not part of the room's pool.
    #[error("`{0}` is not in the word pool")]
    WordNotInPool(String),
    /// The word index is outside the pool bounds.
    #[error("word index {0} is out of range")]
    WordIndexOutOfRange(usize),
    /// The acting user is not the room creator.
    #[error("only the room creator may perform this operation")]
    PermissionDenied,
}

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Missing or unusable identity.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The identity is known but not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// The operation raced a concurrent update and retries were exhausted.
    /// Callers may safely retry the whole operation.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict { id } => ServiceError::Conflict(format!(
                "document `{id}` is being updated concurrently; try again"
            )),
            other => ServiceError::Unavailable(other),
        }
    }
}

impl From<RoomError> for ServiceError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::RoomNotFound(_) | RoomError::InvalidApprovalIndex(_) => {
                ServiceError::NotFound(err.to_string())
            }
            RoomError::DuplicateCode(_) | RoomError::AlreadyMarked { .. } => {
                ServiceError::Conflict(err.to_string())
            }
            RoomError::PermissionDenied => ServiceError::Forbidden(err.to_string()),
            RoomError::InsufficientWords { .. }
            | RoomError::WordNotInPool(_)
            | RoomError::WordIndexOutOfRange(_)
            | RoomError::UnknownCell { .. } => ServiceError::InvalidInput(err.to_string()),
            RoomError::RoomInactive
            | RoomError::AlreadyStarted
            | RoomError::NotAMember(_)
            | RoomError::GridNotReady(_) => ServiceError::InvalidState(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Unauthorized access attempt.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Authenticated but not allowed.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
            ServiceError::Unauthorized(message) => AppError::Unauthorized(message),
            ServiceError::Forbidden(message) => AppError::Forbidden(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Conflict(message) => AppError::Conflict(message),
            ServiceError::Internal(message) => AppError::Internal(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
