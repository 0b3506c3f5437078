//! Application error type shared by the service layer and the HTTP adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::infrastructure::cache::CacheError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
}

/// Errors surfaced by short link operations.
///
/// Every variant is a distinct outcome a caller can act on; transports map
/// them onto their own envelope (see the [`IntoResponse`] impl for HTTP).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("short code '{0}' is already taken")]
    CodeTaken(String),

    #[error("failed to generate a unique short code after {attempts} attempts")]
    CodeGenerationExhausted { attempts: usize },

    #[error("invalid short code: {0}")]
    InvalidCode(String),

    #[error("invalid destination URL: {0}")]
    InvalidDestination(String),

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("short link not found")]
    NotFound,

    #[error("short link belongs to another owner")]
    Unauthorized,

    #[error("durable store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("operation timed out: {0}")]
    Timeout(&'static str),
}

impl AppError {
    /// Stable identifier used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CodeTaken(_) => "code_taken",
            Self::CodeGenerationExhausted { .. } => "code_generation_exhausted",
            Self::InvalidCode(_) => "invalid_code",
            Self::InvalidDestination(_) => "invalid_destination",
            Self::InvalidPagination(_) => "invalid_pagination",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::CacheUnavailable(_) => "cache_unavailable",
            Self::Timeout(_) => "timeout",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::CodeTaken(_) => StatusCode::CONFLICT,
            Self::InvalidCode(_) | Self::InvalidDestination(_) | Self::InvalidPagination(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::CodeGenerationExhausted { .. }
            | Self::StoreUnavailable(_)
            | Self::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        match e {
            CacheError::Timeout => AppError::Timeout("cache"),
            other => AppError::CacheUnavailable(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::InvalidDestination(e.to_string())
    }
}

/// Maps a sqlx failure onto the store-facing error kinds.
///
/// Unique violations on the code column mean another writer claimed the code
/// first, so they surface as [`AppError::CodeTaken`].
pub fn map_sqlx_error(e: sqlx::Error, code: &str) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::CodeTaken(code.to_string());
    }

    match e {
        sqlx::Error::PoolTimedOut => AppError::Timeout("store"),
        other => AppError::StoreUnavailable(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::CodeTaken("abc".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Timeout("store").status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::CodeGenerationExhausted { attempts: 3 }.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_cache_timeout_is_distinct() {
        let err: AppError = CacheError::Timeout.into();
        assert!(matches!(err, AppError::Timeout("cache")));

        let err: AppError = CacheError::Unavailable("refused".into()).into();
        assert!(matches!(err, AppError::CacheUnavailable(_)));
    }

    #[test]
    fn test_pool_timeout_maps_to_timeout() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut, "abc");
        assert!(matches!(err, AppError::Timeout("store")));

        let err = map_sqlx_error(sqlx::Error::RowNotFound, "abc");
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }

    #[test]
    fn test_error_info_code() {
        let info = AppError::InvalidCode("has space".into()).to_error_info();
        assert_eq!(info.code, "invalid_code");
        assert!(info.message.contains("has space"));
    }
}
