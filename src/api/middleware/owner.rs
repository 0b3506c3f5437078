//! Owner identity extraction.
//!
//! Authentication happens upstream; this service only trusts the identity
//! forwarded in the `X-Owner-Id` header.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Header carrying the authenticated owner identity.
pub const OWNER_HEADER: &str = "x-owner-id";

const MAX_OWNER_LEN: usize = 255;

/// The caller's owner identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(OwnerId(owner): OwnerId) -> String {
///     owner
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

/// Rejection for requests without a usable owner identity.
#[derive(Debug)]
pub struct MissingOwner;

impl IntoResponse for MissingOwner {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": "missing_owner",
                "message": "X-Owner-Id header is missing or invalid",
            }
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = MissingOwner;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner = parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.len() <= MAX_OWNER_LEN)
            .ok_or(MissingOwner)?;

        Ok(OwnerId(owner.to_string()))
    }
}
