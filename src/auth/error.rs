//! Authentication errors
//!
//! Every variant ends up as the same bare `401` at the HTTP boundary; the
//! distinction only exists for logs and tests.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Why a presented bearer token was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    Missing,

    #[error("malformed bearer token")]
    Malformed,

    #[error("token signature does not verify")]
    InvalidSignature,

    #[error("token issuer is not accepted")]
    InvalidIssuer,

    #[error("token audience is not accepted")]
    InvalidAudience,

    #[error("token has expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("token has been revoked")]
    Revoked,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

/// Why a credential pair did not produce a token
#[derive(Debug, Error)]
pub enum IssueError {
    /// Unknown identifier or wrong secret; deliberately indistinguishable.
    #[error("invalid credentials")]
    Unauthorized,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for IssueError {
    fn into_response(self) -> Response {
        match self {
            IssueError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            IssueError::Signing(e) => {
                tracing::error!("Token signing failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::ImmatureSignature => AuthError::NotYetValid,
            ErrorKind::MissingRequiredClaim(claim) => match claim.as_str() {
                "iss" => AuthError::InvalidIssuer,
                "aud" => AuthError::InvalidAudience,
                _ => AuthError::Malformed,
            },
            _ => AuthError::Malformed,
        }
    }
}
