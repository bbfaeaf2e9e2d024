//! Auth routes for token issuance and revocation

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::auth::{
    error::IssueError,
    jwt::Credential,
    models::{AuthUser, LoginRequest},
};
use crate::server::AppState;

/// `POST /security/getToken`
///
/// Returns the signed token as a JSON string, or a bare `401` when the
/// credentials do not match or the body is not a login request.
pub async fn get_token(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<String>, IssueError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!("Token request rejected: {}", rejection.body_text());
        IssueError::Unauthorized
    })?;
    let credential = Credential::from(payload);

    match state.issuer.issue(&credential) {
        Ok(issued) => {
            tracing::info!("Issued token {} to {}", issued.claims.jti, issued.claims.sub);
            Ok(Json(issued.token))
        }
        Err(e) => {
            tracing::warn!("Token request rejected: {}", e);
            Err(e)
        }
    }
}

/// `POST /security/revokeToken`
///
/// Revokes the token the request was authenticated with. Stateless clients
/// can just drop their token; this makes the server refuse it as well.
pub async fn revoke_token(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> StatusCode {
    state.revocations.revoke(&user.token_id, user.expires_at);
    tracing::info!("Token {} revoked by {}", user.token_id, user.subject);
    StatusCode::NO_CONTENT
}
