//! Authentication Middleware
//!
//! Axum middleware for bearer token validation. Rejections are a bare `401`
//! whatever the reason; the reason only goes to the log.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{error::AuthError, jwt::TokenValidator, models::AuthUser};

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Missing)?
        .to_str()
        .map_err(|_| AuthError::Malformed)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::Malformed)?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Malformed);
    }

    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::Malformed);
    }
    Ok(token)
}

/// Authentication middleware that validates bearer tokens and injects the caller
pub struct AuthMiddleware;

impl AuthMiddleware {
    pub async fn validate_token(
        State(validator): State<Arc<TokenValidator>>,
        mut req: Request,
        next: Next,
    ) -> Result<Response, AuthError> {
        let claims = bearer_token(req.headers())
            .and_then(|token| validator.validate(token))
            .map_err(|e| {
                tracing::warn!("[AuthMiddleware] {} {} rejected: {}", req.method(), req.uri(), e);
                e
            })?;

        tracing::debug!("[AuthMiddleware] Token {} accepted for sub={}", claims.jti, claims.sub);
        req.extensions_mut().insert(AuthUser::from(claims));

        Ok(next.run(req).await)
    }
}
