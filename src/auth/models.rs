//! Authentication Models
//!
//! Data structures for authentication requests and the authenticated caller.

use serde::{Deserialize, Serialize};

use crate::auth::jwt::{Claims, Credential};

/// Authenticated caller extracted from a validated token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub subject: String,
    pub email: String,
    pub token_id: String,
    pub expires_at: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            subject: claims.sub,
            email: claims.email,
            token_id: claims.jti,
            expires_at: claims.exp,
        }
    }
}

/// Login request payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

impl From<LoginRequest> for Credential {
    fn from(req: LoginRequest) -> Self {
        Self {
            identifier: req.user_name,
            secret: req.password,
        }
    }
}
