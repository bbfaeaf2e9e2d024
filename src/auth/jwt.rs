//! JWT Token Service
//!
//! Token issuance for the configured identity and validation of incoming
//! bearer tokens. Both sides use HS256 over the shared signing key.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::error::{AuthError, IssueError};
use crate::auth::identity::{IdentityStore, secrets_match};
use crate::auth::revocation::RevocationList;
use crate::config::JwtConfig;

/// The only signing algorithm issued or accepted
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// How long an issued token is valid for
pub const TOKEN_LIFETIME_HOURS: i64 = 6;

/// JWT Claims structure containing identity information and token metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Internal identity id
    #[serde(rename = "Id")]
    pub id: i64,
    /// Identifier the token was issued to
    pub sub: String,
    /// Same value as `sub`
    pub email: String,
    /// Unique token id
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// A credential pair presented at login
#[derive(Debug, Clone)]
pub struct Credential {
    pub identifier: String,
    pub secret: String,
}

/// Serialized token plus the claims that went into it
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Issues tokens to identities that present the right secret
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    lifetime: Duration,
    identities: Arc<dyn IdentityStore>,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig, identities: Arc<dyn IdentityStore>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.key.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime: Duration::hours(TOKEN_LIFETIME_HOURS),
            identities,
        }
    }

    /// Verify `credential` and issue a token valid from now.
    pub fn issue(&self, credential: &Credential) -> Result<IssuedToken, IssueError> {
        self.issue_at(credential, Utc::now())
    }

    /// Verify `credential` and issue a token valid from `now`.
    pub fn issue_at(
        &self,
        credential: &Credential,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, IssueError> {
        if credential.identifier.is_empty() || credential.secret.is_empty() {
            return Err(IssueError::Unauthorized);
        }

        let identity = self.identities.find_by_identifier(&credential.identifier);
        // Compare against something even when the identifier is unknown so
        // both failure paths cost the same.
        let expected = identity.as_ref().map(|i| i.secret.as_str()).unwrap_or("");
        let secret_ok = secrets_match(&credential.secret, expected);

        let identity = match identity {
            Some(identity) if secret_ok => identity,
            _ => return Err(IssueError::Unauthorized),
        };

        let claims = Claims {
            id: identity.id,
            sub: identity.identifier.clone(),
            email: identity.identifier,
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        let token = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)?;
        Ok(IssuedToken { token, claims })
    }
}

/// What an incoming token must satisfy
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    pub required_issuer: String,
    pub required_audience: String,
    pub signing_key: String,
    /// Enforce `nbf`/`exp`. On unless explicitly turned off.
    pub validate_lifetime: bool,
}

impl ValidationPolicy {
    pub fn new(
        required_issuer: impl Into<String>,
        required_audience: impl Into<String>,
        signing_key: impl Into<String>,
    ) -> Self {
        Self {
            required_issuer: required_issuer.into(),
            required_audience: required_audience.into(),
            signing_key: signing_key.into(),
            validate_lifetime: true,
        }
    }

    pub fn with_lifetime_validation(mut self, enabled: bool) -> Self {
        self.validate_lifetime = enabled;
        self
    }
}

impl From<&JwtConfig> for ValidationPolicy {
    fn from(config: &JwtConfig) -> Self {
        Self::new(&config.issuer, &config.audience, &config.key)
            .with_lifetime_validation(config.validate_lifetime)
    }
}

/// Checks bearer tokens against a fixed [`ValidationPolicy`]
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    validate_lifetime: bool,
    revocations: Option<Arc<dyn RevocationList>>,
}

impl TokenValidator {
    pub fn new(policy: &ValidationPolicy) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_issuer(&[&policy.required_issuer]);
        validation.set_audience(&[&policy.required_audience]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud"]);
        // Lifetime is checked in `validate_at` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(policy.signing_key.as_bytes()),
            validation,
            validate_lifetime: policy.validate_lifetime,
            revocations: None,
        }
    }

    /// Also reject tokens whose `jti` is on `revocations`.
    pub fn with_revocations(mut self, revocations: Arc<dyn RevocationList>) -> Self {
        self.revocations = Some(revocations);
        self
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate `token` as if the current time were `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if self.validate_lifetime {
            let now = now.timestamp();
            if now >= claims.exp {
                return Err(AuthError::Expired);
            }
            if now < claims.nbf {
                return Err(AuthError::NotYetValid);
            }
        }

        if let Some(revocations) = &self.revocations {
            if revocations.is_revoked(&claims.jti) {
                return Err(AuthError::Revoked);
            }
        }

        Ok(claims)
    }
}

/// Validate `token` under `policy` without keeping a validator around.
pub fn validate(token: &str, policy: &ValidationPolicy) -> Result<Claims, AuthError> {
    TokenValidator::new(policy).validate(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::{Identity, StaticIdentityStore};
    use crate::auth::revocation::MemoryRevocationList;

    fn jwt_config(issuer: &str, audience: &str, key: &str) -> JwtConfig {
        JwtConfig {
            key: key.to_string(),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            validate_lifetime: true,
        }
    }

    fn issuer(issuer: &str, audience: &str, key: &str) -> TokenIssuer {
        let identities = Arc::new(StaticIdentityStore::new(Identity {
            id: 1,
            identifier: "admin@fabryka.com".to_string(),
            secret: "P@ssword".to_string(),
        }));
        TokenIssuer::new(&jwt_config(issuer, audience, key), identities)
    }

    fn admin() -> Credential {
        Credential {
            identifier: "admin@fabryka.com".to_string(),
            secret: "P@ssword".to_string(),
        }
    }

    fn credential(identifier: &str, secret: &str) -> Credential {
        Credential {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let token = issuer("iss1", "aud1", "k").issue(&admin()).unwrap();

        let policy = ValidationPolicy::new("iss1", "aud1", "k").with_lifetime_validation(false);
        let claims = validate(&token.token, &policy).unwrap();

        assert_eq!(claims.sub, "admin@fabryka.com");
        assert_eq!(claims.email, "admin@fabryka.com");
        assert_eq!(claims.id, 1);
        assert_eq!(claims.iss, "iss1");
        assert_eq!(claims.aud, "aud1");
        assert_eq!(claims, token.claims);
    }

    #[test]
    fn test_round_trip_within_lifetime() {
        let token = issuer("iss1", "aud1", "k").issue(&admin()).unwrap();
        let policy = ValidationPolicy::new("iss1", "aud1", "k");

        assert!(policy.validate_lifetime);
        assert!(validate(&token.token, &policy).is_ok());
    }

    #[test]
    fn test_expiry_is_six_hours_after_issuance() {
        let now = Utc::now();
        let token = issuer("iss1", "aud1", "k").issue_at(&admin(), now).unwrap();

        assert_eq!(token.claims.iat, now.timestamp());
        assert_eq!(token.claims.exp, now.timestamp() + 6 * 60 * 60);
    }

    #[test]
    fn test_token_ids_are_unique() {
        let issuer = issuer("iss1", "aud1", "k");
        let a = issuer.issue(&admin()).unwrap();
        let b = issuer.issue(&admin()).unwrap();

        assert_ne!(a.claims.jti, b.claims.jti);
        assert!(Uuid::parse_str(&a.claims.jti).is_ok());
    }

    #[test]
    fn test_header_uses_hs256() {
        let token = issuer("iss1", "aud1", "k").issue(&admin()).unwrap();
        let header = jsonwebtoken::decode_header(&token.token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_bad_credentials_are_unauthorized() {
        let issuer = issuer("iss1", "aud1", "k");

        for cred in [
            credential("x", "y"),
            credential("admin@fabryka.com", "wrong"),
            credential("someone@fabryka.com", "P@ssword"),
            credential("", ""),
            credential("admin@fabryka.com", ""),
        ] {
            assert!(
                matches!(issuer.issue(&cred), Err(IssueError::Unauthorized)),
                "credential {:?} should be rejected",
                cred
            );
        }
    }

    #[test]
    fn test_tampered_signature() {
        let token = issuer("iss1", "aud1", "k").issue(&admin()).unwrap().token;

        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let policy = ValidationPolicy::new("iss1", "aud1", "k").with_lifetime_validation(false);
        assert_eq!(validate(&tampered, &policy), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_wrong_key() {
        let token = issuer("iss1", "aud1", "k").issue(&admin()).unwrap().token;
        let policy = ValidationPolicy::new("iss1", "aud1", "other");
        assert_eq!(validate(&token, &policy), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_expired_token() {
        let issued_at = Utc::now() - Duration::hours(7);
        let token = issuer("iss1", "aud1", "k").issue_at(&admin(), issued_at).unwrap().token;

        let checked = TokenValidator::new(&ValidationPolicy::new("iss1", "aud1", "k"));
        assert_eq!(checked.validate(&token), Err(AuthError::Expired));

        let unchecked = TokenValidator::new(
            &ValidationPolicy::new("iss1", "aud1", "k").with_lifetime_validation(false),
        );
        assert!(unchecked.validate(&token).is_ok());
    }

    #[test]
    fn test_clock_past_expiry() {
        let now = Utc::now();
        let token = issuer("iss1", "aud1", "k").issue_at(&admin(), now).unwrap().token;
        let validator = TokenValidator::new(&ValidationPolicy::new("iss1", "aud1", "k"));

        assert!(validator.validate_at(&token, now + Duration::hours(5)).is_ok());
        assert_eq!(
            validator.validate_at(&token, now + Duration::hours(6)),
            Err(AuthError::Expired)
        );
        assert_eq!(
            validator.validate_at(&token, now - Duration::minutes(1)),
            Err(AuthError::NotYetValid)
        );
    }

    #[test]
    fn test_cross_audience() {
        let token = issuer("iss1", "A", "k").issue(&admin()).unwrap().token;
        let policy = ValidationPolicy::new("iss1", "B", "k").with_lifetime_validation(false);
        assert_eq!(validate(&token, &policy), Err(AuthError::InvalidAudience));
    }

    #[test]
    fn test_wrong_issuer() {
        let token = issuer("someone-else", "aud1", "k").issue(&admin()).unwrap().token;
        let policy = ValidationPolicy::new("iss1", "aud1", "k");
        assert_eq!(validate(&token, &policy), Err(AuthError::InvalidIssuer));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let policy = ValidationPolicy::new("iss1", "aud1", "k");
        assert_eq!(validate("", &policy), Err(AuthError::Malformed));
        assert_eq!(validate("not-a-token", &policy), Err(AuthError::Malformed));
        assert_eq!(validate("a.b.c", &policy), Err(AuthError::Malformed));
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let claims = issuer("iss1", "aud1", "k").issue(&admin()).unwrap().claims;
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"k"),
        )
        .unwrap();

        let policy = ValidationPolicy::new("iss1", "aud1", "k");
        assert_eq!(validate(&token, &policy), Err(AuthError::Malformed));
    }

    #[test]
    fn test_revoked_token() {
        let issued = issuer("iss1", "aud1", "k").issue(&admin()).unwrap();
        let revocations = Arc::new(MemoryRevocationList::new());
        let validator = TokenValidator::new(&ValidationPolicy::new("iss1", "aud1", "k"))
            .with_revocations(revocations.clone());

        assert!(validator.validate(&issued.token).is_ok());

        revocations.revoke(&issued.claims.jti, issued.claims.exp);
        assert_eq!(validator.validate(&issued.token), Err(AuthError::Revoked));
    }

    #[test]
    fn test_expired_revoked_token_stays_revoked_without_lifetime_check() {
        let issuer = issuer("iss1", "aud1", "k");
        let stale = issuer
            .issue_at(&admin(), Utc::now() - Duration::hours(7))
            .unwrap();
        let fresh = issuer.issue(&admin()).unwrap();

        let policy = ValidationPolicy::new("iss1", "aud1", "k").with_lifetime_validation(false);
        let revocations = Arc::new(MemoryRevocationList::with_expiry_purge(
            policy.validate_lifetime,
        ));
        let validator = TokenValidator::new(&policy).with_revocations(revocations.clone());

        assert!(validator.validate(&stale.token).is_ok());
        revocations.revoke(&stale.claims.jti, stale.claims.exp);
        // A later revoke must not drop the stale entry
        revocations.revoke(&fresh.claims.jti, fresh.claims.exp);

        assert_eq!(validator.validate(&stale.token), Err(AuthError::Revoked));
        assert_eq!(validator.validate(&fresh.token), Err(AuthError::Revoked));
    }
}
