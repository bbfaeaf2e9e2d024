//! Identity lookup
//!
//! The token issuer resolves identifiers through [`IdentityStore`]; the
//! service ships with [`StaticIdentityStore`], which knows exactly one
//! identity taken from configuration.

use ring::hmac;
use ring::rand::SystemRandom;

use crate::config::IdentityConfig;

/// A known identity and the secret it authenticates with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub identifier: String,
    pub secret: String,
}

pub trait IdentityStore: Send + Sync {
    fn find_by_identifier(&self, identifier: &str) -> Option<Identity>;
}

/// Single configured identity
#[derive(Debug, Clone)]
pub struct StaticIdentityStore {
    identity: Identity,
}

impl StaticIdentityStore {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

impl From<&IdentityConfig> for StaticIdentityStore {
    fn from(config: &IdentityConfig) -> Self {
        Self::new(Identity {
            id: config.id,
            identifier: config.identifier.clone(),
            secret: config.secret.clone(),
        })
    }
}

impl IdentityStore for StaticIdentityStore {
    fn find_by_identifier(&self, identifier: &str) -> Option<Identity> {
        (self.identity.identifier == identifier).then(|| self.identity.clone())
    }
}

/// Compare two secrets in constant time.
///
/// Both sides are run through HMAC under a throwaway key so the comparison
/// does not leak the length or the position of the first differing byte.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    let rng = SystemRandom::new();
    let key = match hmac::Key::generate(hmac::HMAC_SHA256, &rng) {
        Ok(key) => key,
        Err(_) => {
            tracing::error!("System RNG unavailable for secret comparison");
            return false;
        }
    };
    let tag = hmac::sign(&key, expected.as_bytes());
    hmac::verify(&key, provided.as_bytes(), tag.as_ref()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> StaticIdentityStore {
        StaticIdentityStore::new(Identity {
            id: 1,
            identifier: "admin@fabryka.com".to_string(),
            secret: "P@ssword".to_string(),
        })
    }

    #[test]
    fn test_lookup_is_exact() {
        let store = store();
        assert_eq!(store.find_by_identifier("admin@fabryka.com").map(|i| i.id), Some(1));
        assert!(store.find_by_identifier("ADMIN@fabryka.com").is_none());
        assert!(store.find_by_identifier("").is_none());
    }

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match("P@ssword", "P@ssword"));
        assert!(!secrets_match("P@sswor", "P@ssword"));
        assert!(!secrets_match("p@ssword", "P@ssword"));
        assert!(!secrets_match("", "P@ssword"));
    }
}
