//! Token revocation denylist keyed by token id (`jti`).

use chrono::Utc;
use dashmap::DashMap;

pub trait RevocationList: Send + Sync {
    /// Deny the token with this id until `expires_at` (unix seconds).
    fn revoke(&self, token_id: &str, expires_at: i64);

    fn is_revoked(&self, token_id: &str) -> bool;
}

/// Process-local denylist. With expiry purging on, entries are dropped once
/// the token they block would have expired anyway; that is only sound while
/// the validator itself rejects expired tokens.
#[derive(Debug)]
pub struct MemoryRevocationList {
    entries: DashMap<String, i64>,
    purge_on_expiry: bool,
}

impl Default for MemoryRevocationList {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRevocationList {
    pub fn new() -> Self {
        Self::with_expiry_purge(true)
    }

    /// `purge_on_expiry` must be `false` when token lifetimes are not
    /// validated, or revoked tokens come back once past `exp`.
    pub fn with_expiry_purge(purge_on_expiry: bool) -> Self {
        Self {
            entries: DashMap::new(),
            purge_on_expiry,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn purge_expired(&self, now: i64) {
        self.entries.retain(|_, expires_at| *expires_at > now);
    }
}

impl RevocationList for MemoryRevocationList {
    fn revoke(&self, token_id: &str, expires_at: i64) {
        if self.purge_on_expiry {
            self.purge_expired(Utc::now().timestamp());
        }
        self.entries.insert(token_id.to_string(), expires_at);
        tracing::debug!("Revoked token {} (denylist size {})", token_id, self.len());
    }

    fn is_revoked(&self, token_id: &str) -> bool {
        self.entries.contains_key(token_id)
    }
}
