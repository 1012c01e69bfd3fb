/// JWT Claims structure
///
/// Access token payload: a single identity claim (`sub`) plus the standard
/// time claims (RFC 7519).

use serde::{Deserialize, Serialize};

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims for `username` expiring `lifetime_seconds` after `now`
    ///
    /// A zero or negative lifetime yields claims that are already expired.
    pub fn new(username: &str, lifetime_seconds: i64, now: i64) -> Self {
        Self {
            sub: username.to_string(),
            exp: now.saturating_add(lifetime_seconds),
            iat: now,
        }
    }

    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Expired once `now` reaches `exp`; no clock skew
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("alice", 300, 1_000);

        assert_eq!(claims.username(), "alice");
        assert_eq!(claims.exp, 1_300);
        assert_eq!(claims.iat, 1_000);
        assert!(!claims.is_expired_at(1_299));
    }

    #[test]
    fn test_huge_lifetime_saturates() {
        let claims = Claims::new("alice", i64::MAX, 1_000);
        assert_eq!(claims.exp, i64::MAX);
        assert!(!claims.is_expired_at(1_000));
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = Claims::new("alice", 300, 1_000);
        assert!(claims.is_expired_at(1_300));
    }

    #[test]
    fn test_non_positive_lifetime_is_expired() {
        assert!(Claims::new("alice", 0, 1_000).is_expired_at(1_000));
        assert!(Claims::new("alice", -1, 1_000).is_expired_at(1_000));
    }
}
