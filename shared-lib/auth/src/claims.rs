//! Token claims.

use serde::{Deserialize, Serialize};

/// Claims carried by an issued token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Caller-supplied payload
    pub data: serde_json::Value,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Not valid before (Unix timestamp)
    pub nbf: i64,
}

impl TokenClaims {
    /// Create claims for `data` issued at `now`, valid from
    /// `now + not_before_secs` until `now + expires_in_secs`. Offsets
    /// saturate instead of overflowing.
    pub fn new(data: serde_json::Value, now: i64, not_before_secs: i64, expires_in_secs: i64) -> Self {
        Self {
            data,
            exp: now.saturating_add(expires_in_secs),
            nbf: now.saturating_add(not_before_secs),
        }
    }

    /// Expired once `now` reaches `exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Not yet valid while `now` is before `nbf`.
    pub fn is_immature_at(&self, now: i64) -> bool {
        now < self.nbf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_window_offsets() {
        let claims = TokenClaims::new(json!({"name": "bboe"}), 1_000, 2, 5);
        assert_eq!(claims.nbf, 1_002);
        assert_eq!(claims.exp, 1_005);
    }

    #[test]
    fn test_huge_offsets_saturate() {
        let claims = TokenClaims::new(json!(null), 1_000, 0, i64::MAX);
        assert_eq!(claims.exp, i64::MAX);
        assert!(!claims.is_expired_at(1_000));
    }

    #[test]
    fn test_window_is_half_open() {
        let claims = TokenClaims::new(json!(null), 1_000, 2, 5);

        assert!(claims.is_immature_at(1_001));
        assert!(!claims.is_immature_at(1_002));
        assert!(!claims.is_expired_at(1_004));
        assert!(claims.is_expired_at(1_005));
    }
}
