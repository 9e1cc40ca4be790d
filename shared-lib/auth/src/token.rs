//! HS256 token encoding and verification.

use error::AuthError;
use hmac::{Hmac, Mac};
use jwt::{SignWithKey, VerifyWithKey};
use sha2::Sha256;

use crate::claims::TokenClaims;
use crate::secret::SigningSecret;

type HmacSha256 = Hmac<Sha256>;

/// Default offset from issuance until a token becomes valid.
const DEFAULT_NOT_BEFORE_SECS: i64 = 2;
/// Default offset from issuance until a token expires.
const DEFAULT_EXPIRES_IN_SECS: i64 = 5;

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing and verifying tokens
    pub secret: SigningSecret,
    /// Seconds after issuance before a token is accepted
    pub not_before_secs: i64,
    /// Seconds after issuance at which a token stops being accepted
    pub expires_in_secs: i64,
}

impl JwtConfig {
    /// Create a configuration with the default 2s..5s validity window.
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            secret,
            not_before_secs: DEFAULT_NOT_BEFORE_SECS,
            expires_in_secs: DEFAULT_EXPIRES_IN_SECS,
        }
    }

    /// Override the validity window.
    pub fn with_window(mut self, not_before_secs: i64, expires_in_secs: i64) -> Self {
        self.not_before_secs = not_before_secs;
        self.expires_in_secs = expires_in_secs;
        self
    }

    /// Build claims for `data` issued at `now`.
    pub fn claims_for(&self, data: serde_json::Value, now: i64) -> TokenClaims {
        TokenClaims::new(data, now, self.not_before_secs, self.expires_in_secs)
    }

    /// Build, then sign, claims for `data` issued at `now`.
    pub fn issue(&self, data: serde_json::Value, now: i64) -> Result<String, AuthError> {
        encode_token(&self.claims_for(data, now), &self.secret)
    }

    /// Verify `token` against this configuration's secret.
    pub fn verify(&self, token: &str, now: i64) -> Verification {
        verify_token(token, &self.secret, now)
    }
}

/// Outcome of verifying a presented token.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    /// Signature checks out and `nbf <= now < exp`
    Valid(TokenClaims),
    /// Signature checks out but `exp` has passed
    Expired,
    /// Signature checks out but `nbf` has not been reached
    NotYetValid,
    /// Malformed token, bad signature or algorithm mismatch
    Invalid,
}

impl Verification {
    pub fn into_result(self) -> Result<TokenClaims, AuthError> {
        match self {
            Verification::Valid(claims) => Ok(claims),
            Verification::Expired => Err(AuthError::TokenExpired),
            Verification::NotYetValid => Err(AuthError::TokenNotYetValid),
            Verification::Invalid => Err(AuthError::InvalidToken),
        }
    }
}

fn hmac_key(secret: &SigningSecret) -> Result<HmacSha256, hmac::digest::InvalidLength> {
    HmacSha256::new_from_slice(secret.expose())
}

/// Encode claims into a signed token.
fn encode_token(claims: &TokenClaims, secret: &SigningSecret) -> Result<String, AuthError> {
    let key = hmac_key(secret).map_err(|e| {
        tracing::error!("Failed to create HMAC key: {}", e);
        AuthError::TokenCreationFailed
    })?;

    claims.sign_with_key(&key).map_err(|e| {
        tracing::error!("Failed to encode JWT: {}", e);
        AuthError::TokenCreationFailed
    })
}

/// Verify a token's signature and validity window at `now`.
///
/// The signature is checked first; the window is only consulted for
/// tokens whose signature holds.
fn verify_token(token: &str, secret: &SigningSecret, now: i64) -> Verification {
    let key = match hmac_key(secret) {
        Ok(key) => key,
        Err(e) => {
            tracing::error!("Failed to create HMAC key: {}", e);
            return Verification::Invalid;
        }
    };

    let verified: Result<TokenClaims, jwt::Error> = token.verify_with_key(&key);
    let claims = match verified {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("Failed to verify JWT: {}", e);
            return Verification::Invalid;
        }
    };

    if claims.is_expired_at(now) {
        tracing::debug!(exp = claims.exp, now, "Token expired");
        return Verification::Expired;
    }

    if claims.is_immature_at(now) {
        tracing::debug!(nbf = claims.nbf, now, "Token not yet valid");
        return Verification::NotYetValid;
    }

    Verification::Valid(claims)
}
