//! Token signing and verification library.
//!
//! This crate provides HS256 token issuance, verification with expiry and
//! not-before enforcement, and bearer credential extraction.

mod bearer;
mod claims;
mod token;
mod secret;

pub use bearer::{bearer_token, BEARER_PREFIX};
pub use claims::TokenClaims;
pub use token::{JwtConfig, Verification};
pub use secret::SigningSecret;
