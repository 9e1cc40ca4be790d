//! Route handlers.
//!
//! Each handler turns a request into a response or an `AppError`; the router
//! maps errors to empty-bodied responses.

mod issue;
mod verify;

pub use issue::{issue_token, TokenResponse};
pub use verify::verify_token;
