//! Token Function
//!
//! Serverless endpoint that issues short-lived HS256 tokens from JSON
//! payloads (`POST /token`) and verifies bearer tokens (`GET /`).

pub mod config;
pub mod event;
pub mod handlers;
pub mod router;
pub mod runtime;

pub use config::{DataEncoding, FunctionConfig};
pub use event::{Request, Response};
pub use handlers::TokenResponse;
pub use router::TokenRouter;
pub use runtime::run_event_loop;
pub use self_test::run_self_test;
