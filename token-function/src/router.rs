//! Request router
//!
//! Dispatches on path and method. Unmatched combinations get an empty 405.

use error::AppError;

use crate::config::FunctionConfig;
use crate::event::{Request, Response};
use crate::handlers;

/// Router owning the immutable function configuration
#[derive(Debug, Clone)]
pub struct TokenRouter {
    config: FunctionConfig,
}

impl TokenRouter {
    pub fn new(config: FunctionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FunctionConfig {
        &self.config
    }

    /// Handle a request against the wall clock.
    pub fn handle(&self, request: &Request) -> Response {
        self.handle_at(request, chrono::Utc::now().timestamp())
    }

    /// Handle a request as if the current time were `now` (Unix seconds).
    pub fn handle_at(&self, request: &Request, now: i64) -> Response {
        let result = match (request.path.as_str(), request.http_method.as_str()) {
            ("/", "GET") => handlers::verify_token(&self.config, request, now),
            ("/token", "POST") => handlers::issue_token(&self.config, request, now),
            _ => Ok(Response::empty(405)),
        };

        let response = result.unwrap_or_else(|err| Self::reject(&err));
        tracing::info!(
            method = %request.http_method,
            path = %request.path,
            status = response.status_code,
            "Handled request"
        );
        response
    }

    fn reject(err: &AppError) -> Response {
        let response = Response::from_error(err);
        if response.status_code >= 500 {
            tracing::error!("Request failed: {}", err);
        } else {
            tracing::warn!("Request rejected: {}", err);
        }
        response
    }
}
