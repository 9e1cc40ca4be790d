//! `GET /`: verify a bearer token and echo its data.

use auth::bearer_token;
use error::AppError;

use crate::config::FunctionConfig;
use crate::event::{Request, Response};

pub fn verify_token(config: &FunctionConfig, request: &Request, now: i64) -> Result<Response, AppError> {
    let token = bearer_token(request.header("Authorization"))?;
    let claims = config.jwt.verify(token, now).into_result()?;

    Response::json(200, &claims.data)
}
