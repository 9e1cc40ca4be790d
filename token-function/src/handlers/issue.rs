//! `POST /token`: mint a short-lived token around a JSON body.

use error::AppError;
use serde::{Deserialize, Serialize};

use crate::config::{DataEncoding, FunctionConfig};
use crate::event::{Request, Response, JSON_CONTENT_TYPE};

/// Body of a successful issuance response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

pub fn issue_token(config: &FunctionConfig, request: &Request, now: i64) -> Result<Response, AppError> {
    // Exact match, parameters such as `; charset=utf-8` are rejected.
    match request.header("Content-Type") {
        Some(JSON_CONTENT_TYPE) => {}
        other => {
            return Err(AppError::UnsupportedMediaType(
                other.unwrap_or("<none>").to_string(),
            ))
        }
    }

    let body = request.body_text()?;
    let parsed: serde_json::Value =
        serde_json::from_str(&body).map_err(|e| AppError::InvalidJson(e.to_string()))?;

    let data = match config.data_encoding {
        DataEncoding::Parsed => parsed,
        // Legacy tokens hold the body's JSON string literal, quotes included.
        DataEncoding::RawString => serde_json::Value::String(
            serde_json::to_string(&body)
                .map_err(|e| AppError::Internal(format!("failed to encode body: {e}")))?,
        ),
    };

    let token = config.jwt.issue(data, now)?;
    tracing::debug!(nbf = now + config.jwt.not_before_secs, exp = now + config.jwt.expires_in_secs, "Issued token");

    Response::json(201, &TokenResponse { token })
}

#[cfg(test)]
mod tests {
    use auth::{SigningSecret, Verification};
    use serde_json::json;

    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn config() -> FunctionConfig {
        FunctionConfig::new(SigningSecret::new("NOTASECRET"))
    }

    fn json_request(body: &str) -> Request {
        Request::new("POST", "/token")
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    fn token_of(response: &Response) -> String {
        let parsed: TokenResponse = serde_json::from_str(&response.body).unwrap();
        parsed.token
    }

    #[test]
    fn test_issues_token() {
        let config = config();
        let response = issue_token(&config, &json_request(r#"{"name":"bboe"}"#), NOW).unwrap();

        assert_eq!(response.status_code, 201);
        assert!(response.body.ends_with('\n'));

        let token = token_of(&response);
        match config.jwt.verify(&token, NOW + 2) {
            Verification::Valid(claims) => {
                assert_eq!(claims.data, json!({"name": "bboe"}));
                assert_eq!(claims.nbf, NOW + 2);
                assert_eq!(claims.exp, NOW + 5);
            }
            other => panic!("expected valid token, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_string_encoding_double_encodes_body() {
        let config = config().with_data_encoding(DataEncoding::RawString);
        let body = r#"{"name": "bboe"}"#;
        let token = token_of(&issue_token(&config, &json_request(body), NOW).unwrap());

        match config.jwt.verify(&token, NOW + 3) {
            Verification::Valid(claims) => {
                assert_eq!(claims.data, json!(r#""{\"name\": \"bboe\"}""#));
            }
            other => panic!("expected valid token, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_content_type() {
        for content_type in ["text/plain", "application/json; charset=utf-8", "APPLICATION/JSON"] {
            let request = Request::new("POST", "/token")
                .with_header("Content-Type", content_type)
                .with_body("{}");
            let result = issue_token(&config(), &request, NOW);
            assert!(matches!(result, Err(AppError::UnsupportedMediaType(_))), "{content_type}");
        }

        let request = Request::new("POST", "/token").with_body("{}");
        let result = issue_token(&config(), &request, NOW);
        assert!(matches!(result, Err(AppError::UnsupportedMediaType(_))));
    }

    #[test]
    fn test_invalid_json() {
        for body in ["", "{", "name=bboe", "{'name': 'bboe'}"] {
            let result = issue_token(&config(), &json_request(body), NOW);
            assert!(matches!(result, Err(AppError::InvalidJson(_))), "{body:?}");
        }
    }

    #[test]
    fn test_absent_body_is_invalid_json() {
        let request = Request::new("POST", "/token").with_header("Content-Type", "application/json");
        let result = issue_token(&config(), &request, NOW);
        assert!(matches!(result, Err(AppError::InvalidJson(_))));
    }
}
