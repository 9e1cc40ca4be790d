//! Line-delimited event loop.
//!
//! Reads one JSON request per line and writes one JSON response per line.
//! Invocations are handled one at a time and share only the router.

use anyhow::Result;
use error::AppError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::event::{Request, Response};
use crate::router::TokenRouter;

/// Serve events until `input` is exhausted. Returns the number handled.
pub async fn run_event_loop<R, W>(router: &TokenRouter, mut input: R, mut output: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut handled = 0;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        // Bytes are decoded per line so one bad invocation cannot end the stream.
        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match serde_json::from_str::<Request>(line) {
                Ok(request) => router.handle(&request),
                Err(e) => reject_event(AppError::MalformedEvent(e.to_string())),
            },
            Err(e) => reject_event(AppError::MalformedEvent(e.to_string())),
        };

        let mut encoded = serde_json::to_string(&response)?;
        encoded.push('\n');
        output.write_all(encoded.as_bytes()).await?;
        output.flush().await?;
        handled += 1;
    }

    tracing::debug!("Event stream closed after {} events", handled);
    Ok(handled)
}

fn reject_event(err: AppError) -> Response {
    tracing::warn!("Skipping event: {}", err);
    Response::from_error(&err)
}

#[cfg(test)]
mod tests {
    use auth::SigningSecret;

    use super::*;
    use crate::config::FunctionConfig;

    fn router() -> TokenRouter {
        TokenRouter::new(FunctionConfig::new(SigningSecret::new("NOTASECRET")))
    }

    async fn run(input: &str) -> (usize, Vec<Response>) {
        let mut output = Vec::new();
        let handled = run_event_loop(&router(), input.as_bytes(), &mut output)
            .await
            .unwrap();
        let responses = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (handled, responses)
    }

    #[tokio::test]
    async fn test_one_response_per_event() {
        let input = concat!(
            r#"{"httpMethod":"POST","path":"/token","headers":{"Content-Type":"application/json"},"body":"{\"name\":\"bboe\"}"}"#,
            "\n",
            r#"{"httpMethod":"GET","path":"/","headers":{}}"#,
            "\n",
            r#"{"httpMethod":"GET","path":"/nope"}"#,
            "\n",
        );

        let (handled, responses) = run(input).await;
        assert_eq!(handled, 3);
        let statuses: Vec<u16> = responses.iter().map(|r| r.status_code).collect();
        assert_eq!(statuses, vec![201, 403, 405]);
    }

    #[tokio::test]
    async fn test_malformed_event_yields_400() {
        let input = "not json\n\n{\"httpMethod\":\"DELETE\",\"path\":\"/\"}\n";

        let (handled, responses) = run(input).await;
        assert_eq!(handled, 2);
        assert_eq!(responses[0], Response::empty(400));
        assert_eq!(responses[1], Response::empty(405));
    }

    #[tokio::test]
    async fn test_invalid_utf8_event_yields_400() {
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(b"{\"httpMethod\":\"GET\",\"path\":\"/nope\"}\n");

        let mut output = Vec::new();
        let handled = run_event_loop(&router(), input.as_slice(), &mut output)
            .await
            .unwrap();

        let statuses: Vec<u16> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<Response>(line).unwrap().status_code)
            .collect();
        assert_eq!(handled, 2);
        assert_eq!(statuses, vec![400, 405]);
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let (handled, responses) = run(r#"{"httpMethod":"GET","path":"/"}"#).await;
        assert_eq!(handled, 1);
        assert_eq!(responses[0], Response::empty(403));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let (handled, responses) = run("").await;
        assert_eq!(handled, 0);
        assert!(responses.is_empty());
    }
}
