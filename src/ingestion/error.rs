//! Errors raised at the Overpass HTTP boundary

use reqwest::StatusCode;
use thiserror::Error;

/// Characters of a response body kept in an error message
pub const BODY_SNIPPET_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP request failed: {status}: {}", snippet(.body))]
    Status { status: StatusCode, body: String },

    #[error("Rate limited, gave up after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Malformed Overpass response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Response has no osm3s metadata")]
    MissingMetadata,

    #[error("Invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Trimmed body, cut to [`BODY_SNIPPET_CHARS`] on a char boundary
fn snippet(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(BODY_SNIPPET_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_shows_body() {
        let err = QueryError::Status {
            status: StatusCode::GATEWAY_TIMEOUT,
            body: "runtime error: out of memory\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP request failed: 504 Gateway Timeout: runtime error: out of memory"
        );
    }

    #[test]
    fn test_status_error_truncates_long_body() {
        let err = QueryError::Status {
            status: StatusCode::BAD_REQUEST,
            body: "ż".repeat(BODY_SNIPPET_CHARS + 50),
        };
        let message = err.to_string();
        assert!(message.ends_with("..."));
        assert_eq!(message.matches('ż').count(), BODY_SNIPPET_CHARS);
    }
}
