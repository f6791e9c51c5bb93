//! API request and response types.

use serde::{Deserialize, Serialize};

/// POST `/query` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// Free-text travel question, e.g. "Plan a trip to Goa for 5 days"
    pub question: String,
}

/// Successful POST `/query` response.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    /// Markdown travel plan produced by the agent
    pub answer: String,
}

/// Error envelope for failed requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Machine-readable failure kind plus a human-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                kind: kind.to_string(),
                message: message.into(),
            },
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_responses_nest_kind_and_message() {
        let body = ErrorResponse::new("reasoning_unavailable", "connection refused");
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["error"]["kind"], "reasoning_unavailable");
        assert_eq!(json["error"]["message"], "connection refused");
    }

    #[test]
    fn query_request_parses_the_documented_shape() {
        let request: QueryRequest =
            serde_json::from_str(r#"{ "question": "Plan a trip to Goa for 5 days" }"#)
                .expect("parse");
        assert_eq!(request.question, "Plan a trip to Goa for 5 days");
    }
}
