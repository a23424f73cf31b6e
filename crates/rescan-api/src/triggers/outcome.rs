//! Status-only responses returned to notification senders.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Terminal result of handling one trigger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Test acknowledged or scan dispatched.
    Ok,
    /// Malformed, incomplete or unsupported notification.
    BadRequest,
    /// The processor failed.
    InternalError,
}

impl TriggerOutcome {
    /// HTTP status for this outcome.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Ok => StatusCode::OK,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metrics label for this outcome.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::BadRequest => "bad_request",
            Self::InternalError => "internal_error",
        }
    }
}

impl IntoResponse for TriggerOutcome {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responses_carry_status_and_empty_body() {
        for (outcome, status) in [
            (TriggerOutcome::Ok, StatusCode::OK),
            (TriggerOutcome::BadRequest, StatusCode::BAD_REQUEST),
            (TriggerOutcome::InternalError, StatusCode::INTERNAL_SERVER_ERROR),
        ] {
            let response = outcome.into_response();
            assert_eq!(response.status(), status);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body");
            assert!(body.is_empty());
        }
    }

    #[test]
    fn labels_match_metric_snapshot_fields() {
        assert_eq!(TriggerOutcome::Ok.label(), "ok");
        assert_eq!(TriggerOutcome::BadRequest.label(), "bad_request");
        assert_eq!(TriggerOutcome::InternalError.label(), "internal_error");
    }
}
