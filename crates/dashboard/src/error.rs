use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crypto_tracker_core::errors::CoreError;

use crate::render;

/// Errors surfaced by dashboard handlers.
///
/// Pipeline failures are fatal for the request: the user gets an error page
/// and no charts.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl DashboardError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(CoreError::Network(_) | CoreError::Api { .. }) => StatusCode::BAD_GATEWAY,
            Self::Core(CoreError::PriceNotAvailable { .. }) => StatusCode::BAD_GATEWAY,
            Self::Core(CoreError::SnapshotNotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Core(CoreError::ValidationError(_)) => StatusCode::BAD_REQUEST,
            Self::Core(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Lead-in shown above the error message, by failure class.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Core(
                CoreError::Network(_) | CoreError::Api { .. } | CoreError::PriceNotAvailable { .. },
            ) => "Failed to fetch data",
            Self::Core(CoreError::SnapshotNotFound { .. } | CoreError::InvalidSnapshot { .. }) => {
                "Snapshot unavailable"
            }
            Self::Core(CoreError::ValidationError(_)) | Self::BadRequest(_) => {
                "Invalid request"
            }
            Self::NotFound(_) => "Not found",
            Self::Core(_) | Self::Render(_) => "Run failed",
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(%status, error = %self, "request failed");
        (status, Html(render::error_page(self.headline(), &self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failures_are_bad_gateway() {
        let err = DashboardError::from(CoreError::Network("connection refused".into()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_snapshot_is_not_found() {
        let err = DashboardError::from(CoreError::SnapshotNotFound {
            symbol: "ETHUSDT".into(),
            date: "2025-01-15".into(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("ETHUSDT"));
    }

    #[test]
    fn headline_depends_on_failure_class() {
        let fetch = DashboardError::from(CoreError::Network("timeout".into()));
        assert_eq!(fetch.headline(), "Failed to fetch data");

        let snapshot = DashboardError::from(CoreError::SnapshotNotFound {
            symbol: "BTCUSDT".into(),
            date: "2025-01-15".into(),
        });
        assert_eq!(snapshot.headline(), "Snapshot unavailable");

        let selector = DashboardError::BadRequest("invalid snapshot date".into());
        assert_eq!(selector.headline(), "Invalid request");
        assert_eq!(selector.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn malformed_payload_is_internal() {
        let err = DashboardError::from(CoreError::Deserialization("expected array".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
