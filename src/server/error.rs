//! Error-to-HTTP response conversion.
//!
//! Handlers return `Result<T, ApiError>`; every failure becomes a JSON body
//! of the form `{"error": "..."}` with a matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::downloader::DownloadError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// `url` query parameter absent or empty
    #[error("URL parameter is required")]
    MissingUrl,

    /// Extraction reported success but the file is not on disk
    #[error("Download failed")]
    DownloadFailed,

    /// Any other extractor or staging failure, message passed through
    #[error(transparent)]
    Extraction(DownloadError),
}

impl From<DownloadError> for ApiError {
    fn from(e: DownloadError) -> Self {
        match e {
            DownloadError::ArtifactMissing(_) => Self::DownloadFailed,
            other => Self::Extraction(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingUrl => StatusCode::BAD_REQUEST,
            Self::DownloadFailed | Self::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self,
                "Server error in API handler"
            );
        }

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
