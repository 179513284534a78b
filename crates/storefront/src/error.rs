//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::directory::DirectoryError;

/// Application-level error type for the directory site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Loading directory records failed.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Message safe to show to clients.
    #[must_use]
    pub fn public_message(&self) -> String {
        // Don't expose internal error details to clients
        match self {
            Self::Directory(_) => "データを取得できませんでした".to_string(),
            Self::NotFound(_) => self.to_string(),
        }
    }

    /// Capture server-side errors to Sentry and the error log.
    pub(crate) fn report(&self) {
        if matches!(self, Self::Directory(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        (self.status(), self.public_message()).into_response()
    }
}

/// Error responses for the JSON API.
///
/// Serializes as `{"error": "..."}`. Directory failures on store endpoints
/// use [`stores_unavailable`] instead so clients always receive a `stores`
/// array.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        Self(AppError::Directory(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.report();
        let message = match &self.0 {
            AppError::NotFound(what) => what.clone(),
            AppError::Directory(_) => "Failed to fetch data".to_string(),
        };
        (self.0.status(), Json(json!({ "error": message }))).into_response()
    }
}

/// The store API failure body: `{"stores": [], "error": "Failed to fetch stores"}`.
///
/// `seq` is echoed so clients can discard failures of superseded searches.
pub fn stores_unavailable(err: DirectoryError, seq: Option<u64>) -> Response {
    AppError::from(err).report();
    let mut body = json!({ "stores": [], "error": "Failed to fetch stores" });
    if let Some(seq) = seq {
        body["seq"] = json!(seq);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
