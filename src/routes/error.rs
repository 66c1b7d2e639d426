// API error -> JSON response mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::{ConfigFormError, FetchError};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Form input rejected before reaching the device.
    Validation(ConfigFormError),
    /// The device could not be reached or refused the request.
    Device(FetchError),
}

impl From<ConfigFormError> for ApiError {
    fn from(err: ConfigFormError) -> Self {
        Self::Validation(err)
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        Self::Device(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Device(err) => {
                tracing::warn!(error = %err, "device request failed");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
