//! # Error Handling Middleware
//!
//! Maps `CareError` values to HTTP status codes and a JSON body of the form
//! `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use carebook_core::errors::CareError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use carebook_api::middleware::error_handling::AppError;
/// use carebook_core::{errors::CareError, models::doctor::Doctor};
///
/// fn find(doctors: Vec<Doctor>, name: &str) -> Result<Json<Doctor>, AppError> {
///     let doctor = doctors
///         .into_iter()
///         .find(|d| d.name == name)
///         .ok_or_else(|| CareError::NotFound(format!("Doctor {} not found", name)))?;
///     Ok(Json(doctor))
/// }
/// ```
#[derive(Debug)]
pub struct AppError(pub CareError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CareError::NotFound(_) => StatusCode::NOT_FOUND,
            CareError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CareError::SlotConflict(_) => StatusCode::CONFLICT,
            CareError::Unauthorized(_) => StatusCode::FORBIDDEN,
            CareError::TooLate(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CareError::InvalidState(_) => StatusCode::CONFLICT,
            CareError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CareError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage details stay in the logs
        let message = match &self.0 {
            CareError::Database(report) => {
                tracing::error!("Request failed: {:?}", report);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<CareError> for AppError {
    fn from(err: CareError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(CareError::Database(err))
    }
}

/// Maps a CareError to an HTTP response
pub fn map_error(err: CareError) -> Response {
    AppError(err).into_response()
}
