use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Fixed message, the front-end matches on it verbatim.
    #[error("Falta el archivo 'csv_file'.")]
    MissingFile,
    #[error("Invalid multipart upload: {0}")]
    InvalidUpload(String),
    #[error("Failed to parse CSV: {0}")]
    CsvParse(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::CsvParse(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            AppError::CsvParse(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "detail": self.to_string()
        }));

        (status, body).into_response()
    }
}
