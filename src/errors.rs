use crate::auth::AuthError;
use crate::db::errors::DBError;
use crate::extraction::ExtractionError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read with serde: {0}")]
    SerdeError(#[from] serde_json::error::Error),
    #[error("socket address parsing error: {0}")]
    SocketAddressParsingError(#[from] std::net::AddrParseError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    AppErrors(#[from] AppErrors),
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("seed data file not found")]
    DataFileNotFound,
}

#[derive(Error, Debug)]
pub enum AppErrors {
    #[error(transparent)]
    DatabaseError(#[from] DBError),
    #[error(transparent)]
    AuthError(#[from] AuthError),
    #[error(transparent)]
    ExtractionError(#[from] ExtractionError),
    #[error(transparent)]
    ValidationError(#[from] validator::ValidationErrors),
    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),
    #[error("failed to parse string as url: {0}")]
    UrlParseError(#[from] url::ParseError),
}

impl AppErrors {
    fn status_code(&self) -> StatusCode {
        match self {
            AppErrors::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppErrors::ValidationError(_)
            | AppErrors::ExtractionError(_)
            | AppErrors::UrlParseError(_) => StatusCode::BAD_REQUEST,
            AppErrors::DatabaseError(DBError::UnknownProduct) => StatusCode::BAD_REQUEST,
            AppErrors::DatabaseError(DBError::UnknownStatus(_)) => StatusCode::BAD_REQUEST,
            AppErrors::DatabaseError(_) | AppErrors::ConfigurationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppErrors {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
