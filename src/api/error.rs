use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::binance::FetchError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid Token")]
    InvalidToken,
    #[error("{0}")]
    Upstream(#[from] FetchError),
    #[error("Database error: {0}")]
    Database(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    msg: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(ErrorResponse {
            msg: self.to_string(),
        });

        (status, body).into_response()
    }
}
