//! The service level error type and its mapping onto HTTP responses.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;

/// The errors that may occur while serving a request.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum AppError {
    /// The seed feed could not be fetched, or its contents were not a list of
    /// valid transaction records.
    #[error("Error fetching seed data: {0}")]
    UpstreamFetch(String),

    /// Deleting or inserting records failed.
    #[error("Error writing to the transaction store: {0}")]
    StoreWrite(String),

    /// A find, count or aggregation against the store failed.
    #[error("Error reading from the transaction store: {0}")]
    StoreRead(String),

    /// The month name is not one of the twelve English month names.
    #[error("Invalid month: {0:?}")]
    InvalidMonth(String),

    /// The request omitted a month where one is required.
    #[error("Missing required query parameter: month")]
    MissingMonth,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidMonth(_) | AppError::MissingMonth => StatusCode::BAD_REQUEST,
            AppError::UpstreamFetch(_) | AppError::StoreWrite(_) | AppError::StoreRead(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(value: mongodb::error::Error) -> Self {
        AppError::StoreRead(value.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        AppError::UpstreamFetch(value.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }

        (status, self.to_string()).into_response()
    }
}
