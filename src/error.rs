//! Error taxonomy shared by the handlers and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::accounts::repo_types::UniqueField;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", .0.duplicate_message())]
    DuplicateField(UniqueField),
    #[error("Registration failed.")]
    RegistrationFailed,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Table '{0}' not found")]
    TableNotFound(String),
    #[error("No valid columns provided for insertion")]
    NoValidColumns,
    #[error("Insert failed: {0}")]
    InsertFailed(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateField(_)
            | AppError::RegistrationFailed
            | AppError::InvalidCredentials
            | AppError::NoValidColumns
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::TableNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsertFailed(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
