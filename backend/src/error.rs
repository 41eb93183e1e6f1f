//! Error handling for the Wheat Receiving Tracker
//!
//! Provides consistent error responses in Portuguese and English

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ImportError;
use thiserror::Error;

use crate::store::StoreError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Import errors (strict tier)
    #[error("Import rejected: {0}")]
    Import(#[from] ImportError),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_pt: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Validation error on a single input field
    pub fn validation(field: &str, message: &str, message_pt: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_pt: message_pt.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Import(_) | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Import(err) => import_detail(err),
            AppError::Validation {
                field,
                message,
                message_pt,
            } => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message_en: message.clone(),
                message_pt: message_pt.clone(),
                field: Some(field.clone()),
            },
            AppError::NotFound(resource) => ErrorDetail {
                code: "NOT_FOUND".to_string(),
                message_en: format!("{} not found", resource),
                message_pt: format!("{} não encontrado", resource),
                field: None,
            },
            AppError::Storage(_) => ErrorDetail {
                code: "STORAGE_ERROR".to_string(),
                message_en: "Failed to save data".to_string(),
                message_pt: "Erro ao salvar os dados".to_string(),
                field: None,
            },
            AppError::Internal(msg) => ErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message_en: msg.clone(),
                message_pt: "Erro interno do servidor".to_string(),
                field: None,
            },
        }
    }
}

fn import_detail(err: &ImportError) -> ErrorDetail {
    let (code, message_pt) = match err {
        ImportError::MissingColumns { required, .. } => (
            "MISSING_COLUMNS",
            format!("O arquivo deve ter as colunas: {}", required.join(", ")),
        ),
        ImportError::InvalidDate { row, value } => (
            "INVALID_DATE",
            format!(
                "Data inválida '{}' na linha {}. Use formato AAAA-MM-DD",
                value, row
            ),
        ),
        ImportError::InvalidQuantity { row, value } => (
            "INVALID_QUANTITY",
            format!("Valor de quantidade inválido '{}' na linha {}", value, row),
        ),
        ImportError::InvalidShift { row, value } => (
            "INVALID_SHIFT",
            format!(
                "Turno inválido '{}' na linha {}. Use Manhã, Tarde ou Noite",
                value, row
            ),
        ),
    };

    ErrorDetail {
        code: code.to_string(),
        message_en: err.to_string(),
        message_pt,
        field: err.field().map(str::to_string),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_detail = self.detail();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
