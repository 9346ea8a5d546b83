//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas. Cada error de
//! cliente lleva un código estable legible por máquina.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("{message}")]
    Conflict {
        code: &'static str,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: format!("Internal server error: {}", e),
                        code: Some("DB_ERROR".to_string()),
                        details: None,
                    },
                )
            }

            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "The provided data is invalid".to_string(),
                        code: Some("VALIDATION_ERROR".to_string()),
                        details: Some(json!(e)),
                    },
                )
            }

            AppError::BadRequest { code, message } => {
                tracing::warn!("Bad request [{}]: {}", code, message);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: message,
                        code: Some(code.to_string()),
                        details: None,
                    },
                )
            }

            AppError::NotFound { code, message } => {
                tracing::warn!("Resource not found [{}]: {}", code, message);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: message,
                        code: Some(code.to_string()),
                        details: None,
                    },
                )
            }

            AppError::Conflict {
                code,
                message,
                details,
            } => {
                tracing::warn!("Conflict [{}]: {}", code, message);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: message,
                        code: Some(code.to_string()),
                        details,
                    },
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: format!("Internal server error: {}", msg),
                        code: Some("INTERNAL_ERROR".to_string()),
                        details: None,
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Error de entrada del cliente con código estable
pub fn bad_request(code: &'static str, message: impl Into<String>) -> AppError {
    AppError::BadRequest {
        code,
        message: message.into(),
    }
}

/// Error de recurso no encontrado con código estable
pub fn not_found(code: &'static str, message: impl Into<String>) -> AppError {
    AppError::NotFound {
        code,
        message: message.into(),
    }
}

/// Error de campo requerido ausente
pub fn missing_field(code: &'static str, field: &str) -> AppError {
    bad_request(code, format!("{} is required", field))
}

/// Conflicto de reserva: las reservas en conflicto viajan en los detalles
pub fn booking_conflict(conflicts: serde_json::Value) -> AppError {
    AppError::Conflict {
        code: "BOOKING_CONFLICT",
        message: "Car is already booked for the requested period".to_string(),
        details: Some(json!({ "conflicts": conflicts })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_carries_code() {
        let err = bad_request("INVALID_CAR_ID", "car_id must be a valid UUID");
        match err {
            AppError::BadRequest { code, message } => {
                assert_eq!(code, "INVALID_CAR_ID");
                assert!(message.contains("valid UUID"));
            }
            _ => panic!("expected BadRequest"),
        }
    }

    #[test]
    fn test_missing_field_message() {
        let err = missing_field("MISSING_CAR_NAME", "carName");
        assert_eq!(err.to_string(), "carName is required");
    }
}
