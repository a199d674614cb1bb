// product_service/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use orka::OrkaError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  UnsupportedMediaType(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  // Cart service answered, but refused to create a cart for the user.
  #[error("cannot create shopcart: {0}")]
  ShopcartCreation(String),

  // Cart service answered, but refused the add-item request.
  #[error("cannot add product to shopcart: {0}")]
  ShopcartRejected(String),

  // Cart service could not be reached, timed out, or sent an unreadable body.
  #[error("shopcart service unavailable: {0}")]
  ShopcartUnavailable(String),

  // Pipeline wiring problems: unregistered context type, step without a handler.
  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: OrkaError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
      AppError::ShopcartCreation(_) => StatusCode::BAD_REQUEST,
      AppError::ShopcartRejected(_) => StatusCode::FAILED_DEPENDENCY,
      AppError::ShopcartUnavailable(_) => StatusCode::BAD_GATEWAY,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with error");
    }

    // Database details stay in the log, not in the response body.
    let message = match self {
      AppError::Sqlx(_) => "Database operation failed".to_string(),
      AppError::Workflow { .. } => "Workflow processing error".to_string(),
      other => other.to_string(),
    };

    HttpResponse::build(status).json(json!({
      "status": status.as_u16(),
      "error": status.canonical_reason().unwrap_or("Error"),
      "message": message,
    }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
