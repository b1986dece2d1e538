// stockroom_app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Map, Value};
use stockroom::{InventoryError, ValidationErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Inventory(#[from] InventoryError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  /// The request path did not name a resource (e.g. a non-numeric id).
  #[error("{0}")]
  NotFound(String),

  /// The request body could not be read as the expected JSON.
  #[error("Malformed request body: {0}")]
  BadRequest(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<InventoryError>() {
      Ok(inventory) => AppError::Inventory(inventory),
      Err(err) => match err.downcast::<sqlx::Error>() {
        Ok(db) => AppError::Sqlx(db),
        Err(err) => AppError::Internal(err.to_string()),
      },
    }
  }
}

/// `{field: [message, ...]}`, falling back to the rule code when a rule has no message.
fn field_messages(errors: &ValidationErrors) -> Value {
  let mut fields = Map::new();
  for (field, errs) in errors.field_errors() {
    let messages = errs
      .iter()
      .map(|e| Value::String(e.message.as_ref().map_or_else(|| e.code.to_string(), |m| m.to_string())))
      .collect();
    fields.insert(field.to_string(), Value::Array(messages));
  }
  Value::Object(fields)
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Inventory(InventoryError::NotFound { .. }) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Inventory(InventoryError::Validation(_)) | AppError::BadRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }

    let body = match self {
      AppError::Inventory(InventoryError::NotFound { .. }) | AppError::NotFound(_) => {
        json!({"success": false, "message": self.to_string()})
      }
      AppError::Inventory(InventoryError::Validation(errors)) => {
        json!({"success": false, "errors": field_messages(errors)})
      }
      AppError::BadRequest(m) => json!({"success": false, "errors": {"body": [m]}}),
      AppError::Inventory(InventoryError::Store { message }) => {
        json!({"success": false, "message": format!("Error: {}", message)})
      }
      other => json!({"success": false, "message": format!("Error: {}", other)}),
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
