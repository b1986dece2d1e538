// stockroom/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;
use validator::ValidationErrors;

/// Failures raised by the workflow engine itself (as opposed to the
/// business logic running inside step handlers).
#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Type mismatch during context downcast (expected {expected_type}, step: '{step_name}')")]
  TypeMismatch {
    step_name: String,
    expected_type: String,
  },

  #[error("Error in step handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error for step '{step_name}': {message}")]
  ConfigurationError { step_name: String, message: String },

  #[error("Internal workflow error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for WorkflowError {
  fn from(err: AnyhowError) -> Self {
    WorkflowError::HandlerError { source: err }
  }
}

pub type WorkflowResult<T, E = WorkflowError> = std::result::Result<T, E>;

/// Errors surfaced by the product catalog and the renumber workflows.
#[derive(Debug, Error)]
pub enum InventoryError {
  /// The target product does not exist. Nothing was mutated.
  #[error("Product not found")]
  NotFound { id: i64 },

  #[error("Validation failed: {0}")]
  Validation(#[from] ValidationErrors),

  /// Any failure inside the store. Transactional work has been rolled back.
  #[error("{message}")]
  Store { message: String },

  #[error("Workflow error: {source}")]
  Workflow {
    #[from]
    source: WorkflowError,
  },
}

impl InventoryError {
  pub fn store(message: impl Into<String>) -> Self {
    InventoryError::Store {
      message: message.into(),
    }
  }

  /// Collapses everything except `NotFound` into a `Store` failure carrying
  /// the underlying message.
  pub(crate) fn into_store_failure(self) -> Self {
    match self {
      InventoryError::NotFound { .. } | InventoryError::Store { .. } => self,
      other => InventoryError::Store {
        message: other.to_string(),
      },
    }
  }
}

impl From<sqlx::Error> for InventoryError {
  fn from(err: sqlx::Error) -> Self {
    InventoryError::Store {
      message: err.to_string(),
    }
  }
}

pub type Result<T, E = InventoryError> = std::result::Result<T, E>;
