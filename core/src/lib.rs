// stockroom/src/lib.rs

//! Stockroom: product inventory with a transactional delete-and-renumber.
//!
//! The crate is built around a small async workflow engine:
//!  - Named steps with before/on/after hooks and skip conditions.
//!  - Early stopping of a run by any handler.
//!  - Step insertion before or after existing steps.
//!  - A type-keyed registry for running pipelines by their context data type.
//!
//! On top of it sit the SQLite product store, the renumber workflows and
//! [`ProductCatalog`], the service used by the HTTP application.

pub mod catalog;
pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod registry;
pub mod renumber;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};
pub use crate::pipeline::definition::{Pipeline, StepSpec};
pub use crate::registry::WorkflowRegistry;

pub use crate::error::{InventoryError, Result, WorkflowError, WorkflowResult};

pub use crate::catalog::ProductCatalog;
pub use crate::models::{Product, ProductInput, SequenceStatus};
pub use crate::renumber::{DeleteOutcome, RenumberReport};
pub use crate::store::ProductStore;

// Validation errors surface through `InventoryError::Validation`.
pub use validator::{Validate, ValidationErrors};
