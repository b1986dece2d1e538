// stockroom/src/catalog.rs

//! `ProductCatalog`, the service the HTTP layer talks to. Plain CRUD goes
//! straight to the store; deletes always go through the renumber workflow.

use chrono::Utc;
use sqlx::SqliteConnection;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::{ValidationError, ValidationErrors};

use crate::error::{InventoryError, Result};
use crate::models::product::{ProductInput, ValidProduct};
use crate::models::{Product, SequenceStatus};
use crate::registry::WorkflowRegistry;
use crate::renumber::{self, DeleteOutcome, RenumberReport};
use crate::store::{queries, ProductStore};

#[derive(Clone)]
pub struct ProductCatalog {
  store: ProductStore,
  workflows: Arc<WorkflowRegistry<InventoryError>>,
}

impl ProductCatalog {
  /// Wraps `store` and registers the renumber pipelines.
  pub fn new(store: ProductStore) -> Self {
    let workflows = WorkflowRegistry::new();
    renumber::register_renumber_pipelines(&workflows);
    Self {
      store,
      workflows: Arc::new(workflows),
    }
  }

  pub fn store(&self) -> &ProductStore {
    &self.store
  }

  pub async fn list(&self) -> Result<Vec<Product>> {
    self.store.list().await
  }

  pub async fn get(&self, id: i64) -> Result<Product> {
    self.store.find(id).await?.ok_or(InventoryError::NotFound { id })
  }

  #[instrument(name = "catalog::create", skip_all, fields(sku = ?input.sku), err(Display))]
  pub async fn create(&self, input: ProductInput) -> Result<Product> {
    let mut tx = self.store.pool().begin().await?;
    let valid = validate_input(&mut tx, input, None).await?;
    let product = queries::insert_product(&mut tx, &valid, Utc::now()).await?;
    tx.commit().await?;
    info!(id = product.id, sku = %product.sku, "Product created.");
    Ok(product)
  }

  /// Replaces every field of product `id`. `created_at` is kept.
  #[instrument(name = "catalog::update", skip(self, input), err(Display))]
  pub async fn update(&self, id: i64, input: ProductInput) -> Result<Product> {
    let mut tx = self.store.pool().begin().await?;
    if queries::fetch_product(&mut tx, id).await?.is_none() {
      return Err(InventoryError::NotFound { id });
    }
    let valid = validate_input(&mut tx, input, Some(id)).await?;
    queries::update_product(&mut tx, id, &valid, Utc::now()).await?;
    let product = queries::fetch_product(&mut tx, id)
      .await?
      .ok_or(InventoryError::NotFound { id })?;
    tx.commit().await?;
    info!(id, "Product updated.");
    Ok(product)
  }

  pub async fn sequence_status(&self) -> Result<SequenceStatus> {
    self.store.sequence_status().await
  }

  /// Deletes product `id` and compacts the remaining ids to `1..=N`.
  pub async fn delete_and_renumber(&self, id: i64) -> Result<DeleteOutcome> {
    renumber::delete_and_renumber(&self.workflows, self.store.pool(), id).await
  }

  pub async fn renumber_all(&self) -> Result<RenumberReport> {
    renumber::renumber_all(&self.workflows, self.store.pool()).await
  }
}

/// Runs the input checks plus the SKU uniqueness check and collects every
/// violation into one `ValidationErrors`.
async fn validate_input(
  conn: &mut SqliteConnection,
  input: ProductInput,
  exclude_id: Option<i64>,
) -> Result<ValidProduct> {
  let mut errors = match input.check() {
    Ok(()) => ValidationErrors::new(),
    Err(errors) => errors,
  };

  if let Some(sku) = input.sku.as_deref().filter(|s| !s.is_empty()) {
    if queries::sku_taken(conn, sku, exclude_id).await? {
      debug!(sku, "SKU already in use.");
      let mut unique = ValidationError::new("unique");
      unique.message = Some(Cow::from("The sku has already been taken."));
      errors.add("sku", unique);
    }
  }

  if !errors.is_empty() {
    return Err(InventoryError::Validation(errors));
  }
  input
    .into_valid()
    .ok_or_else(|| InventoryError::store("validated product input is missing a required field"))
}
