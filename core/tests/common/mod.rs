// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use once_cell::sync::Lazy;
use stockroom::{ContextData, PipelineControl, Product, ProductCatalog, ProductInput, ProductStore, WorkflowError};
use tracing::Level;

// --- Contexts and error for engine tests ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Workflow error: {0}")]
  Workflow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<WorkflowError> for TestError {
  fn from(err: WorkflowError) -> Self {
    TestError::Workflow(format!("{:?}", err))
  }
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> stockroom::core::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, counter = guard.counter, "executed");
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> stockroom::core::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      tracing::warn!(target: "test_handlers", step = step_name, "failing with: '{}'", error_message);
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Store helpers ---

/// Fresh private in-memory store with the schema in place.
pub async fn empty_store() -> ProductStore {
  setup_tracing();
  let store = ProductStore::in_memory().await.expect("in-memory store");
  store.ensure_schema().await.expect("schema");
  store
}

/// Catalog over a store holding the five default products (ids 1..=5).
pub async fn seeded_catalog() -> ProductCatalog {
  let store = empty_store().await;
  store.seed_defaults().await.expect("seed");
  ProductCatalog::new(store)
}

pub fn input(name: &str, sku: &str, price: f64, quantity: i64) -> ProductInput {
  ProductInput {
    name: Some(name.to_string()),
    sku: Some(sku.to_string()),
    price: Some(price.into()),
    quantity: Some(quantity.into()),
    description: None,
  }
}

pub fn ids(products: &[Product]) -> Vec<i64> {
  products.iter().map(|p| p.id).collect()
}

pub fn skus(products: &[Product]) -> Vec<String> {
  products.iter().map(|p| p.sku.clone()).collect()
}

/// Makes every insert of `sku` fail inside the store, so a renumber that
/// reinserts that row aborts halfway through.
pub async fn fail_inserts_of(store: &ProductStore, sku: &str) {
  let trigger = format!(
    "CREATE TRIGGER fail_insert_{sku} BEFORE INSERT ON products WHEN NEW.sku = '{sku}' \
     BEGIN SELECT RAISE(ABORT, 'insert of {sku} rejected'); END"
  );
  sqlx::query(&trigger).execute(store.pool()).await.expect("create trigger");
}
