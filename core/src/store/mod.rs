// stockroom/src/store/mod.rs

//! The product store: a SQLite `products` table plus its key generator.

pub mod queries;
pub mod schema;
pub mod tx;

pub use tx::{OpenTx, TxSlot};

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{info, instrument};

use crate::error::Result;
use crate::models::product::{Product, SequenceStatus, ValidProduct};

/// Sample catalogue written by [`ProductStore::seed_defaults`].
const DEFAULT_PRODUCTS: [(&str, &str, f64, i64, &str); 5] = [
  ("Laptop", "LP001", 9999.00, 15, "Latest version laptop with high performance"),
  ("Keyboard", "KB001", 120.00, 20, "Mechanical keyboard with RGB lighting"),
  ("Mouse", "MS001", 55.00, 50, "Wireless optical mouse"),
  ("Monitor", "MN001", 300.00, 10, "27 inch 4K monitor"),
  ("Headphones", "HP001", 200.00, 25, "Noise cancelling wireless headphones"),
];

#[derive(Debug, Clone)]
pub struct ProductStore {
  pool: SqlitePool,
}

impl ProductStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Connects to `database_url`, creating the database file if needed.
  pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
    let options = SqliteConnectOptions::from_str(database_url)?
      .create_if_missing(true)
      .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
      .max_connections(max_connections)
      .connect_with(options)
      .await?;
    Ok(Self::new(pool))
  }

  /// A private in-memory database. Every pooled connection to `:memory:`
  /// opens its own database, so the pool is pinned to one connection that
  /// is never recycled.
  pub async fn in_memory() -> Result<Self> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .min_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
      .connect_with(options)
      .await?;
    Ok(Self::new(pool))
  }

  pub fn pool(&self) -> &SqlitePool {
    &self.pool
  }

  pub async fn ensure_schema(&self) -> Result<()> {
    let mut conn = self.pool.acquire().await?;
    schema::ensure_schema(&mut conn).await
  }

  pub async fn list(&self) -> Result<Vec<Product>> {
    let mut conn = self.pool.acquire().await?;
    queries::fetch_all_ordered(&mut conn).await
  }

  pub async fn find(&self, id: i64) -> Result<Option<Product>> {
    let mut conn = self.pool.acquire().await?;
    queries::fetch_product(&mut conn, id).await
  }

  pub async fn sequence_status(&self) -> Result<SequenceStatus> {
    let mut conn = self.pool.acquire().await?;
    let count = queries::count_products(&mut conn).await?;
    let next_id = queries::next_id(&mut conn).await?;
    Ok(SequenceStatus { count, next_id })
  }

  /// Replaces the whole table with the sample catalogue (ids 1..=5).
  #[instrument(name = "store::seed_defaults", skip(self), err)]
  pub async fn seed_defaults(&self) -> Result<usize> {
    let now = Utc::now();
    let mut tx = self.pool.begin().await?;
    queries::clear_products(&mut tx).await?;
    for (name, sku, price, quantity, description) in DEFAULT_PRODUCTS {
      let row = ValidProduct {
        name: name.to_string(),
        sku: sku.to_string(),
        price,
        quantity,
        description: Some(description.to_string()),
      };
      queries::insert_product(&mut tx, &row, now).await?;
    }
    tx.commit().await?;
    info!(count = DEFAULT_PRODUCTS.len(), "Products seeded successfully.");
    Ok(DEFAULT_PRODUCTS.len())
  }
}
