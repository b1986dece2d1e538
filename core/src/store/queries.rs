// stockroom/src/store/queries.rs

//! Statements against the `products` table. Every function takes a plain
//! connection so the same code runs on a pooled connection or inside an open
//! transaction.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::error::Result;
use crate::models::product::{Product, ValidProduct};
use crate::store::schema::PRODUCTS_TABLE;

const PRODUCT_COLUMNS: &str = "id, name, sku, price, quantity, description, created_at, updated_at";

pub async fn fetch_product(conn: &mut SqliteConnection, id: i64) -> Result<Option<Product>> {
  let product = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
  Ok(product)
}

/// All rows ordered by current id ascending.
pub async fn fetch_all_ordered(conn: &mut SqliteConnection) -> Result<Vec<Product>> {
  let products = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC"))
    .fetch_all(&mut *conn)
    .await?;
  Ok(products)
}

pub async fn count_products(conn: &mut SqliteConnection) -> Result<i64> {
  let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
    .fetch_one(&mut *conn)
    .await?;
  Ok(count)
}

pub async fn delete_product(conn: &mut SqliteConnection, id: i64) -> Result<u64> {
  let result = sqlx::query("DELETE FROM products WHERE id = ?")
    .bind(id)
    .execute(&mut *conn)
    .await?;
  Ok(result.rows_affected())
}

/// True when another row (other than `exclude_id`) already uses `sku`.
pub async fn sku_taken(conn: &mut SqliteConnection, sku: &str, exclude_id: Option<i64>) -> Result<bool> {
  let taken: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE sku = ? AND id IS NOT ?)")
    .bind(sku)
    .bind(exclude_id)
    .fetch_one(&mut *conn)
    .await?;
  Ok(taken != 0)
}

pub async fn insert_product(conn: &mut SqliteConnection, input: &ValidProduct, now: DateTime<Utc>) -> Result<Product> {
  let id = sqlx::query(
    "INSERT INTO products (name, sku, price, quantity, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
  )
  .bind(&input.name)
  .bind(&input.sku)
  .bind(input.price)
  .bind(input.quantity)
  .bind(&input.description)
  .bind(now)
  .bind(now)
  .execute(&mut *conn)
  .await?
  .last_insert_rowid();

  Ok(Product {
    id,
    name: input.name.clone(),
    sku: input.sku.clone(),
    price: input.price,
    quantity: input.quantity,
    description: input.description.clone(),
    created_at: now,
    updated_at: now,
  })
}

pub async fn update_product(
  conn: &mut SqliteConnection,
  id: i64,
  input: &ValidProduct,
  now: DateTime<Utc>,
) -> Result<u64> {
  let result = sqlx::query(
    "UPDATE products SET name = ?, sku = ?, price = ?, quantity = ?, description = ?, updated_at = ? WHERE id = ?",
  )
  .bind(&input.name)
  .bind(&input.sku)
  .bind(input.price)
  .bind(input.quantity)
  .bind(&input.description)
  .bind(now)
  .bind(id)
  .execute(&mut *conn)
  .await?;
  Ok(result.rows_affected())
}

/// Reinserts a previously read row without its id, so the store assigns a
/// fresh one. `created_at` is carried over and `updated_at` set to `refreshed_at`.
/// Returns the id the store assigned.
pub async fn reinsert_product(
  conn: &mut SqliteConnection,
  product: &Product,
  refreshed_at: DateTime<Utc>,
) -> Result<i64> {
  let id = sqlx::query(
    "INSERT INTO products (name, sku, price, quantity, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
  )
  .bind(&product.name)
  .bind(&product.sku)
  .bind(product.price)
  .bind(product.quantity)
  .bind(&product.description)
  .bind(product.created_at)
  .bind(refreshed_at)
  .execute(&mut *conn)
  .await?
  .last_insert_rowid();
  Ok(id)
}

/// Removes every row and the table's counter entry, so the next insert gets id 1.
pub async fn clear_products(conn: &mut SqliteConnection) -> Result<u64> {
  let removed = sqlx::query("DELETE FROM products")
    .execute(&mut *conn)
    .await?
    .rows_affected();
  sqlx::query("DELETE FROM sqlite_sequence WHERE name = ?")
    .bind(PRODUCTS_TABLE)
    .execute(&mut *conn)
    .await?;
  Ok(removed)
}

/// Points the key generator at `last_id`, so the next issued id is `last_id + 1`.
/// With `last_id == 0` the counter entry is dropped and ids restart at 1.
pub async fn reset_counter(conn: &mut SqliteConnection, last_id: i64) -> Result<()> {
  if last_id <= 0 {
    sqlx::query("DELETE FROM sqlite_sequence WHERE name = ?")
      .bind(PRODUCTS_TABLE)
      .execute(&mut *conn)
      .await?;
    return Ok(());
  }

  let updated = sqlx::query("UPDATE sqlite_sequence SET seq = ? WHERE name = ?")
    .bind(last_id)
    .bind(PRODUCTS_TABLE)
    .execute(&mut *conn)
    .await?
    .rows_affected();
  if updated == 0 {
    sqlx::query("INSERT INTO sqlite_sequence (name, seq) VALUES (?, ?)")
      .bind(PRODUCTS_TABLE)
      .bind(last_id)
      .execute(&mut *conn)
      .await?;
  }
  Ok(())
}

/// The id the store will assign to the next insert.
pub async fn next_id(conn: &mut SqliteConnection) -> Result<i64> {
  let next: i64 = sqlx::query_scalar(
    "SELECT MAX(COALESCE((SELECT seq FROM sqlite_sequence WHERE name = ?), 0), COALESCE((SELECT MAX(id) FROM products), 0)) + 1",
  )
  .bind(PRODUCTS_TABLE)
  .fetch_one(&mut *conn)
  .await?;
  Ok(next)
}

/// Defers foreign-key enforcement to commit time for the current transaction.
/// SQLite ignores `PRAGMA foreign_keys` inside a transaction, so deferral is
/// the only relaxation available here; it resets itself at commit or rollback.
pub async fn relax_foreign_keys(conn: &mut SqliteConnection) -> Result<()> {
  sqlx::query("PRAGMA defer_foreign_keys = ON").execute(&mut *conn).await?;
  Ok(())
}

pub async fn restore_foreign_keys(conn: &mut SqliteConnection) -> Result<()> {
  sqlx::query("PRAGMA defer_foreign_keys = OFF").execute(&mut *conn).await?;
  Ok(())
}
