// stockroom/src/store/schema.rs

//! Table definition for the product store. There are no versioned
//! migrations: the table is created when missing and otherwise left alone.

use sqlx::SqliteConnection;

use crate::error::Result;

pub const PRODUCTS_TABLE: &str = "products";

// AUTOINCREMENT makes SQLite keep the key generator in `sqlite_sequence`,
// which is the counter the renumber workflows reset.
const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
  id          INTEGER PRIMARY KEY AUTOINCREMENT,
  name        TEXT    NOT NULL CHECK (length(name) BETWEEN 1 AND 255),
  sku         TEXT    NOT NULL UNIQUE,
  price       REAL    NOT NULL CHECK (price >= 0),
  quantity    INTEGER NOT NULL CHECK (quantity >= 0),
  description TEXT,
  created_at  TEXT    NOT NULL,
  updated_at  TEXT    NOT NULL
)
"#;

pub async fn ensure_schema(conn: &mut SqliteConnection) -> Result<()> {
  sqlx::query(CREATE_PRODUCTS_TABLE).execute(&mut *conn).await?;
  tracing::debug!(table = PRODUCTS_TABLE, "Product schema ensured.");
  Ok(())
}
