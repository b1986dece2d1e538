// stockroom/src/store/tx.rs

//! A transaction slot that can be shared through pipeline context data.
//!
//! `ContextData` guards are blocking and must never cross an `.await`, but a
//! database transaction has to stay open across every step of a workflow.
//! `TxSlot` parks the transaction behind an async mutex so each step can lock
//! it, run its statements, and release it again.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::error::{InventoryError, Result};

pub type OpenTx<'a> = MutexGuard<'a, Option<Transaction<'static, Sqlite>>>;

#[derive(Clone, Default)]
pub struct TxSlot(Arc<Mutex<Option<Transaction<'static, Sqlite>>>>);

impl std::fmt::Debug for TxSlot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let open = self.0.try_lock().map(|guard| guard.is_some()).ok();
    f.debug_struct("TxSlot").field("open", &open).finish()
  }
}

impl TxSlot {
  /// Opens a transaction on `pool` and parks it in the slot.
  pub async fn begin(&self, pool: &SqlitePool) -> Result<()> {
    let mut slot = self.0.lock().await;
    if slot.is_some() {
      return Err(InventoryError::store("a transaction is already open for this workflow"));
    }
    *slot = Some(pool.begin().await?);
    debug!("Transaction opened.");
    Ok(())
  }

  pub async fn lock(&self) -> OpenTx<'_> {
    self.0.lock().await
  }

  /// Borrows the connection of the open transaction held by `guard`.
  pub fn connection<'g>(guard: &'g mut OpenTx<'_>) -> Result<&'g mut SqliteConnection> {
    guard
      .as_mut()
      .map(|tx| &mut **tx)
      .ok_or_else(|| InventoryError::store("no open transaction"))
  }

  pub async fn commit(&self) -> Result<()> {
    let tx = self
      .0
      .lock()
      .await
      .take()
      .ok_or_else(|| InventoryError::store("no open transaction to commit"))?;
    tx.commit().await?;
    debug!("Transaction committed.");
    Ok(())
  }

  /// Rolls back the open transaction, if any. Returns whether one was open.
  pub async fn rollback(&self) -> Result<bool> {
    let Some(tx) = self.0.lock().await.take() else {
      return Ok(false);
    };
    tx.rollback().await?;
    debug!("Transaction rolled back.");
    Ok(true)
  }
}
