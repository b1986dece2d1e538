// stockroom/src/renumber/contexts.rs

//! Root data structs for the renumber pipelines. Steps receive them wrapped
//! in `ContextData`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::Product;
use crate::store::TxSlot;

/// State shared by every compaction step, whichever workflow runs them.
#[derive(Debug, Clone)]
pub struct Compaction {
  pub pool: SqlitePool,
  pub tx: TxSlot,
  /// Rows captured by `snapshot_rows`, in ascending order of their old ids.
  pub snapshot: Vec<Product>,
  /// `(old_id, new_id)` for each reinserted row.
  pub reassigned: Vec<(i64, i64)>,
  /// Next id the store will issue once the counter is reset.
  pub next_id: Option<i64>,
  /// Shared `updated_at` for all reinserted rows.
  pub refreshed_at: Option<DateTime<Utc>>,
}

impl Compaction {
  pub fn new(pool: SqlitePool) -> Self {
    Self {
      pool,
      tx: TxSlot::default(),
      snapshot: Vec::new(),
      reassigned: Vec::new(),
      next_id: None,
      refreshed_at: None,
    }
  }

  /// Whether the snapshot already carries ids `1..=N` in order.
  pub fn snapshot_is_dense(&self) -> bool {
    self
      .snapshot
      .iter()
      .enumerate()
      .all(|(idx, product)| product.id == idx as i64 + 1)
  }
}

/// Implemented by every root data type that runs the compaction steps.
pub trait CompactionCtx: Send + Sync + 'static {
  fn compaction(&self) -> &Compaction;
  fn compaction_mut(&mut self) -> &mut Compaction;
}

/// Underlying data for the delete-and-renumber pipeline.
#[derive(Debug, Clone)]
pub struct DeleteAndRenumberCtxData {
  pub target_id: i64,
  pub deleted: Option<Product>,
  pub compaction: Compaction,
}

impl DeleteAndRenumberCtxData {
  pub fn new(pool: SqlitePool, target_id: i64) -> Self {
    Self {
      target_id,
      deleted: None,
      compaction: Compaction::new(pool),
    }
  }
}

impl CompactionCtx for DeleteAndRenumberCtxData {
  fn compaction(&self) -> &Compaction {
    &self.compaction
  }

  fn compaction_mut(&mut self) -> &mut Compaction {
    &mut self.compaction
  }
}

/// Underlying data for the standalone renumber-all pipeline.
#[derive(Debug, Clone)]
pub struct RenumberAllCtxData {
  /// Counter value observed before any write, used to detect a table that
  /// is already dense.
  pub next_id_before: Option<i64>,
  pub compaction: Compaction,
}

impl RenumberAllCtxData {
  pub fn new(pool: SqlitePool) -> Self {
    Self {
      next_id_before: None,
      compaction: Compaction::new(pool),
    }
  }
}

impl CompactionCtx for RenumberAllCtxData {
  fn compaction(&self) -> &Compaction {
    &self.compaction
  }

  fn compaction_mut(&mut self) -> &mut Compaction {
    &mut self.compaction
  }
}
