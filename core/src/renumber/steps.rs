// stockroom/src/renumber/steps.rs

//! Step handlers for the renumber pipelines.
//!
//! Each handler copies what it needs out of the `ContextData` (dropping the
//! guard), locks the shared transaction, runs its statements on it, and writes
//! its results back into the context.

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::core::{ContextData, PipelineControl};
use crate::error::{InventoryError, Result};
use crate::renumber::contexts::{CompactionCtx, DeleteAndRenumberCtxData, RenumberAllCtxData};
use crate::store::{queries, TxSlot};

type StepResult = Result<PipelineControl>;

fn tx_of<T: CompactionCtx>(ctx: &ContextData<T>) -> TxSlot {
  ctx.read().compaction().tx.clone()
}

// --- Compaction steps (shared by both workflows) ---

#[instrument(name = "renumber_step::begin_transaction", skip_all, err)]
pub async fn begin_transaction<T: CompactionCtx>(ctx: ContextData<T>) -> StepResult {
  let (pool, tx) = {
    let guard = ctx.read();
    (guard.compaction().pool.clone(), guard.compaction().tx.clone())
  };
  tx.begin(&pool).await?;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "renumber_step::snapshot_rows", skip_all, err)]
pub async fn snapshot_rows<T: CompactionCtx>(ctx: ContextData<T>) -> StepResult {
  let tx = tx_of(&ctx);
  let snapshot = {
    let mut open = tx.lock().await;
    queries::fetch_all_ordered(TxSlot::connection(&mut open)?).await?
  };
  debug!(rows = snapshot.len(), "Captured remaining rows in id order.");
  ctx.write().compaction_mut().snapshot = snapshot;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "renumber_step::relax_constraints", skip_all, err)]
pub async fn relax_constraints<T: CompactionCtx>(ctx: ContextData<T>) -> StepResult {
  let tx = tx_of(&ctx);
  let mut open = tx.lock().await;
  queries::relax_foreign_keys(TxSlot::connection(&mut open)?).await?;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "renumber_step::clear_table", skip_all, err)]
pub async fn clear_table<T: CompactionCtx>(ctx: ContextData<T>) -> StepResult {
  let tx = tx_of(&ctx);
  let removed = {
    let mut open = tx.lock().await;
    queries::clear_products(TxSlot::connection(&mut open)?).await?
  };
  debug!(removed, "Product table cleared.");
  Ok(PipelineControl::Continue)
}

/// Reinserts the snapshot in order. The store must hand out `1..=N`; any
/// other id means the counter was not reset and the step fails.
#[instrument(name = "renumber_step::reinsert_rows", skip_all, err)]
pub async fn reinsert_rows<T: CompactionCtx>(ctx: ContextData<T>) -> StepResult {
  let (tx, snapshot) = {
    let guard = ctx.read();
    (guard.compaction().tx.clone(), guard.compaction().snapshot.clone())
  };
  let refreshed_at = Utc::now();

  let mut reassigned = Vec::with_capacity(snapshot.len());
  {
    let mut open = tx.lock().await;
    let conn = TxSlot::connection(&mut open)?;
    for (idx, product) in snapshot.iter().enumerate() {
      let expected_id = idx as i64 + 1;
      let new_id = queries::reinsert_product(&mut *conn, product, refreshed_at).await?;
      if new_id != expected_id {
        return Err(InventoryError::store(format!(
          "store assigned id {} to product '{}' (old id {}), expected {}",
          new_id, product.sku, product.id, expected_id
        )));
      }
      reassigned.push((product.id, new_id));
    }
  }

  let moved = reassigned.iter().filter(|(old, new)| old != new).count();
  debug!(rows = reassigned.len(), moved, "Rows reinserted with sequential ids.");
  {
    let mut guard = ctx.write();
    let compaction = guard.compaction_mut();
    compaction.reassigned = reassigned;
    compaction.refreshed_at = Some(refreshed_at);
  }
  Ok(PipelineControl::Continue)
}

#[instrument(name = "renumber_step::reset_counter", skip_all, err)]
pub async fn reset_counter<T: CompactionCtx>(ctx: ContextData<T>) -> StepResult {
  let (tx, last_id) = {
    let guard = ctx.read();
    let compaction = guard.compaction();
    (compaction.tx.clone(), compaction.reassigned.last().map_or(0, |(_, new_id)| *new_id))
  };

  let next_id = {
    let mut open = tx.lock().await;
    let conn = TxSlot::connection(&mut open)?;
    queries::reset_counter(&mut *conn, last_id).await?;
    queries::next_id(&mut *conn).await?
  };
  if next_id != last_id + 1 {
    return Err(InventoryError::store(format!(
      "key generator reports next id {} after reset, expected {}",
      next_id,
      last_id + 1
    )));
  }

  debug!(next_id, "Key generator reset.");
  ctx.write().compaction_mut().next_id = Some(next_id);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "renumber_step::restore_constraints", skip_all, err)]
pub async fn restore_constraints<T: CompactionCtx>(ctx: ContextData<T>) -> StepResult {
  let tx = tx_of(&ctx);
  let mut open = tx.lock().await;
  queries::restore_foreign_keys(TxSlot::connection(&mut open)?).await?;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "renumber_step::commit", skip_all, err)]
pub async fn commit<T: CompactionCtx>(ctx: ContextData<T>) -> StepResult {
  tx_of(&ctx).commit().await?;
  Ok(PipelineControl::Continue)
}

// --- Delete-and-renumber only ---

#[instrument(name = "renumber_step::load_target", skip_all, err)]
pub async fn load_target(ctx: ContextData<DeleteAndRenumberCtxData>) -> StepResult {
  let (tx, target_id) = {
    let guard = ctx.read();
    (guard.compaction.tx.clone(), guard.target_id)
  };

  let target = {
    let mut open = tx.lock().await;
    queries::fetch_product(TxSlot::connection(&mut open)?, target_id).await?
  };
  match target {
    Some(product) => {
      debug!(target_id, sku = %product.sku, "Target product loaded.");
      ctx.write().deleted = Some(product);
      Ok(PipelineControl::Continue)
    }
    None => {
      warn!(target_id, "Product to delete does not exist.");
      Err(InventoryError::NotFound { id: target_id })
    }
  }
}

#[instrument(name = "renumber_step::delete_target", skip_all, err)]
pub async fn delete_target(ctx: ContextData<DeleteAndRenumberCtxData>) -> StepResult {
  let (tx, target_id) = {
    let guard = ctx.read();
    (guard.compaction.tx.clone(), guard.target_id)
  };

  let removed = {
    let mut open = tx.lock().await;
    queries::delete_product(TxSlot::connection(&mut open)?, target_id).await?
  };
  if removed != 1 {
    return Err(InventoryError::store(format!(
      "expected to delete exactly one row for id {}, deleted {}",
      target_id, removed
    )));
  }
  info!(target_id, "Product deleted, renumbering remaining rows.");
  Ok(PipelineControl::Continue)
}

// --- Renumber-all only ---

/// Runs after `snapshot_rows`. Stops the workflow before any write when the
/// table is empty, or when ids are already `1..=N` and the next id is `N+1`.
#[instrument(name = "renumber_step::stop_if_nothing_to_renumber", skip_all, err)]
pub async fn stop_if_nothing_to_renumber(ctx: ContextData<RenumberAllCtxData>) -> StepResult {
  let tx = ctx.read().compaction.tx.clone();
  let next_id = {
    let mut open = tx.lock().await;
    queries::next_id(TxSlot::connection(&mut open)?).await?
  };

  let mut guard = ctx.write();
  guard.next_id_before = Some(next_id);
  let compaction = &guard.compaction;
  let row_count = compaction.snapshot.len() as i64;

  if row_count == 0 {
    info!("No products to renumber.");
    return Ok(PipelineControl::Stop);
  }
  if compaction.snapshot_is_dense() && next_id == row_count + 1 {
    info!(row_count, "Product ids are already sequential.");
    return Ok(PipelineControl::Stop);
  }
  Ok(PipelineControl::Continue)
}
