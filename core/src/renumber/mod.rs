// stockroom/src/renumber/mod.rs

//! Delete-and-renumber and renumber-all.
//!
//! Both run as pipelines from a [`WorkflowRegistry`] against a context that
//! owns the open transaction. When a run fails or is stopped before `commit`,
//! the transaction is still parked in the context and is rolled back here.

pub mod contexts;
pub mod pipelines;
pub mod steps;

pub use contexts::{Compaction, CompactionCtx, DeleteAndRenumberCtxData, RenumberAllCtxData};
pub use pipelines::register_renumber_pipelines;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{error, info, instrument, warn};

use crate::core::{ContextData, PipelineResult};
use crate::error::{InventoryError, Result};
use crate::registry::WorkflowRegistry;
use crate::store::TxSlot;

pub const DELETE_SUCCESS_MESSAGE: &str = "Product deleted. All IDs are now sequential.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
  pub success: bool,
  pub message: String,
  pub deleted_id: i64,
  /// Rows left after the delete; their ids are now `1..=remaining`.
  pub remaining: i64,
  pub next_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenumberReport {
  pub success: bool,
  pub new_count: i64,
  /// False when nothing had to move and nothing was written.
  pub renumbered: bool,
  pub message: String,
}

/// Rolls back whatever the run left open. A failed rollback is logged, not
/// returned, so the caller still sees the error that caused it.
async fn abandon(tx: &TxSlot) {
  match tx.rollback().await {
    Ok(true) => info!("Renumber transaction rolled back."),
    Ok(false) => {}
    Err(e) => error!(error = %e, "Rollback of renumber transaction failed."),
  }
}

#[instrument(name = "renumber::delete_and_renumber", skip(registry, pool), err(Display))]
pub async fn delete_and_renumber(
  registry: &WorkflowRegistry<InventoryError>,
  pool: &SqlitePool,
  id: i64,
) -> Result<DeleteOutcome> {
  let ctx = ContextData::new(DeleteAndRenumberCtxData::new(pool.clone(), id));
  let run = registry.run(ctx.clone()).await;
  let tx = ctx.read().compaction.tx.clone();

  match run {
    Ok(PipelineResult::Completed) => {
      let data = ctx.read();
      let remaining = data.compaction.reassigned.len() as i64;
      let next_id = data
        .compaction
        .next_id
        .ok_or_else(|| InventoryError::store("renumber completed without resetting the key generator"))?;
      let deleted_sku = data.deleted.as_ref().map(|p| p.sku.as_str()).unwrap_or_default();
      info!(deleted_id = id, deleted_sku, remaining, next_id, "Product deleted and ids compacted.");
      Ok(DeleteOutcome {
        success: true,
        message: DELETE_SUCCESS_MESSAGE.to_string(),
        deleted_id: id,
        remaining,
        next_id,
      })
    }
    Ok(PipelineResult::Stopped) => {
      warn!(id, "Delete-and-renumber stopped before commit.");
      abandon(&tx).await;
      Err(InventoryError::store("delete-and-renumber stopped before commit"))
    }
    Err(e) => {
      abandon(&tx).await;
      Err(e.into_store_failure())
    }
  }
}

#[instrument(name = "renumber::renumber_all", skip_all, err(Display))]
pub async fn renumber_all(registry: &WorkflowRegistry<InventoryError>, pool: &SqlitePool) -> Result<RenumberReport> {
  let ctx = ContextData::new(RenumberAllCtxData::new(pool.clone()));
  let run = registry.run(ctx.clone()).await;
  let tx = ctx.read().compaction.tx.clone();

  match run {
    Ok(PipelineResult::Completed) => {
      let new_count = ctx.read().compaction.reassigned.len() as i64;
      info!(new_count, "All product ids renumbered.");
      Ok(RenumberReport {
        success: true,
        new_count,
        renumbered: true,
        message: format!("All product IDs renumbered. {} products now have sequential IDs.", new_count),
      })
    }
    // Stopped by the no-op check after the snapshot; nothing was written.
    Ok(PipelineResult::Stopped) => {
      abandon(&tx).await;
      let new_count = ctx.read().compaction.snapshot.len() as i64;
      let message = if new_count == 0 {
        "No products to renumber.".to_string()
      } else {
        format!("Product IDs are already sequential ({} products).", new_count)
      };
      Ok(RenumberReport {
        success: true,
        new_count,
        renumbered: false,
        message,
      })
    }
    Err(e) => {
      abandon(&tx).await;
      Err(e.into_store_failure())
    }
  }
}
