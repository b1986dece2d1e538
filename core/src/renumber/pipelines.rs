// stockroom/src/renumber/pipelines.rs

//! Builds and registers the renumber pipelines.
//!
//! Both workflows share the compaction steps. Delete-and-renumber inserts
//! `load_target` and `delete_target` right after the transaction opens;
//! renumber-all hangs an `after` hook on `snapshot_rows` that stops early
//! when there is nothing to compact.

use std::sync::Arc;
use tracing::info;

use crate::core::{ContextData, SkipCondition};
use crate::error::InventoryError;
use crate::pipeline::Pipeline;
use crate::registry::WorkflowRegistry;
use crate::renumber::contexts::{CompactionCtx, DeleteAndRenumberCtxData, RenumberAllCtxData};
use crate::renumber::steps;

pub const BEGIN_TRANSACTION: &str = "begin_transaction";
pub const LOAD_TARGET: &str = "load_target";
pub const DELETE_TARGET: &str = "delete_target";
pub const SNAPSHOT_ROWS: &str = "snapshot_rows";
pub const RELAX_CONSTRAINTS: &str = "relax_constraints";
pub const CLEAR_TABLE: &str = "clear_table";
pub const REINSERT_ROWS: &str = "reinsert_rows";
pub const RESET_COUNTER: &str = "reset_counter";
pub const RESTORE_CONSTRAINTS: &str = "restore_constraints";
pub const COMMIT: &str = "commit";

/// The compaction steps, in order, with their handlers attached.
pub fn compaction_pipeline<T: CompactionCtx>() -> Pipeline<T, InventoryError> {
  let nothing_to_reinsert: SkipCondition<T> = Arc::new(|ctx: ContextData<T>| {
    let data = ctx.read();
    data.compaction().snapshot.is_empty()
  });

  let mut p = Pipeline::<T, InventoryError>::new(&[
    (BEGIN_TRANSACTION, false, None),
    (SNAPSHOT_ROWS, false, None),
    (RELAX_CONSTRAINTS, false, None),
    (CLEAR_TABLE, false, None),
    (REINSERT_ROWS, false, Some(nothing_to_reinsert)),
    (RESET_COUNTER, false, None),
    (RESTORE_CONSTRAINTS, false, None),
    (COMMIT, false, None),
  ]);

  p.on_root(BEGIN_TRANSACTION, steps::begin_transaction::<T>);
  p.on_root(SNAPSHOT_ROWS, steps::snapshot_rows::<T>);
  p.on_root(RELAX_CONSTRAINTS, steps::relax_constraints::<T>);
  p.on_root(CLEAR_TABLE, steps::clear_table::<T>);
  p.on_root(REINSERT_ROWS, steps::reinsert_rows::<T>);
  p.on_root(RESET_COUNTER, steps::reset_counter::<T>);
  p.on_root(RESTORE_CONSTRAINTS, steps::restore_constraints::<T>);
  p.on_root(COMMIT, steps::commit::<T>);
  p
}

pub fn delete_and_renumber_pipeline() -> Pipeline<DeleteAndRenumberCtxData, InventoryError> {
  let mut p = compaction_pipeline::<DeleteAndRenumberCtxData>();
  p.insert_after_step(BEGIN_TRANSACTION, LOAD_TARGET, false, None);
  p.insert_after_step(LOAD_TARGET, DELETE_TARGET, false, None);
  p.on_root(LOAD_TARGET, steps::load_target);
  p.on_root(DELETE_TARGET, steps::delete_target);
  p
}

pub fn renumber_all_pipeline() -> Pipeline<RenumberAllCtxData, InventoryError> {
  let mut p = compaction_pipeline::<RenumberAllCtxData>();
  p.after_root(SNAPSHOT_ROWS, steps::stop_if_nothing_to_renumber);
  p
}

pub fn register_renumber_pipelines(registry: &WorkflowRegistry<InventoryError>) {
  registry.register_pipeline(delete_and_renumber_pipeline());
  registry.register_pipeline(renumber_all_pipeline());
  info!("Renumber pipelines registered.");
}
