// tests/renumber_tests.rs
mod common;

use common::*;
use stockroom::renumber::pipelines::{self, RESET_COUNTER};
use stockroom::renumber::{self, DeleteAndRenumberCtxData, RenumberAllCtxData};
use stockroom::{ContextData, InventoryError, PipelineControl, ProductCatalog, WorkflowRegistry};

#[tokio::test]
async fn test_delete_middle_product_compacts_ids() {
  let catalog = seeded_catalog().await;
  let before = catalog.list().await.unwrap();
  assert_eq!(ids(&before), vec![1, 2, 3, 4, 5]);

  let outcome = catalog.delete_and_renumber(3).await.unwrap();

  assert!(outcome.success);
  assert_eq!(outcome.message, "Product deleted. All IDs are now sequential.");
  assert_eq!(outcome.deleted_id, 3);
  assert_eq!(outcome.remaining, 4);
  assert_eq!(outcome.next_id, 5);

  let after = catalog.list().await.unwrap();
  assert_eq!(ids(&after), vec![1, 2, 3, 4]);
  assert_eq!(skus(&after), vec!["LP001", "KB001", "MN001", "HP001"]);

  let status = catalog.sequence_status().await.unwrap();
  assert_eq!((status.count, status.next_id), (4, 5));
}

#[tokio::test]
async fn test_renumber_preserves_fields_and_refreshes_updated_at() {
  let catalog = seeded_catalog().await;
  let before = catalog.list().await.unwrap();

  catalog.delete_and_renumber(1).await.unwrap();
  let after = catalog.list().await.unwrap();

  for (old, new) in before[1..].iter().zip(after.iter()) {
    assert_eq!(new.id, old.id - 1);
    assert_eq!(new.name, old.name);
    assert_eq!(new.sku, old.sku);
    assert_eq!(new.price, old.price);
    assert_eq!(new.quantity, old.quantity);
    assert_eq!(new.description, old.description);
    assert_eq!(new.created_at, old.created_at);
    assert!(new.updated_at >= old.updated_at);
  }
  let refreshed = after[0].updated_at;
  assert!(after.iter().all(|p| p.updated_at == refreshed));
}

#[tokio::test]
async fn test_next_insert_after_delete_gets_next_sequential_id() {
  let catalog = seeded_catalog().await;
  catalog.delete_and_renumber(2).await.unwrap();

  let created = catalog.create(input("Webcam", "WC001", 80.0, 5)).await.unwrap();
  assert_eq!(created.id, 5);
}

#[tokio::test]
async fn test_delete_missing_id_leaves_table_unchanged() {
  let catalog = seeded_catalog().await;
  let before = catalog.list().await.unwrap();
  let status_before = catalog.sequence_status().await.unwrap();

  let err = catalog.delete_and_renumber(42).await.unwrap_err();

  assert!(matches!(err, InventoryError::NotFound { id: 42 }));
  assert_eq!(catalog.list().await.unwrap(), before);
  assert_eq!(catalog.sequence_status().await.unwrap(), status_before);
}

#[tokio::test]
async fn test_delete_on_empty_table_reports_not_found() {
  let catalog = ProductCatalog::new(empty_store().await);

  let err = catalog.delete_and_renumber(1).await.unwrap_err();

  assert!(matches!(err, InventoryError::NotFound { id: 1 }));
  assert!(catalog.list().await.unwrap().is_empty());
  assert_eq!(catalog.sequence_status().await.unwrap().next_id, 1);
}

#[tokio::test]
async fn test_deleting_last_product_resets_counter_to_one() {
  let catalog = ProductCatalog::new(empty_store().await);
  let only = catalog.create(input("Cable", "CB001", 5.0, 100)).await.unwrap();
  assert_eq!(only.id, 1);

  let outcome = catalog.delete_and_renumber(1).await.unwrap();
  assert_eq!((outcome.remaining, outcome.next_id), (0, 1));

  let again = catalog.create(input("Cable", "CB001", 5.0, 100)).await.unwrap();
  assert_eq!(again.id, 1);
}

#[tokio::test]
async fn test_store_failure_during_reinsert_rolls_back() {
  let catalog = seeded_catalog().await;
  let before = catalog.list().await.unwrap();
  fail_inserts_of(catalog.store(), "MS001").await;

  let err = catalog.delete_and_renumber(1).await.unwrap_err();

  match err {
    InventoryError::Store { message } => assert!(message.contains("insert of MS001 rejected"), "{message}"),
    other => panic!("Expected Store error, got {:?}", other),
  }
  assert_eq!(catalog.list().await.unwrap(), before);
  let status = catalog.sequence_status().await.unwrap();
  assert_eq!((status.count, status.next_id), (5, 6));
}

#[tokio::test]
async fn test_failing_hook_after_counter_reset_rolls_back() {
  let store = empty_store().await;
  store.seed_defaults().await.unwrap();
  let before = store.list().await.unwrap();

  let mut pipeline = pipelines::delete_and_renumber_pipeline();
  pipeline.after_root(RESET_COUNTER, |_ctx: ContextData<DeleteAndRenumberCtxData>| {
    Box::pin(async move { Err::<PipelineControl, _>(InventoryError::store("injected failure")) })
  });
  let registry = WorkflowRegistry::<InventoryError>::new();
  registry.register_pipeline(pipeline);

  let err = renumber::delete_and_renumber(&registry, store.pool(), 2)
    .await
    .unwrap_err();

  assert!(matches!(err, InventoryError::Store { ref message } if message == "injected failure"));
  assert_eq!(store.list().await.unwrap(), before);
  assert_eq!(store.sequence_status().await.unwrap().next_id, 6);
}

#[tokio::test]
async fn test_missing_pipeline_is_reported_as_store_error() {
  let store = empty_store().await;
  let registry = WorkflowRegistry::<InventoryError>::new();

  let err = renumber::renumber_all(&registry, store.pool()).await.unwrap_err();
  assert!(matches!(err, InventoryError::Store { .. }));
}

#[tokio::test]
async fn test_renumber_all_closes_gaps() {
  let catalog = seeded_catalog().await;
  sqlx::query("DELETE FROM products WHERE id IN (2, 4)")
    .execute(catalog.store().pool())
    .await
    .unwrap();

  let report = catalog.renumber_all().await.unwrap();

  assert!(report.success);
  assert!(report.renumbered);
  assert_eq!(report.new_count, 3);
  let after = catalog.list().await.unwrap();
  assert_eq!(ids(&after), vec![1, 2, 3]);
  assert_eq!(skus(&after), vec!["LP001", "MS001", "HP001"]);
  assert_eq!(catalog.sequence_status().await.unwrap().next_id, 4);
}

#[tokio::test]
async fn test_renumber_all_twice_changes_nothing_the_second_time() {
  let catalog = seeded_catalog().await;
  sqlx::query("DELETE FROM products WHERE id = 1")
    .execute(catalog.store().pool())
    .await
    .unwrap();

  assert!(catalog.renumber_all().await.unwrap().renumbered);
  let first = catalog.list().await.unwrap();

  let second = catalog.renumber_all().await.unwrap();
  assert!(!second.renumbered);
  assert_eq!(second.new_count, 4);
  assert_eq!(catalog.list().await.unwrap(), first);
}

#[tokio::test]
async fn test_renumber_all_on_empty_table_is_a_no_op() {
  let catalog = ProductCatalog::new(empty_store().await);

  let report = catalog.renumber_all().await.unwrap();

  assert!(report.success);
  assert!(!report.renumbered);
  assert_eq!(report.new_count, 0);
}

#[tokio::test]
async fn test_renumber_all_resets_counter_ahead_of_dense_ids() {
  let catalog = seeded_catalog().await;
  let extra = catalog.create(input("Dock", "DK001", 150.0, 3)).await.unwrap();
  sqlx::query("DELETE FROM products WHERE id = ?")
    .bind(extra.id)
    .execute(catalog.store().pool())
    .await
    .unwrap();
  assert_eq!(catalog.sequence_status().await.unwrap().next_id, 7);

  let report = catalog.renumber_all().await.unwrap();

  assert!(report.renumbered);
  assert_eq!(ids(&catalog.list().await.unwrap()), vec![1, 2, 3, 4, 5]);
  assert_eq!(catalog.sequence_status().await.unwrap().next_id, 6);
}

#[tokio::test]
async fn test_renumber_all_context_records_counter_before_writes() {
  let store = empty_store().await;
  store.seed_defaults().await.unwrap();
  let registry = WorkflowRegistry::<InventoryError>::new();
  registry.register_pipeline(pipelines::renumber_all_pipeline());

  let ctx = ContextData::new(RenumberAllCtxData::new(store.pool().clone()));
  let result = registry.run(ctx.clone()).await.unwrap();

  assert_eq!(result, stockroom::PipelineResult::Stopped);
  assert_eq!(ctx.read().next_id_before, Some(6));
  // The stop left the transaction open; the caller owns the rollback.
  let tx = ctx.read().compaction.tx.clone();
  assert!(tx.rollback().await.unwrap());
}

#[tokio::test]
async fn test_delete_context_records_deleted_row_and_refresh_time() {
  let store = empty_store().await;
  store.seed_defaults().await.unwrap();
  let registry = WorkflowRegistry::<InventoryError>::new();
  registry.register_pipeline(pipelines::delete_and_renumber_pipeline());

  let ctx = ContextData::new(DeleteAndRenumberCtxData::new(store.pool().clone(), 3));
  let result = registry.run(ctx.clone()).await.unwrap();
  assert_eq!(result, stockroom::PipelineResult::Completed);

  let (deleted_sku, refreshed_at, reassigned) = {
    let data = ctx.read();
    (
      data.deleted.as_ref().map(|p| p.sku.clone()),
      data.compaction.refreshed_at,
      data.compaction.reassigned.clone(),
    )
  };
  assert_eq!(deleted_sku.as_deref(), Some("MS001"));
  assert_eq!(reassigned, vec![(1, 1), (2, 2), (4, 3), (5, 4)]);

  let after = store.list().await.unwrap();
  assert!(after.iter().all(|p| Some(p.updated_at) == refreshed_at));
}
