// tests/catalog_tests.rs
mod common;

use common::*;
use serde_json::json;
use stockroom::{InventoryError, ProductCatalog, ProductInput, ValidationErrors};

fn field_codes(errors: &ValidationErrors, field: &str) -> Vec<String> {
  errors
    .field_errors()
    .get(field)
    .map(|errs| errs.iter().map(|e| e.code.to_string()).collect())
    .unwrap_or_default()
}

#[tokio::test]
async fn test_seeded_catalog_lists_defaults_in_id_order() {
  let catalog = seeded_catalog().await;

  let products = catalog.list().await.unwrap();
  assert_eq!(ids(&products), vec![1, 2, 3, 4, 5]);
  assert_eq!(skus(&products), vec!["LP001", "KB001", "MS001", "MN001", "HP001"]);
  assert_eq!(products[0].price, 9999.0);
  assert_eq!(products[2].quantity, 50);
}

#[tokio::test]
async fn test_get_returns_product_or_not_found() {
  let catalog = seeded_catalog().await;

  assert_eq!(catalog.get(4).await.unwrap().name, "Monitor");
  assert!(matches!(catalog.get(99).await, Err(InventoryError::NotFound { id: 99 })));
}

#[tokio::test]
async fn test_create_assigns_next_id_and_timestamps() {
  let catalog = seeded_catalog().await;

  let mut new_input = input("Webcam", "WC001", 79.5, 12);
  new_input.description = Some("1080p webcam".to_string());
  let created = catalog.create(new_input).await.unwrap();

  assert_eq!(created.id, 6);
  assert_eq!(created.description.as_deref(), Some("1080p webcam"));
  assert_eq!(created.created_at, created.updated_at);
  assert_eq!(catalog.get(6).await.unwrap(), created);
}

#[tokio::test]
async fn test_create_reports_every_invalid_field() {
  let catalog = seeded_catalog().await;

  let bad = ProductInput {
    name: Some("x".repeat(256)),
    sku: None,
    price: Some(json!(-1.0)),
    quantity: Some(json!(-5)),
    description: None,
  };
  let err = catalog.create(bad).await.unwrap_err();

  let InventoryError::Validation(errors) = err else {
    panic!("Expected a validation error");
  };
  assert_eq!(field_codes(&errors, "name"), vec!["length"]);
  assert_eq!(field_codes(&errors, "sku"), vec!["required"]);
  assert_eq!(field_codes(&errors, "price"), vec!["range"]);
  assert_eq!(field_codes(&errors, "quantity"), vec!["range"]);
  assert!(field_codes(&errors, "description").is_empty());
  assert_eq!(catalog.list().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_create_rejects_duplicate_sku() {
  let catalog = seeded_catalog().await;

  let err = catalog.create(input("Another Laptop", "LP001", 10.0, 1)).await.unwrap_err();

  let InventoryError::Validation(errors) = err else {
    panic!("Expected a validation error");
  };
  assert_eq!(field_codes(&errors, "sku"), vec!["unique"]);
  let message = errors.field_errors()["sku"][0].message.clone().unwrap_or_default();
  assert_eq!(message, "The sku has already been taken.");
}

#[tokio::test]
async fn test_update_keeps_created_at_and_allows_own_sku() {
  let catalog = seeded_catalog().await;
  let original = catalog.get(2).await.unwrap();

  let updated = catalog.update(2, input("Keyboard Pro", "KB001", 149.0, 18)).await.unwrap();

  assert_eq!(updated.id, 2);
  assert_eq!(updated.name, "Keyboard Pro");
  assert_eq!(updated.price, 149.0);
  assert_eq!(updated.created_at, original.created_at);
  assert!(updated.updated_at >= original.updated_at);
}

#[tokio::test]
async fn test_update_rejects_sku_of_another_product() {
  let catalog = seeded_catalog().await;

  let err = catalog.update(2, input("Keyboard", "MS001", 120.0, 20)).await.unwrap_err();

  let InventoryError::Validation(errors) = err else {
    panic!("Expected a validation error");
  };
  assert_eq!(field_codes(&errors, "sku"), vec!["unique"]);
  assert_eq!(catalog.get(2).await.unwrap().sku, "KB001");
}

#[tokio::test]
async fn test_update_missing_product_is_not_found() {
  let catalog = seeded_catalog().await;

  let err = catalog.update(77, input("Ghost", "GH001", 1.0, 1)).await.unwrap_err();
  assert!(matches!(err, InventoryError::NotFound { id: 77 }));
}

#[tokio::test]
async fn test_crud_paths_never_renumber() {
  let catalog = ProductCatalog::new(empty_store().await);
  for (i, sku) in ["A1", "A2", "A3"].iter().enumerate() {
    catalog.create(input(&format!("Item {}", i), sku, 1.0, 1)).await.unwrap();
  }
  sqlx::query("DELETE FROM products WHERE id = 2")
    .execute(catalog.store().pool())
    .await
    .unwrap();

  catalog.update(3, input("Item 2b", "A3", 2.0, 2)).await.unwrap();
  catalog.create(input("Item 4", "A4", 1.0, 1)).await.unwrap();

  assert_eq!(ids(&catalog.list().await.unwrap()), vec![1, 3, 4]);
}

#[tokio::test]
async fn test_numeric_strings_are_accepted_and_prices_kept_to_cents() {
  let catalog = seeded_catalog().await;

  let created = catalog
    .create(ProductInput {
      name: Some("Webcam".to_string()),
      sku: Some("WC001".to_string()),
      price: Some(json!("12.50")),
      quantity: Some(json!(" 7 ")),
      description: None,
    })
    .await
    .unwrap();
  assert_eq!((created.price, created.quantity), (12.5, 7));

  let updated = catalog.update(created.id, input("Webcam", "WC001", 19.999, 7)).await.unwrap();
  assert_eq!(updated.price, 20.0);
}

#[tokio::test]
async fn test_wrongly_typed_numbers_are_field_errors() {
  let catalog = seeded_catalog().await;

  let bad = ProductInput {
    name: Some("Webcam".to_string()),
    sku: Some("WC001".to_string()),
    price: Some(json!("abc")),
    quantity: Some(json!(1.5)),
    description: None,
  };
  let err = catalog.create(bad).await.unwrap_err();

  let InventoryError::Validation(errors) = err else {
    panic!("Expected a validation error");
  };
  assert_eq!(field_codes(&errors, "price"), vec!["numeric"]);
  assert_eq!(field_codes(&errors, "quantity"), vec!["integer"]);

  let bad = ProductInput {
    price: Some(json!(true)),
    quantity: Some(json!("-2")),
    ..input("Webcam", "WC001", 0.0, 0)
  };
  let InventoryError::Validation(errors) = catalog.create(bad).await.unwrap_err() else {
    panic!("Expected a validation error");
  };
  assert_eq!(field_codes(&errors, "price"), vec!["numeric"]);
  assert_eq!(field_codes(&errors, "quantity"), vec!["range"]);
  assert_eq!(catalog.list().await.unwrap().len(), 5);
}
