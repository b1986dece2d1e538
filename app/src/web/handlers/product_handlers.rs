// stockroom_app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use stockroom::ProductInput;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.list().await?;
  let count = products.len();
  info!(count, "Products fetched.");

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "data": products,
      "count": count
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.catalog.get(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "data": product
  })))
}

#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ProductInput>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.catalog.create(payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(json!({
      "success": true,
      "message": "Product created successfully",
      "data": product
  })))
}

#[instrument(name = "handler::update_product", skip(app_state, path, payload), fields(product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: web::Json<ProductInput>,
) -> Result<HttpResponse, AppError> {
  let product = app_state
    .catalog
    .update(path.into_inner(), payload.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Product updated successfully",
      "data": product
  })))
}

/// Deletes the product and renumbers every remaining id.
#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state.catalog.delete_and_renumber(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(outcome))
}

#[instrument(name = "handler::renumber_all", skip(app_state))]
pub async fn renumber_all_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let report = app_state.catalog.renumber_all().await?;
  Ok(HttpResponse::Ok().json(report))
}

#[instrument(name = "handler::sequence_status", skip(app_state))]
pub async fn sequence_status_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let status = app_state.catalog.sequence_status().await?;
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "count": status.count,
      "next_id": status.next_id
  })))
}
