// stockroom_app/src/web/routes.rs

use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::{AppError, Result};
use crate::state::AppState;
use crate::web::handlers::product_handlers;

/// Liveness plus a round trip to the database.
async fn health_check_handler(app_state: web::Data<AppState>) -> Result<HttpResponse> {
  sqlx::query("SELECT 1")
    .execute(app_state.catalog.store().pool())
    .await?;
  Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

/// Malformed or mistyped JSON bodies are answered like validation failures.
fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::BadRequest(err.to_string()).into()
}

/// A path segment that is not a valid id cannot name a product.
fn path_error_handler(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
  tracing::debug!(error = %err, "Unparseable path parameter.");
  AppError::NotFound("Product not found".to_string()).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .app_data(web::JsonConfig::default().error_handler(json_error_handler))
      .app_data(web::PathConfig::default().error_handler(path_error_handler))
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/products")
          .service(
            web::resource("")
              .route(web::get().to(product_handlers::list_products_handler))
              .route(web::post().to(product_handlers::create_product_handler)),
          )
          // Fixed paths go before `/{product_id}`.
          .service(web::resource("/sequence").route(web::get().to(product_handlers::sequence_status_handler)))
          .service(web::resource("/renumber").route(web::post().to(product_handlers::renumber_all_handler)))
          .service(
            web::resource("/{product_id}")
              .route(web::get().to(product_handlers::get_product_handler))
              .route(web::put().to(product_handlers::update_product_handler))
              .route(web::delete().to(product_handlers::delete_product_handler)),
          ),
      ),
  );
}
