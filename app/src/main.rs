// stockroom_app/src/main.rs

mod config;
mod errors;
mod state;
mod web;

use crate::config::{AppConfig, LogFormat};
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use stockroom::{ProductCatalog, ProductStore};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let builder = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  init_tracing(app_config.log_format);
  tracing::info!(
    database_url = %app_config.database_url,
    max_connections = app_config.db_max_connections,
    seed_db = app_config.seed_db,
    "Starting stockroom server..."
  );

  let store = ProductStore::connect(&app_config.database_url, app_config.db_max_connections)
    .await
    .context("Failed to connect to the database")?;
  store.ensure_schema().await.context("Failed to create the products table")?;
  tracing::info!("Successfully connected to the database.");

  if app_config.seed_db {
    let seeded = store.seed_defaults().await.context("Failed to seed the database")?;
    tracing::info!(seeded, "Database seeded with sample products.");
  }

  let app_state = AppState {
    catalog: ProductCatalog::new(store),
  };

  let server_address = app_config.bind_address();
  tracing::info!("Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;
  Ok(())
}
