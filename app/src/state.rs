// stockroom_app/src/state.rs
use stockroom::ProductCatalog;

/// Shared with every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
  pub catalog: ProductCatalog,
}
