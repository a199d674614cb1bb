// product_service/src/state.rs
use crate::errors::AppError;
use crate::pipelines::register_all_pipelines;
use crate::services::ShopcartClient;
use crate::store::ProductStore;
use orka::Orka;
use std::sync::Arc;

/// Everything a request handler needs, built once at startup and shared by every worker.
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn ProductStore>,
  pub shopcarts: Arc<dyn ShopcartClient>,
  pub orka_instance: Arc<Orka<AppError>>,
}

impl AppState {
  /// Creates the Orka registry and registers every pipeline on it.
  pub fn new(store: Arc<dyn ProductStore>, shopcarts: Arc<dyn ShopcartClient>) -> Self {
    let orka_instance = Arc::new(Orka::<AppError>::new());
    register_all_pipelines(&orka_instance);
    Self {
      store,
      shopcarts,
      orka_instance,
    }
  }
}
