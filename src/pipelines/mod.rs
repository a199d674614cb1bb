// product_service/src/pipelines/mod.rs

//! Orka pipelines used by the service. Each workflow module declares its steps and
//! handlers over a context struct from `contexts`.

use crate::errors::AppError;
use orka::Orka;
use std::sync::Arc;

pub mod contexts;
pub mod purchase_pipeline;

/// Registers every pipeline with the Orka registry, keyed by its context type.
pub fn register_all_pipelines(orka_instance: &Arc<Orka<AppError>>) {
  tracing::info!("Registering Orka pipelines...");
  purchase_pipeline::register_purchase_pipeline(orka_instance);
}
