// product_service/src/pipelines/contexts.rs

//! Underlying data structs for pipelines. Handlers receive these wrapped in `ContextData`.

use crate::models::Product;
use crate::services::ShopcartClient;
use crate::store::ProductStore;
use crate::validation::PurchaseRequest;
use serde_json::Value;
use std::sync::Arc;

/// State of one purchase as it moves through the purchase pipeline.
///
/// The raw inputs are set by the HTTP handler; every other field is filled in by a step.
#[derive(Clone)]
pub struct PurchaseCtxData {
  pub store: Arc<dyn ProductStore>,
  pub shopcarts: Arc<dyn ShopcartClient>,

  pub raw_product_id: String,
  pub raw_body: Value,

  pub product_id: Option<i64>,
  pub request: Option<PurchaseRequest>,
  pub product: Option<Product>,
  pub cart_id: Option<i64>,
  pub cart_created: bool,
  pub item_added: bool,
}

impl PurchaseCtxData {
  pub fn new(
    store: Arc<dyn ProductStore>,
    shopcarts: Arc<dyn ShopcartClient>,
    raw_product_id: impl Into<String>,
    raw_body: Value,
  ) -> Self {
    Self {
      store,
      shopcarts,
      raw_product_id: raw_product_id.into(),
      raw_body,
      product_id: None,
      request: None,
      product: None,
      cart_id: None,
      cart_created: false,
      item_added: false,
    }
  }
}
