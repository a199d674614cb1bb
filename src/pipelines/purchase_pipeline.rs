// product_service/src/pipelines/purchase_pipeline.rs

//! Purchase: put `amount` units of a product into the user's shopcart, creating the
//! cart first when the user has none.
//!
//! The two outbound writes (create cart, add item) are not transactional. If adding
//! the item fails after a cart was created here, that cart is left empty on the
//! shopcart service; the failure is logged with the orphaned cart id.

use crate::errors::AppError;
use crate::pipelines::contexts::PurchaseCtxData;
use crate::services::{CartItemRequest, ShopcartClient, ShopcartError};
use crate::validation::{parse_product_id, PurchaseRequest};
use orka::core::step::SkipCondition;
use orka::{ContextData, Orka, Pipeline, PipelineControl};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const PURCHASE_STEPS: [&str; 5] = [
  "validate_purchase_input",
  "load_product",
  "find_existing_shopcart",
  "create_shopcart",
  "add_item_to_shopcart",
];

type StepResult = Result<PipelineControl, AppError>;

pub fn register_purchase_pipeline(orka_registry: &Arc<Orka<AppError>>) {
  orka_registry.register_pipeline(build_purchase_pipeline());
}

pub fn build_purchase_pipeline() -> Pipeline<PurchaseCtxData, AppError> {
  let cart_already_resolved: SkipCondition<PurchaseCtxData> =
    Arc::new(|ctx_data: ContextData<PurchaseCtxData>| ctx_data.read().cart_id.is_some());

  let mut p = Pipeline::<PurchaseCtxData, AppError>::new(&[
    (PURCHASE_STEPS[0], false, None),
    (PURCHASE_STEPS[1], false, None),
    (PURCHASE_STEPS[2], false, None),
    (PURCHASE_STEPS[3], false, Some(cart_already_resolved)),
    (PURCHASE_STEPS[4], false, None),
  ]);

  p.on_root(PURCHASE_STEPS[0], validate_purchase_input);
  p.on_root(PURCHASE_STEPS[1], load_product);
  p.on_root(PURCHASE_STEPS[2], find_existing_shopcart);
  p.on_root(PURCHASE_STEPS[3], create_shopcart);
  p.on_root(PURCHASE_STEPS[4], add_item_to_shopcart);
  p
}

fn unavailable(err: ShopcartError) -> AppError {
  AppError::ShopcartUnavailable(err.to_string())
}

fn validated_user(ctx_data: &ContextData<PurchaseCtxData>) -> Result<(i64, Arc<dyn ShopcartClient>), AppError> {
  let guard = ctx_data.read();
  let user_id = guard
    .request
    .map(|r| r.user_id)
    .ok_or_else(|| AppError::Internal("purchase request was not validated".to_string()))?;
  Ok((user_id, guard.shopcarts.clone()))
}

/// Product id from the path, user_id/amount from the body.
async fn validate_purchase_input(ctx_data: ContextData<PurchaseCtxData>) -> StepResult {
  let (raw_product_id, raw_body) = {
    let guard = ctx_data.read();
    (guard.raw_product_id.clone(), guard.raw_body.clone())
  };
  let product_id = parse_product_id(&raw_product_id)?;
  let request = PurchaseRequest::from_json(&raw_body)?;

  let mut guard = ctx_data.write();
  guard.product_id = Some(product_id);
  guard.request = Some(request);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "purchase::load_product", skip_all)]
async fn load_product(ctx_data: ContextData<PurchaseCtxData>) -> StepResult {
  let (product_id, store) = {
    let guard = ctx_data.read();
    (guard.product_id, guard.store.clone())
  };
  let product_id = product_id.ok_or_else(|| AppError::Internal("product id was not validated".to_string()))?;

  match store.find(product_id).await? {
    Some(product) => {
      ctx_data.write().product = Some(product);
      Ok(PipelineControl::Continue)
    }
    None => Err(AppError::NotFound(format!(
      "Product with id '{}' was not found.",
      product_id
    ))),
  }
}

/// First cart wins when the user already has several.
#[instrument(name = "purchase::find_existing_shopcart", skip_all)]
async fn find_existing_shopcart(ctx_data: ContextData<PurchaseCtxData>) -> StepResult {
  let (user_id, shopcarts) = validated_user(&ctx_data)?;

  let carts = shopcarts.find_carts_by_user(user_id).await.map_err(unavailable)?;
  if let Some(cart) = carts.first() {
    info!(user_id, cart_id = cart.id, carts_found = carts.len(), "Using existing shopcart");
    ctx_data.write().cart_id = Some(cart.id);
  }
  Ok(PipelineControl::Continue)
}

/// Only runs when the lookup found nothing.
#[instrument(name = "purchase::create_shopcart", skip_all)]
async fn create_shopcart(ctx_data: ContextData<PurchaseCtxData>) -> StepResult {
  let (user_id, shopcarts) = validated_user(&ctx_data)?;

  let cart = shopcarts.create_cart(user_id).await.map_err(|e| match e {
    ShopcartError::Rejected { .. } => AppError::ShopcartCreation(e.to_string()),
    other => unavailable(other),
  })?;
  info!(user_id, cart_id = cart.id, "Created shopcart for purchase");

  let mut guard = ctx_data.write();
  guard.cart_id = Some(cart.id);
  guard.cart_created = true;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "purchase::add_item_to_shopcart", skip_all)]
async fn add_item_to_shopcart(ctx_data: ContextData<PurchaseCtxData>) -> StepResult {
  let (cart_id, cart_created, item, shopcarts) = {
    let guard = ctx_data.read();
    let item = match (&guard.product, guard.request) {
      (Some(product), Some(request)) => product.id.map(|sku| CartItemRequest {
        sku,
        amount: request.amount,
        name: product.name.clone(),
        price: product.price,
      }),
      _ => None,
    };
    (guard.cart_id, guard.cart_created, item, guard.shopcarts.clone())
  };
  let (cart_id, item) = match (cart_id, item) {
    (Some(cart_id), Some(item)) => (cart_id, item),
    _ => return Err(AppError::Internal("purchase reached add-item without cart or product".to_string())),
  };

  if let Err(e) = shopcarts.add_item(cart_id, &item).await {
    if cart_created {
      warn!(cart_id, error = %e, "Add-item failed; newly created shopcart left empty");
    }
    return Err(match e {
      ShopcartError::Rejected { .. } => AppError::ShopcartRejected(e.to_string()),
      other => unavailable(other),
    });
  }

  info!(cart_id, sku = item.sku, amount = item.amount, "Product added to shopcart");
  ctx_data.write().item_added = true;
  Ok(PipelineControl::Continue)
}
