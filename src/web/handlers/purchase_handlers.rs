// product_service/src/web/handlers/purchase_handlers.rs

use actix_web::{web, HttpResponse};
use orka::{ContextData, PipelineResult};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::pipelines::contexts::PurchaseCtxData;
use crate::state::AppState;
use crate::web::extractors::JsonContentType;

#[instrument(name = "handler::purchase_product", skip(app_state, path, body), fields(product_id = %path.as_str()))]
pub async fn purchase_product_handler(
  app_state: web::Data<AppState>,
  _json: JsonContentType,
  path: web::Path<String>,
  body: web::Bytes,
) -> Result<HttpResponse> {
  info!("Request to purchase product");

  // An unparsable body is reported by the validation step, after the product id.
  let raw_body = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
  let purchase_ctx = ContextData::new(PurchaseCtxData::new(
    app_state.store.clone(),
    app_state.shopcarts.clone(),
    path.into_inner(),
    raw_body,
  ));

  match app_state.orka_instance.run(purchase_ctx.clone()).await {
    Ok(PipelineResult::Completed) => {
      let guard = purchase_ctx.read();
      let cart_id = guard.cart_id.filter(|_| guard.item_added).ok_or_else(|| {
        AppError::Internal("Purchase completed without adding the product to a shopcart.".to_string())
      })?;
      info!(cart_id, cart_created = guard.cart_created, "Purchase completed");
      Ok(HttpResponse::Ok().json(json!({
        "message": "Product successfully added into the shopcart",
        "shopcart_id": cart_id,
        "cart_created": guard.cart_created,
      })))
    }
    Ok(PipelineResult::Stopped) => {
      warn!("Purchase pipeline stopped before the product was added");
      Err(AppError::Internal("Purchase was halted before completion.".to_string()))
    }
    Err(app_err) => {
      warn!(error = %app_err, "Purchase failed");
      Err(app_err)
    }
  }
}
