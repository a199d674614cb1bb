// product_service/src/web/handlers/product_handlers.rs

use actix_web::http::header::LOCATION;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::ProductFilter;
use crate::state::AppState;
use crate::validation::{parse_json_body, parse_product_id, ProductPayload};
use crate::web::extractors::JsonContentType;

/// Resource name used to build `Location` headers.
pub const PRODUCT_RESOURCE: &str = "get_product";

#[derive(Deserialize, Debug, Default)]
pub struct ListProductsQuery {
  pub name: Option<String>,
  pub category: Option<String>,
  pub description: Option<String>,
  pub minimum: Option<String>,
  pub maximum: Option<String>,
}

impl ListProductsQuery {
  /// Empty text criteria are ignored. Price bounds must come as a pair, both non-empty.
  pub fn into_filter(self) -> Result<ProductFilter> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    let mut filter = ProductFilter::new();
    filter.name = non_empty(self.name);
    filter.category = non_empty(self.category);
    filter.description = non_empty(self.description);

    match (self.minimum, self.maximum) {
      (None, None) => {}
      (Some(min), Some(max)) if !min.trim().is_empty() && !max.trim().is_empty() => {
        let min = parse_bound("minimum", &min)?;
        let max = parse_bound("maximum", &max)?;
        filter = filter.price_between(min, max);
      }
      _ => {
        return Err(AppError::Validation(
          "Minimum and Maximum cannot be empty".to_string(),
        ))
      }
    }
    Ok(filter)
  }
}

fn parse_bound(which: &str, raw: &str) -> Result<f64> {
  raw
    .trim()
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite())
    .ok_or_else(|| AppError::Validation(format!("{} price '{}' is not a number", which, raw)))
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse> {
  info!("Request for product list");
  let filter = query.into_inner().into_filter()?;
  let products = app_state.store.search(&filter).await?;
  info!("Returning {} products", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[derive(Deserialize, Debug)]
pub struct PriceRangeQuery {
  pub minimum: Option<String>,
  pub maximum: Option<String>,
}

/// `GET /products/price`: same as the list endpoint, but both bounds are mandatory.
#[instrument(name = "handler::query_products_by_price", skip(app_state))]
pub async fn query_products_by_price_handler(
  app_state: web::Data<AppState>,
  query: web::Query<PriceRangeQuery>,
) -> Result<HttpResponse> {
  info!("Querying products by provided price range");
  let PriceRangeQuery { minimum, maximum } = query.into_inner();
  if minimum.is_none() || maximum.is_none() {
    return Err(AppError::Validation("Minimum and Maximum cannot be empty".to_string()));
  }
  let filter = ListProductsQuery {
    minimum,
    maximum,
    ..Default::default()
  }
  .into_filter()?;

  let products = app_state.store.search(&filter).await?;
  info!("Returning {} products", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::create_product", skip_all)]
pub async fn create_product_handler(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  _json: JsonContentType,
  body: web::Bytes,
) -> Result<HttpResponse> {
  info!("Request to create a product");
  let payload = ProductPayload::from_json(&parse_json_body(&body)?)?;
  let product = app_state.store.create(&payload.into_new_product()?).await?;

  let id = product
    .id
    .ok_or_else(|| AppError::Internal("store returned a product without an id".to_string()))?;
  let location = req
    .url_for(PRODUCT_RESOURCE, [id.to_string()])
    .map_err(|e| AppError::Internal(format!("cannot build product location: {}", e)))?;

  info!(product_id = id, "Product created");
  Ok(
    HttpResponse::Created()
      .insert_header((LOCATION, location.to_string()))
      .json(product),
  )
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
  let product_id = parse_product_id(&path)?;
  info!("Request for product");

  match app_state.store.find(product_id).await? {
    Some(product) => Ok(HttpResponse::Ok().json(product)),
    None => {
      warn!("Product not found");
      Err(not_found(product_id))
    }
  }
}

#[instrument(name = "handler::update_product", skip(app_state, path, body), fields(product_id = %path.as_str()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  _json: JsonContentType,
  path: web::Path<String>,
  body: web::Bytes,
) -> Result<HttpResponse> {
  let product_id = parse_product_id(&path)?;
  info!("Request to update product");

  let existing = app_state
    .store
    .find(product_id)
    .await?
    .ok_or_else(|| not_found(product_id))?;
  let payload = ProductPayload::from_json(&parse_json_body(&body)?)?;
  let updated = app_state.store.update(&payload.merge_into(&existing)?).await?;

  info!("Product updated");
  Ok(HttpResponse::Ok().json(updated))
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn delete_product_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
  info!("Request to delete product");

  // An id that cannot name a row has nothing to delete.
  match parse_product_id(&path) {
    Ok(product_id) => {
      if let Some(product) = app_state.store.find(product_id).await? {
        app_state.store.delete(&product).await?;
      }
    }
    Err(e) => debug!(error = %e, "Delete requested for a non-integer id"),
  }

  info!("Product delete complete");
  Ok(HttpResponse::NoContent().finish())
}

fn not_found(product_id: i64) -> AppError {
  AppError::NotFound(format!("Product with id '{}' was not found.", product_id))
}
