// product_service/src/services/shopcart_client.rs

//! Adapter for the external shopcart service. Three calls, no retries: list a user's
//! carts, create a cart, add an item to a cart.

use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// A cart as returned by the shopcart service. Fields other than these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shopcart {
  pub id: i64,
  pub user_id: i64,
}

/// Body of the add-item call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemRequest {
  pub sku: i64,
  pub amount: i64,
  pub name: String,
  pub price: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ShopcartError {
  /// The request never produced a response: connection refused, DNS, timeout.
  #[error("network error: {0}")]
  Transport(String),

  /// The service answered with a non-2xx status.
  #[error("service responded {status}: {body}")]
  Rejected { status: u16, body: String },

  /// The service answered 2xx but the body was not what we expected.
  #[error("unreadable response: {0}")]
  Decode(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShopcartClient: Send + Sync {
  async fn find_carts_by_user(&self, user_id: i64) -> Result<Vec<Shopcart>, ShopcartError>;

  async fn create_cart(&self, user_id: i64) -> Result<Shopcart, ShopcartError>;

  async fn add_item(&self, cart_id: i64, item: &CartItemRequest) -> Result<(), ShopcartError>;
}

#[derive(Serialize)]
struct CreateCartBody {
  user_id: i64,
}

#[derive(Debug, Clone)]
pub struct HttpShopcartClient {
  client: Client,
  base_url: String,
}

impl HttpShopcartClient {
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| AppError::Internal(format!("Failed to build shopcart HTTP client: {}", e)))?;
    Ok(Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_string(),
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  async fn rejected(response: reqwest::Response) -> ShopcartError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ShopcartError::Rejected {
      status: status.as_u16(),
      body,
    }
  }
}

fn transport(err: reqwest::Error) -> ShopcartError {
  ShopcartError::Transport(err.to_string())
}

#[async_trait]
impl ShopcartClient for HttpShopcartClient {
  #[instrument(name = "shopcart::find_carts_by_user", skip(self))]
  async fn find_carts_by_user(&self, user_id: i64) -> Result<Vec<Shopcart>, ShopcartError> {
    let response = self
      .client
      .get(format!("{}/shopcarts", self.base_url))
      .query(&[("user_id", user_id)])
      .send()
      .await
      .map_err(transport)?;

    if !response.status().is_success() {
      return Err(Self::rejected(response).await);
    }
    let carts: Vec<Shopcart> = response
      .json()
      .await
      .map_err(|e| ShopcartError::Decode(e.to_string()))?;
    debug!(count = carts.len(), "Shopcart lookup finished");
    Ok(carts)
  }

  #[instrument(name = "shopcart::create_cart", skip(self))]
  async fn create_cart(&self, user_id: i64) -> Result<Shopcart, ShopcartError> {
    let response = self
      .client
      .post(format!("{}/shopcarts", self.base_url))
      .json(&CreateCartBody { user_id })
      .send()
      .await
      .map_err(transport)?;

    if !response.status().is_success() {
      let err = Self::rejected(response).await;
      warn!(error = %err, "Shopcart creation refused");
      return Err(err);
    }
    let cart: Shopcart = response
      .json()
      .await
      .map_err(|e| ShopcartError::Decode(e.to_string()))?;
    info!(cart_id = cart.id, "Shopcart created");
    Ok(cart)
  }

  #[instrument(name = "shopcart::add_item", skip(self, item), fields(sku = item.sku, amount = item.amount))]
  async fn add_item(&self, cart_id: i64, item: &CartItemRequest) -> Result<(), ShopcartError> {
    let response = self
      .client
      .post(format!("{}/shopcarts/{}/items", self.base_url, cart_id))
      .json(item)
      .send()
      .await
      .map_err(transport)?;

    match response.status() {
      status if status.is_success() => {
        info!(%status, "Item added to shopcart");
        Ok(())
      }
      StatusCode::NOT_FOUND => {
        warn!("Shopcart disappeared before the item could be added");
        Err(Self::rejected(response).await)
      }
      _ => Err(Self::rejected(response).await),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn base_url_is_normalised() {
    let client = HttpShopcartClient::new("http://carts:5000/", Duration::from_secs(1)).unwrap();
    assert_eq!(client.base_url(), "http://carts:5000");
  }

  #[test]
  fn cart_item_serializes_with_wire_field_names() {
    let item = CartItemRequest {
      sku: 4,
      amount: 2,
      name: "Doll".to_string(),
      price: 12.99,
    };
    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(value, serde_json::json!({"sku": 4, "amount": 2, "name": "Doll", "price": 12.99}));
  }

  #[test]
  fn shopcart_ignores_unknown_fields() {
    let cart: Shopcart = serde_json::from_str(r#"{"id": 9, "user_id": 3, "items": []}"#).unwrap();
    assert_eq!(cart, Shopcart { id: 9, user_id: 3 });
  }

  #[tokio::test]
  async fn unreachable_service_is_a_transport_error() {
    // Port 9 (discard) on localhost is closed in test environments.
    let client = HttpShopcartClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    let err = client.find_carts_by_user(1).await.unwrap_err();
    assert!(matches!(err, ShopcartError::Transport(_)));
  }
}
