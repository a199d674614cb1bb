// product_service/src/store/mod.rs

//! Product persistence. `ProductStore` is the seam the HTTP layer and the purchase
//! pipeline depend on; `PgProductStore` backs production, `InMemoryProductStore`
//! backs tests and the `memory` backend.

use crate::errors::Result;
use crate::models::{Product, ProductFilter};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryProductStore;
pub use postgres::PgProductStore;

#[async_trait]
pub trait ProductStore: Send + Sync {
  /// Persists a new row. Any id on `product` is ignored; the returned product carries
  /// the id the store assigned.
  async fn create(&self, product: &Product) -> Result<Product>;

  /// Writes `product` over the row with the same id. Fails with a validation error
  /// if `product.id` is `None` and with not-found if no such row exists.
  async fn update(&self, product: &Product) -> Result<Product>;

  /// Removes the row with `product.id`. Removing an id that is already gone succeeds.
  async fn delete(&self, product: &Product) -> Result<()>;

  async fn find(&self, id: i64) -> Result<Option<Product>>;

  /// Every product matching all criteria set on `filter`, ordered by id.
  async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>>;

  async fn all(&self) -> Result<Vec<Product>> {
    self.search(&ProductFilter::new()).await
  }

  async fn find_by_name(&self, name: &str) -> Result<Vec<Product>> {
    self.search(&ProductFilter::new().name(name)).await
  }

  async fn find_by_category(&self, category: &str) -> Result<Vec<Product>> {
    self.search(&ProductFilter::new().category(category)).await
  }

  async fn find_by_description(&self, description: &str) -> Result<Vec<Product>> {
    self.search(&ProductFilter::new().description(description)).await
  }

  async fn query_by_price(&self, min: f64, max: f64) -> Result<Vec<Product>> {
    self.search(&ProductFilter::new().price_between(min, max)).await
  }
}

pub(crate) fn missing_id_error() -> crate::errors::AppError {
  crate::errors::AppError::Validation("Update called with empty ID field".to_string())
}
