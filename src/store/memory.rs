// product_service/src/store/memory.rs

use crate::errors::{AppError, Result};
use crate::models::{Product, ProductFilter};
use crate::store::{missing_id_error, ProductStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Rows {
  by_id: BTreeMap<i64, Product>,
  last_id: i64,
}

/// Process-local product table with the same observable semantics as the
/// PostgreSQL store: sequential ids starting at 1, exact case-sensitive string
/// matches, inclusive price bounds.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
  rows: RwLock<Rows>,
}

impl InMemoryProductStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.rows.read().by_id.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
  async fn create(&self, product: &Product) -> Result<Product> {
    info!(name = %product.name, "Creating product");
    let mut rows = self.rows.write();
    rows.last_id += 1;
    let id = rows.last_id;
    let created = Product {
      id: Some(id),
      ..product.clone()
    };
    rows.by_id.insert(id, created.clone());
    Ok(created)
  }

  async fn update(&self, product: &Product) -> Result<Product> {
    let id = product.id.ok_or_else(missing_id_error)?;
    info!(product_id = id, name = %product.name, "Saving product");
    let mut rows = self.rows.write();
    match rows.by_id.get_mut(&id) {
      Some(slot) => {
        *slot = product.clone();
        Ok(slot.clone())
      }
      None => Err(AppError::NotFound(format!("Product with id '{}' was not found.", id))),
    }
  }

  async fn delete(&self, product: &Product) -> Result<()> {
    let id = product.id.ok_or_else(missing_id_error)?;
    info!(product_id = id, "Deleting product");
    self.rows.write().by_id.remove(&id);
    Ok(())
  }

  async fn find(&self, id: i64) -> Result<Option<Product>> {
    debug!(product_id = id, "Processing lookup");
    Ok(self.rows.read().by_id.get(&id).cloned())
  }

  async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
    debug!(?filter, "Processing product query");
    Ok(self.rows.read().by_id.values().filter(|p| filter.matches(p)).cloned().collect())
  }
}
