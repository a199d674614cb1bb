// product_service/src/models/product.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const NAME_MAX_LEN: usize = 63;
pub const DESCRIPTION_MAX_LEN: usize = 256;
pub const CATEGORY_MAX_LEN: usize = 63;

/// A catalog item. `id` is `None` until the store persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: Option<i64>,
  pub name: String,
  pub description: String,
  pub category: String,
  pub price: f64,
}

impl Product {
  pub fn new(
    name: impl Into<String>,
    description: impl Into<String>,
    category: impl Into<String>,
    price: f64,
  ) -> Self {
    Self {
      id: None,
      name: name.into(),
      description: description.into(),
      category: category.into(),
      price,
    }
  }
}
