// product_service/src/validation.rs

//! Turns untyped request payloads into typed values. Nothing here touches the store.

use crate::errors::{AppError, Result};
use crate::models::{Product, CATEGORY_MAX_LEN, DESCRIPTION_MAX_LEN, NAME_MAX_LEN};
use serde_json::{Map, Value};

const REQUIRED_PRODUCT_KEYS: [&str; 4] = ["name", "description", "category", "price"];

/// Parses a raw request body as JSON.
pub fn parse_json_body(body: &[u8]) -> Result<Value> {
  serde_json::from_slice(body).map_err(|e| AppError::Validation(format!("Request body is not valid JSON: {}", e)))
}

/// Product fields as they arrived. Empty strings are kept as-is; `price` is `None`
/// when the client sent `""` or `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPayload {
  pub name: String,
  pub description: String,
  pub category: String,
  pub price: Option<f64>,
}

impl ProductPayload {
  /// Checks key presence and coerces field types. Any `id` in the payload is ignored.
  pub fn from_json(value: &Value) -> Result<Self> {
    let object = value.as_object().ok_or_else(|| {
      AppError::Validation("Invalid product: body of request contained bad or no data".to_string())
    })?;

    if let Some(missing) = REQUIRED_PRODUCT_KEYS.iter().find(|key| !object.contains_key(**key)) {
      return Err(AppError::Validation(format!("Invalid product: missing {}", missing)));
    }

    Ok(Self {
      name: string_field(object, "name")?,
      description: string_field(object, "description")?,
      category: string_field(object, "category")?,
      price: price_field(object)?,
    })
  }

  /// Builds a new, unsaved product. Every field must be non-empty.
  pub fn into_new_product(self) -> Result<Product> {
    for (field, value) in [("name", &self.name), ("description", &self.description), ("category", &self.category)] {
      if value.trim().is_empty() {
        return Err(AppError::Validation(format!("Invalid product: {} cannot be empty", field)));
      }
    }
    let price = self
      .price
      .ok_or_else(|| AppError::Validation("Invalid product: price cannot be empty".to_string()))?;

    let product = Product::new(self.name, self.description, self.category, price);
    check_limits(&product)?;
    Ok(product)
  }

  /// Overlays this payload on a stored product. Empty or blank fields keep the stored
  /// value; the id always comes from `existing`.
  pub fn merge_into(self, existing: &Product) -> Result<Product> {
    let keep_or = |incoming: String, current: &String| {
      if incoming.trim().is_empty() {
        current.clone()
      } else {
        incoming
      }
    };

    let merged = Product {
      id: existing.id,
      name: keep_or(self.name, &existing.name),
      description: keep_or(self.description, &existing.description),
      category: keep_or(self.category, &existing.category),
      price: self.price.unwrap_or(existing.price),
    };
    check_limits(&merged)?;
    Ok(merged)
  }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Result<String> {
  match object.get(key) {
    Some(Value::String(s)) => Ok(s.clone()),
    Some(Value::Null) => Ok(String::new()),
    _ => Err(AppError::Validation(format!("Invalid product: {} must be a string", key))),
  }
}

fn price_field(object: &Map<String, Value>) -> Result<Option<f64>> {
  let invalid = || AppError::Validation("Invalid product: price must be a number".to_string());
  let price = match object.get("price") {
    Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid)?,
    Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
    Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid())?,
    Some(Value::Null) => return Ok(None),
    _ => return Err(invalid()),
  };
  if !price.is_finite() {
    return Err(invalid());
  }
  Ok(Some(price))
}

fn check_limits(product: &Product) -> Result<()> {
  let limits = [
    ("name", &product.name, NAME_MAX_LEN),
    ("description", &product.description, DESCRIPTION_MAX_LEN),
    ("category", &product.category, CATEGORY_MAX_LEN),
  ];
  for (field, value, max) in limits {
    if value.chars().count() > max {
      return Err(AppError::Validation(format!(
        "Invalid product: {} exceeds {} characters",
        field, max
      )));
    }
  }
  if product.price < 0.0 {
    return Err(AppError::Validation("Invalid product: price cannot be negative".to_string()));
  }
  Ok(())
}

/// Parses a product id taken from the URL path.
pub fn parse_product_id(raw: &str) -> Result<i64> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(AppError::Validation("Product id cannot be empty".to_string()));
  }
  trimmed
    .parse::<i64>()
    .map_err(|_| AppError::Validation(format!("Product id '{}' must be an integer", raw)))
}

/// A validated purchase request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseRequest {
  pub user_id: i64,
  pub amount: i64,
}

impl PurchaseRequest {
  pub fn from_json(value: &Value) -> Result<Self> {
    let object = value.as_object().ok_or_else(|| {
      AppError::Validation("Invalid purchase: body of request contained bad or no data".to_string())
    })?;

    let user_id = integer_field(object, "user_id")?;
    let amount = integer_field(object, "amount")?;
    if amount <= 0 {
      return Err(AppError::Validation("amount must be a positive integer".to_string()));
    }
    Ok(Self { user_id, amount })
  }
}

fn integer_field(object: &Map<String, Value>, key: &str) -> Result<i64> {
  let not_integer = || AppError::Validation(format!("{} must be an integer", key));
  match object.get(key) {
    None | Some(Value::Null) => Err(AppError::Validation(format!("{} cannot be empty", key))),
    Some(Value::String(s)) if s.trim().is_empty() => Err(AppError::Validation(format!("{} cannot be empty", key))),
    Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| not_integer()),
    Some(Value::Number(n)) => match n.as_i64() {
      Some(i) => Ok(i),
      // 3.0 is accepted as 3; 3.5 is not.
      None => match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(not_integer()),
      },
    },
    Some(_) => Err(not_integer()),
  }
}
