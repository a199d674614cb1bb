// product_service/src/models/filter.rs

//! A conjunctive product filter. Each criterion is optional; the ones that are set
//! are ANDed together, so one type covers every name/category/description/price
//! combination.

use crate::models::Product;

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
  pub min: f64,
  pub max: f64,
}

impl PriceRange {
  pub fn contains(&self, price: f64) -> bool {
    price >= self.min && price <= self.max
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
  pub name: Option<String>,
  pub category: Option<String>,
  pub description: Option<String>,
  pub price: Option<PriceRange>,
}

impl ProductFilter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn price_between(mut self, min: f64, max: f64) -> Self {
    self.price = Some(PriceRange { min, max });
    self
  }

  /// True when no criterion is set, i.e. the filter selects every product.
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.category.is_none() && self.description.is_none() && self.price.is_none()
  }

  /// Evaluates the filter in memory. String criteria are exact, case-sensitive matches,
  /// the same semantics PostgreSQL's default collation gives `=`.
  pub fn matches(&self, product: &Product) -> bool {
    self.name.as_ref().map_or(true, |n| *n == product.name)
      && self.category.as_ref().map_or(true, |c| *c == product.category)
      && self.description.as_ref().map_or(true, |d| *d == product.description)
      && self.price.map_or(true, |range| range.contains(product.price))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn phone() -> Product {
    Product::new("iPhone", "Black iPhone", "Technology", 999.99)
  }

  #[test]
  fn empty_filter_matches_everything() {
    let filter = ProductFilter::new();
    assert!(filter.is_empty());
    assert!(filter.matches(&phone()));
  }

  #[test]
  fn criteria_are_conjunctive() {
    let product = phone();
    assert!(ProductFilter::new().name("iPhone").category("Technology").matches(&product));
    assert!(!ProductFilter::new().name("iPhone").category("Food").matches(&product));
    assert!(ProductFilter::new()
      .name("iPhone")
      .category("Technology")
      .description("Black iPhone")
      .price_between(900.0, 1000.0)
      .matches(&product));
    assert!(!ProductFilter::new().description("Black iPhone").price_between(0.0, 10.0).matches(&product));
  }

  #[test]
  fn price_range_is_inclusive_on_both_bounds() {
    let product = phone();
    assert!(ProductFilter::new().price_between(999.99, 2000.0).matches(&product));
    assert!(ProductFilter::new().price_between(1.0, 999.99).matches(&product));
    assert!(!ProductFilter::new().price_between(1000.0, 2000.0).matches(&product));
  }

  #[test]
  fn category_match_is_case_sensitive() {
    let product = phone();
    assert!(ProductFilter::new().category("Technology").matches(&product));
    assert!(!ProductFilter::new().category("technology").matches(&product));
  }
}
