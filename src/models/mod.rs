// product_service/src/models/mod.rs

//! Contains data structures representing database entities and the queries over them.

pub mod filter;
pub mod product;

pub use filter::{PriceRange, ProductFilter};
pub use product::{Product, DESCRIPTION_MAX_LEN, NAME_MAX_LEN, CATEGORY_MAX_LEN};
