// product_service/src/services/mod.rs

//! Clients for services this one depends on.

pub mod shopcart_client;

pub use shopcart_client::{CartItemRequest, HttpShopcartClient, Shopcart, ShopcartClient, ShopcartError};
