// product_service/src/web/handlers/mod.rs

pub mod index_handlers;
pub mod product_handlers;
pub mod purchase_handlers;
