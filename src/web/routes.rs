// product_service/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{index_handlers, product_handlers, purchase_handlers};

/// Called from `main.rs` and from the integration tests to mount every endpoint.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/", web::get().to(index_handlers::index_handler))
    .route("/health", web::get().to(index_handlers::health_check_handler))
    .service(
      web::scope("/products")
        .route("", web::get().to(product_handlers::list_products_handler))
        .route("", web::post().to(product_handlers::create_product_handler))
        // Must precede "/{product_id}".
        .route("/price", web::get().to(product_handlers::query_products_by_price_handler))
        .service(
          web::resource("/{product_id}")
            .name(product_handlers::PRODUCT_RESOURCE)
            .route(web::get().to(product_handlers::get_product_handler))
            .route(web::put().to(product_handlers::update_product_handler))
            .route(web::delete().to(product_handlers::delete_product_handler)),
        )
        .route(
          "/{product_id}/purchase",
          web::post().to(purchase_handlers::purchase_product_handler),
        ),
    );
}
