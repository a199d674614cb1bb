// product_service/src/web/handlers/index_handlers.rs

use actix_web::HttpResponse;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Product Service</title>
  </head>
  <body>
    <h1>Product Service</h1>
    <p>Welcome to the service for the Products team.</p>
    <p>The REST API lives under <code>/products</code>.</p>
  </body>
</html>
"#;

pub async fn index_handler() -> HttpResponse {
  HttpResponse::Ok().content_type("text/html; charset=utf-8").body(INDEX_HTML)
}

// Liveness only; it does not check the database or the shopcart service.
pub async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
