// product_service/src/main.rs

use product_service::config::{AppConfig, LogFormat, StoreBackend};
use product_service::errors::{AppError, Result as AppResult};
use product_service::services::{HttpShopcartClient, ShopcartClient};
use product_service::state::AppState;
use product_service::store::{InMemoryProductStore, PgProductStore, ProductStore};
use product_service::web::configure_app_routes;

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  match format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

async fn build_store(config: &AppConfig) -> AppResult<Arc<dyn ProductStore>> {
  match config.store_backend {
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory product store; data is lost on shutdown.");
      Ok(Arc::new(InMemoryProductStore::new()))
    }
    StoreBackend::Postgres => {
      let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;
      let store = PgProductStore::connect(url, config.database_max_connections).await?;
      store.init_schema().await?;
      Ok(Arc::new(store))
    }
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };
  init_tracing(app_config.log_format);
  tracing::info!("Starting product service...");

  let store = build_store(&app_config).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to initialize the product store.");
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
  })?;

  let shopcarts: Arc<dyn ShopcartClient> = Arc::new(
    HttpShopcartClient::new(app_config.shopcart_service_url.clone(), app_config.shopcart_timeout).map_err(|e| {
      tracing::error!(error = %e, "Failed to build the shopcart client.");
      std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?,
  );
  tracing::info!(shopcart_service_url = %app_config.shopcart_service_url, "Shopcart client ready.");

  let app_state = AppState::new(store, shopcarts);

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
