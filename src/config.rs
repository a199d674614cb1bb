// product_service/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which `ProductStore` implementation the server wires up at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  pub shopcart_service_url: String,
  pub shopcart_timeout: Duration,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable lookup so tests don't touch the process env.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = get_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let store_backend = get_or("STORE_BACKEND", "postgres").parse::<StoreBackend>()?;
    let database_url = lookup("DATABASE_URL");
    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required for the postgres store)".to_string(),
      ));
    }
    let database_max_connections = get_or("DATABASE_MAX_CONNECTIONS", "5")
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;

    let shopcart_service_url = get_or("SHOPCART_SERVICE_URL", "http://localhost:5000")
      .trim_end_matches('/')
      .to_string();
    let shopcart_timeout_secs = get_or("SHOPCART_TIMEOUT_SECS", "3")
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid SHOPCART_TIMEOUT_SECS: {}", e)))?;

    let log_format = match get_or("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
      "json" => LogFormat::Json,
      "pretty" | "text" => LogFormat::Pretty,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT '{}'", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      database_max_connections,
      shopcart_service_url,
      shopcart_timeout: Duration::from_secs(shopcart_timeout_secs),
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn defaults_apply_for_memory_backend() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("STORE_BACKEND", "memory")])).unwrap();
    assert_eq!(cfg.bind_address(), "127.0.0.1:8080");
    assert_eq!(cfg.store_backend, StoreBackend::Memory);
    assert_eq!(cfg.shopcart_service_url, "http://localhost:5000");
    assert_eq!(cfg.shopcart_timeout, Duration::from_secs(3));
    assert_eq!(cfg.log_format, LogFormat::Pretty);
  }

  #[test]
  fn postgres_backend_requires_database_url() {
    let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("DATABASE_URL")));

    let cfg = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/products")])).unwrap();
    assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/products"));
  }

  #[test]
  fn invalid_values_are_config_errors() {
    let err = AppConfig::from_lookup(lookup_from(&[("STORE_BACKEND", "memory"), ("SERVER_PORT", "eighty")]))
      .unwrap_err();
    assert!(matches!(err, AppError::Config(_)));

    let err = AppConfig::from_lookup(lookup_from(&[("STORE_BACKEND", "redis")])).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
  }

  #[test]
  fn shopcart_url_trailing_slash_is_trimmed() {
    let cfg = AppConfig::from_lookup(lookup_from(&[
      ("STORE_BACKEND", "memory"),
      ("SHOPCART_SERVICE_URL", "http://carts:8081/"),
      ("SHOPCART_TIMEOUT_SECS", "1"),
    ]))
    .unwrap();
    assert_eq!(cfg.shopcart_service_url, "http://carts:8081");
    assert_eq!(cfg.shopcart_timeout, Duration::from_secs(1));
  }
}
