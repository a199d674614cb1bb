// product_service/tests/common/mod.rs

#![allow(dead_code, unused_macros)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::Arc;

use product_service::errors::{AppError, Result};
use product_service::models::{Product, ProductFilter};
use product_service::services::{CartItemRequest, Shopcart, ShopcartClient, ShopcartError};
use product_service::state::AppState;
use product_service::store::{InMemoryProductStore, ProductStore};

static TRACING: Lazy<()> = Lazy::new(|| {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

/// Builds the service with every route mounted, the same way `main.rs` does.
macro_rules! init_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state))
        .wrap(tracing_actix_web::TracingLogger::default())
        .configure(product_service::web::configure_app_routes),
    )
    .await
  };
}

pub fn test_state(store: Arc<dyn ProductStore>, shopcarts: Arc<dyn ShopcartClient>) -> AppState {
  setup_tracing();
  AppState::new(store, shopcarts)
}

/// Seeds a fresh in-memory store.
pub async fn seeded_store(products: &[Product]) -> Arc<InMemoryProductStore> {
  let store = Arc::new(InMemoryProductStore::new());
  for p in products {
    store.create(p).await.unwrap();
  }
  store
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartCall {
  FindByUser(i64),
  Create(i64),
  AddItem(i64, CartItemRequest),
}

/// Scripted outcome for the create/add calls of the fake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
  Ok,
  Rejected(u16),
  Unreachable,
}

impl Outcome {
  fn into_error(self) -> Option<ShopcartError> {
    match self {
      Outcome::Ok => None,
      Outcome::Rejected(status) => Some(ShopcartError::Rejected {
        status,
        body: "refused".to_string(),
      }),
      Outcome::Unreachable => Some(ShopcartError::Transport("connection refused".to_string())),
    }
  }
}

/// Shopcart client that records every call and answers from a script.
pub struct RecordingShopcartClient {
  pub calls: Mutex<Vec<CartCall>>,
  existing: Vec<Shopcart>,
  next_cart_id: i64,
  lookup: Outcome,
  create: Outcome,
  add: Outcome,
}

impl RecordingShopcartClient {
  pub fn new() -> Self {
    Self {
      calls: Mutex::new(Vec::new()),
      existing: Vec::new(),
      next_cart_id: 100,
      lookup: Outcome::Ok,
      create: Outcome::Ok,
      add: Outcome::Ok,
    }
  }

  pub fn with_existing_carts(mut self, user_id: i64, ids: &[i64]) -> Self {
    self.existing = ids.iter().map(|&id| Shopcart { id, user_id }).collect();
    self
  }

  pub fn with_next_cart_id(mut self, id: i64) -> Self {
    self.next_cart_id = id;
    self
  }

  pub fn lookup_outcome(mut self, outcome: Outcome) -> Self {
    self.lookup = outcome;
    self
  }

  pub fn create_outcome(mut self, outcome: Outcome) -> Self {
    self.create = outcome;
    self
  }

  pub fn add_outcome(mut self, outcome: Outcome) -> Self {
    self.add = outcome;
    self
  }

  pub fn calls(&self) -> Vec<CartCall> {
    self.calls.lock().clone()
  }
}

#[async_trait]
impl ShopcartClient for RecordingShopcartClient {
  async fn find_carts_by_user(&self, user_id: i64) -> std::result::Result<Vec<Shopcart>, ShopcartError> {
    self.calls.lock().push(CartCall::FindByUser(user_id));
    match self.lookup.into_error() {
      Some(e) => Err(e),
      None => Ok(self.existing.iter().filter(|c| c.user_id == user_id).cloned().collect()),
    }
  }

  async fn create_cart(&self, user_id: i64) -> std::result::Result<Shopcart, ShopcartError> {
    self.calls.lock().push(CartCall::Create(user_id));
    match self.create.into_error() {
      Some(e) => Err(e),
      None => Ok(Shopcart {
        id: self.next_cart_id,
        user_id,
      }),
    }
  }

  async fn add_item(&self, cart_id: i64, item: &CartItemRequest) -> std::result::Result<(), ShopcartError> {
    self.calls.lock().push(CartCall::AddItem(cart_id, item.clone()));
    match self.add.into_error() {
      Some(e) => Err(e),
      None => Ok(()),
    }
  }
}

/// Store whose every operation fails the way a lost database connection does.
pub struct FailingStore;

fn db_down() -> AppError {
  AppError::Sqlx(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ProductStore for FailingStore {
  async fn create(&self, _product: &Product) -> Result<Product> {
    Err(db_down())
  }

  async fn update(&self, _product: &Product) -> Result<Product> {
    Err(db_down())
  }

  async fn delete(&self, _product: &Product) -> Result<()> {
    Err(db_down())
  }

  async fn find(&self, _id: i64) -> Result<Option<Product>> {
    Err(db_down())
  }

  async fn search(&self, _filter: &ProductFilter) -> Result<Vec<Product>> {
    Err(db_down())
  }
}
