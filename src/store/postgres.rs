// product_service/src/store/postgres.rs

use crate::errors::{AppError, Result};
use crate::models::{Product, ProductFilter};
use crate::store::{missing_id_error, ProductStore};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, error, info, instrument, warn};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
  id          BIGSERIAL PRIMARY KEY,
  name        VARCHAR(63)  NOT NULL,
  description VARCHAR(256) NOT NULL,
  category    VARCHAR(63)  NOT NULL,
  price       DOUBLE PRECISION NOT NULL
)
"#;

const PRODUCT_COLUMNS: &str = "id, name, description, category, price";

#[derive(Debug, Clone)]
pub struct PgProductStore {
  pool: PgPool,
}

impl PgProductStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await
      .map_err(|e| {
        error!("Failed to connect to the database: {}", e);
        AppError::Sqlx(e)
      })?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  /// Creates the products table when it does not exist yet.
  pub async fn init_schema(&self) -> Result<()> {
    info!("Initializing database schema");
    sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
    Ok(())
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  /// Commits `tx`, or rolls it back when `outcome` is an error. Either way the
  /// failure is logged and returned; the store never swallows it.
  async fn finish<T>(
    tx: Transaction<'static, Postgres>,
    operation: &'static str,
    outcome: std::result::Result<T, sqlx::Error>,
  ) -> Result<T> {
    match outcome {
      Ok(value) => {
        tx.commit().await.map_err(|e| {
          error!(operation, error = %e, "Commit failed; transaction rolled back");
          AppError::Sqlx(e)
        })?;
        Ok(value)
      }
      Err(e) => {
        error!(operation, error = %e, "Statement failed; rolling back");
        if let Err(rollback_err) = tx.rollback().await {
          warn!(operation, error = %rollback_err, "Rollback failed");
        }
        Err(AppError::Sqlx(e))
      }
    }
  }
}

/// Appends `WHERE a AND b AND ...` for every criterion set on `filter`.
pub(crate) fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
  let mut separator = " WHERE ";
  if let Some(name) = &filter.name {
    qb.push(separator).push("name = ").push_bind(name.clone());
    separator = " AND ";
  }
  if let Some(category) = &filter.category {
    qb.push(separator).push("category = ").push_bind(category.clone());
    separator = " AND ";
  }
  if let Some(description) = &filter.description {
    qb.push(separator).push("description = ").push_bind(description.clone());
    separator = " AND ";
  }
  if let Some(range) = filter.price {
    qb.push(separator)
      .push("price BETWEEN ")
      .push_bind(range.min)
      .push(" AND ")
      .push_bind(range.max);
  }
}

#[async_trait]
impl ProductStore for PgProductStore {
  #[instrument(name = "store::create", skip(self, product), fields(name = %product.name))]
  async fn create(&self, product: &Product) -> Result<Product> {
    info!("Creating product");
    let mut tx = self.pool.begin().await?;
    let outcome = sqlx::query_as::<_, Product>(&format!(
      "INSERT INTO products (name, description, category, price) VALUES ($1, $2, $3, $4) RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.category)
    .bind(product.price)
    .fetch_one(&mut *tx)
    .await;
    Self::finish(tx, "create", outcome).await
  }

  #[instrument(name = "store::update", skip(self, product), fields(product_id = ?product.id))]
  async fn update(&self, product: &Product) -> Result<Product> {
    let id = product.id.ok_or_else(missing_id_error)?;
    info!("Saving product");
    let mut tx = self.pool.begin().await?;
    let outcome = sqlx::query_as::<_, Product>(&format!(
      "UPDATE products SET name = $1, description = $2, category = $3, price = $4 WHERE id = $5 RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.category)
    .bind(product.price)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await;

    match Self::finish(tx, "update", outcome).await? {
      Some(updated) => Ok(updated),
      None => Err(AppError::NotFound(format!("Product with id '{}' was not found.", id))),
    }
  }

  #[instrument(name = "store::delete", skip(self, product), fields(product_id = ?product.id))]
  async fn delete(&self, product: &Product) -> Result<()> {
    let id = product.id.ok_or_else(missing_id_error)?;
    info!("Deleting product");
    let mut tx = self.pool.begin().await?;
    let outcome = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&mut *tx)
      .await;
    let result = Self::finish(tx, "delete", outcome).await?;
    debug!(rows_affected = result.rows_affected(), "Delete finished");
    Ok(())
  }

  async fn find(&self, id: i64) -> Result<Option<Product>> {
    debug!(product_id = id, "Processing lookup");
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
    debug!(?filter, "Processing product query");
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM products", PRODUCT_COLUMNS));
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY id ASC");
    let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
    Ok(products)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rendered(filter: &ProductFilter) -> String {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM products");
    push_filter(&mut qb, filter);
    qb.sql().to_string()
  }

  #[test]
  fn empty_filter_adds_no_where_clause() {
    assert_eq!(rendered(&ProductFilter::new()), "SELECT * FROM products");
  }

  #[test]
  fn criteria_are_joined_with_and() {
    let filter = ProductFilter::new().name("Doll").description("American Girl Doll");
    assert_eq!(
      rendered(&filter),
      "SELECT * FROM products WHERE name = $1 AND description = $2"
    );
  }

  #[test]
  fn full_filter_binds_five_parameters_in_order() {
    let filter = ProductFilter::new()
      .name("Doll")
      .category("Toy")
      .description("American Girl Doll")
      .price_between(1.0, 20.0);
    assert_eq!(
      rendered(&filter),
      "SELECT * FROM products WHERE name = $1 AND category = $2 AND description = $3 AND price BETWEEN $4 AND $5"
    );
  }
}
