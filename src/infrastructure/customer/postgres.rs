//! PostgreSQL customer store
//!
//! Stores each customer as a JSONB document keyed by its record handle,
//! with a sequence column preserving insertion order.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::domain::customer::{Customer, CustomerFilter, CustomerStore, RecordHandle, StoredCustomer};
use crate::domain::DomainError;

use super::factory::PostgresConfig;

/// PostgreSQL customer store with connection pooling
///
/// The pool connects lazily, so an unreachable database surfaces as
/// [`DomainError::StoreUnavailable`] on the failing operation rather than
/// at startup.
pub struct PostgresCustomerStore {
    pool: PgPool,
    table_name: String,
    schema_ready: OnceCell<()>,
}

impl Debug for PostgresCustomerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresCustomerStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl PostgresCustomerStore {
    /// Creates a store over an existing pool
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Result<Self, DomainError> {
        let table_name = table_name.into();
        validate_table_name(&table_name)?;

        Ok(Self {
            pool,
            table_name,
            schema_ready: OnceCell::new(),
        })
    }

    /// Creates a store with a lazily connecting pool
    pub fn connect_lazy(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_lazy(&config.url)
            .map_err(|e| DomainError::configuration(format!("Invalid database URL: {}", e)))?;

        Self::new(pool, config.table.clone())
    }

    async fn ensure_table(&self) -> Result<(), DomainError> {
        self.schema_ready
            .get_or_try_init(|| async {
                let query = format!(
                    r#"
                    CREATE TABLE IF NOT EXISTS {} (
                        handle UUID PRIMARY KEY,
                        seq BIGSERIAL,
                        data JSONB NOT NULL,
                        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                    )
                    "#,
                    self.table_name
                );

                sqlx::query(&query)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error("create table", e))?;

                Ok::<(), DomainError>(())
            })
            .await?;

        Ok(())
    }

    async fn insert_with<'e, E>(executor: E, table: &str, customer: Customer) -> Result<StoredCustomer, DomainError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let stored = StoredCustomer::new(RecordHandle::generate(), customer);
        let data = serde_json::to_value(&stored.customer)
            .map_err(|e| DomainError::internal(format!("Failed to serialize customer: {}", e)))?;

        let query = format!("INSERT INTO {} (handle, data) VALUES ($1, $2)", table);

        sqlx::query(&query)
            .bind(stored.handle.as_uuid())
            .bind(&data)
            .execute(executor)
            .await
            .map_err(|e| map_sqlx_error("insert customer", e))?;

        Ok(stored)
    }
}

#[async_trait]
impl CustomerStore for PostgresCustomerStore {
    async fn find(&self, filter: &CustomerFilter) -> Result<Vec<StoredCustomer>, DomainError> {
        self.ensure_table().await?;

        let query = format!(
            "SELECT handle, data FROM {} WHERE data @> $1 ORDER BY seq",
            self.table_name
        );

        let rows = sqlx::query(&query)
            .bind(containment(filter))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find customers", e))?;

        let mut customers = Vec::with_capacity(rows.len());

        for row in rows {
            let handle: Uuid = row.get("handle");
            let data: Value = row.get("data");
            let customer: Customer = serde_json::from_value(data).map_err(|e| {
                DomainError::internal(format!("Failed to deserialize customer: {}", e))
            })?;
            customers.push(StoredCustomer::new(RecordHandle::from_uuid(handle), customer));
        }

        Ok(customers)
    }

    async fn insert(&self, customer: Customer) -> Result<StoredCustomer, DomainError> {
        self.ensure_table().await?;
        Self::insert_with(&self.pool, &self.table_name, customer).await
    }

    async fn replace(&self, customer: &Customer) -> Result<bool, DomainError> {
        self.ensure_table().await?;

        let data = serde_json::to_value(customer)
            .map_err(|e| DomainError::internal(format!("Failed to serialize customer: {}", e)))?;
        let query = format!(
            r#"
            UPDATE {table} SET data = $2
            WHERE handle = (
                SELECT handle FROM {table} WHERE data @> $1 ORDER BY seq LIMIT 1
            )
            "#,
            table = self.table_name
        );

        let result = sqlx::query(&query)
            .bind(containment(&CustomerFilter::by_id(customer.id)))
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update customer", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.ensure_table().await?;

        let query = format!(
            r#"
            DELETE FROM {table}
            WHERE handle = (
                SELECT handle FROM {table} WHERE data @> $1 ORDER BY seq LIMIT 1
            )
            "#,
            table = self.table_name
        );

        let result = sqlx::query(&query)
            .bind(containment(&CustomerFilter::by_id(id)))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete customer", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.ensure_table().await?;

        sqlx::query(&format!("DELETE FROM {}", self.table_name))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("clear customers", e))?;

        Ok(())
    }

    async fn reset(&self, seed: Vec<Customer>) -> Result<Vec<StoredCustomer>, DomainError> {
        self.ensure_table().await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin reset", e))?;

        sqlx::query(&format!("DELETE FROM {}", self.table_name))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("clear customers", e))?;

        let mut inserted = Vec::with_capacity(seed.len());

        for customer in seed {
            inserted.push(Self::insert_with(&mut *tx, &self.table_name, customer).await?);
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit reset", e))?;

        Ok(inserted)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;

        Ok(())
    }
}

/// JSONB containment document equivalent to an exact-match filter
fn containment(filter: &CustomerFilter) -> Value {
    let mut doc = Map::new();

    if let Some(id) = filter.id {
        doc.insert("id".to_string(), Value::from(id));
    }
    if let Some(name) = &filter.name {
        doc.insert("name".to_string(), Value::from(name.as_str()));
    }
    if let Some(email) = &filter.email {
        doc.insert("email".to_string(), Value::from(email.as_str()));
    }
    if let Some(password) = &filter.password {
        doc.insert("password".to_string(), Value::from(password.as_str()));
    }

    Value::Object(doc)
}

/// SQLSTATE classes raised while a connection is being established:
/// connection exceptions, rejected credentials, unknown database and
/// server shutdown.
const CONNECTION_SQLSTATE_PREFIXES: &[&str] = &["08", "28", "3D", "57P"];

fn is_connection_sqlstate(code: &str) -> bool {
    CONNECTION_SQLSTATE_PREFIXES
        .iter()
        .any(|prefix| code.starts_with(prefix))
}

fn map_sqlx_error(action: &str, err: sqlx::Error) -> DomainError {
    let unavailable = match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => db.code().is_some_and(|code| is_connection_sqlstate(&code)),
        _ => false,
    };

    if unavailable {
        DomainError::store_unavailable(format!("Failed to {}: {}", action, err))
    } else {
        DomainError::internal(format!("Failed to {}: {}", action, err))
    }
}

fn validate_table_name(name: &str) -> Result<(), DomainError> {
    let valid = !name.is_empty()
        && name.len() <= 63
        && name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(DomainError::configuration(format!(
            "Invalid table name '{}'",
            name
        )))
    }
}
