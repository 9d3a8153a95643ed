//! PostgreSQL client
//!
//! Pooled connections with per-session statement timeouts. Schema
//! creation runs the bundled migration; the `(tenant_id, original_hash)`
//! uniqueness constraint it creates is required by the vault's
//! conflict-safe insert.

use crate::config::DatabaseConfig;
use crate::domain::{Result, SignalveilError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

/// PostgreSQL client for Signalveil stores
pub struct PostgresClient {
    pool: Pool,
    config: DatabaseConfig,
}

impl PostgresClient {
    /// Create a new client with a connection pool
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for an unparseable connection string
    /// or a `Database` error if the pool cannot be built.
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config = config.connection_string.parse().map_err(|e| {
            SignalveilError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
        })?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .create_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .recycle_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .build()
            .map_err(|e| {
                SignalveilError::Database(format!("Failed to create connection pool: {e}"))
            })?;

        Ok(Self { pool, config })
    }

    /// Test the connection with a trivial query
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| SignalveilError::Database(format!("Connection test failed: {e}")))?;

        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Apply the bundled schema migration (idempotent)
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.connection().await?;

        let migration_sql = include_str!("../../../migrations/001_initial_schema.sql");

        client
            .batch_execute(migration_sql)
            .await
            .map_err(|e| SignalveilError::Database(format!("Failed to execute migration: {e}")))?;

        tracing::info!("PostgreSQL schema initialized");
        Ok(())
    }

    /// Get a pooled connection with the statement timeout applied
    pub(crate) async fn connection(&self) -> Result<deadpool_postgres::Object> {
        let client = self.pool.get().await.map_err(|e| {
            SignalveilError::Database(format!("Failed to get connection from pool: {e}"))
        })?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client
            .batch_execute(&timeout_query)
            .await
            .map_err(|e| {
                SignalveilError::Database(format!("Failed to set statement timeout: {e}"))
            })?;

        Ok(client)
    }

    /// Execute a query and return rows
    pub(crate) async fn query(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let client = self.connection().await?;
        client
            .query(query, params)
            .await
            .map_err(|e| SignalveilError::Database(format!("Query failed: {e}")))
    }

    /// Execute a query expecting zero or one row
    pub(crate) async fn query_opt(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Option<Row>> {
        let client = self.connection().await?;
        client
            .query_opt(query, params)
            .await
            .map_err(|e| SignalveilError::Database(format!("Query failed: {e}")))
    }

    /// Execute a query expecting exactly one row
    pub(crate) async fn query_one(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Row> {
        let client = self.connection().await?;
        client
            .query_one(query, params)
            .await
            .map_err(|e| SignalveilError::Database(format!("Query failed: {e}")))
    }

    /// Execute a statement and return the affected row count
    pub(crate) async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<u64> {
        let client = self.connection().await?;
        client
            .execute(statement, params)
            .await
            .map_err(|e| SignalveilError::Database(format!("Statement failed: {e}")))
    }
}
