use crate::db::db_pool::DuckDBConnectionManager;
use crate::error::QueryError;
use r2d2::{Pool, PooledConnection};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

pub const DB_EXTENSION: &str = "duckdb";

/// One connection pool per database file under `data_dir`, created on first use.
pub struct MultiDbConnectionManager {
    data_dir: PathBuf,
    pool_size: u32,
    pools: Mutex<HashMap<String, Pool<DuckDBConnectionManager>>>,
}

impl MultiDbConnectionManager {
    pub fn new(data_dir: PathBuf, pool_size: u32) -> Self {
        Self {
            data_dir,
            pool_size: pool_size.max(1),
            pools: Mutex::new(HashMap::new()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn database_path(&self, database: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", database, DB_EXTENSION))
    }

    /// Checks out one connection to `database`.
    ///
    /// The connection goes back to the pool when the guard is dropped.
    pub fn connection(
        &self,
        database: &str,
    ) -> Result<PooledConnection<DuckDBConnectionManager>, QueryError> {
        let pool = self.pool(database)?;
        Ok(pool.get()?)
    }

    fn pool(&self, database: &str) -> Result<Pool<DuckDBConnectionManager>, QueryError> {
        validate_database_name(database)?;

        let mut pools = self.pools.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pool) = pools.get(database) {
            return Ok(pool.clone());
        }

        // Opening a missing file would create an empty database
        let db_path = self.database_path(database);
        if !db_path.is_file() {
            return Err(QueryError::DatabaseConnection(format!(
                "Unknown database '{}'",
                database
            )));
        }

        let manager = DuckDBConnectionManager::open(&db_path).map_err(|e| {
            QueryError::DatabaseConnection(format!("Failed to open {}: {}", db_path.display(), e))
        })?;
        let pool = Pool::builder()
            .max_size(self.pool_size)
            .min_idle(Some(0))
            .build(manager)?;

        info!("Opened connection pool for database '{}' at {}", database, db_path.display());
        pools.insert(database.to_string(), pool.clone());
        debug!("{} database pools open", pools.len());
        Ok(pool)
    }
}

/// Database names double as file stems, so only `[A-Za-z0-9_]` is accepted.
pub fn validate_database_name(database: &str) -> Result<(), QueryError> {
    if database.is_empty() {
        return Err(QueryError::Validation("Database name required".to_string()));
    }
    if !database.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(QueryError::Validation(format!(
            "Invalid database name '{}': only letters, digits and underscores are allowed",
            database
        )));
    }
    Ok(())
}
