use crate::db::multi_db_pool::{validate_database_name, MultiDbConnectionManager, DB_EXTENSION};
use crate::db::SchemaMap;
use crate::error::QueryError;
use duckdb::Connection;
use std::sync::Arc;
use tracing::{debug, info, warn};

const TABLES_QUERY: &str = "SELECT table_name FROM information_schema.tables \
     WHERE table_schema = 'main' ORDER BY table_name";

const COLUMNS_QUERY: &str = "SELECT column_name FROM information_schema.columns \
     WHERE table_schema = 'main' AND table_name = ? ORDER BY ordinal_position";

/// Reads database and table metadata. Nothing is cached; every call hits the files.
pub struct SchemaManager {
    conn_manager: Arc<MultiDbConnectionManager>,
}

impl SchemaManager {
    pub fn new(conn_manager: Arc<MultiDbConnectionManager>) -> Self {
        Self { conn_manager }
    }

    /// Names of every `<name>.duckdb` file in the data directory, sorted.
    ///
    /// Stems that are not valid database names are skipped.
    pub async fn list_databases(&self) -> Result<Vec<String>, QueryError> {
        let data_dir = self.conn_manager.data_dir().to_path_buf();

        let mut databases = Vec::new();
        let mut entries = tokio::fs::read_dir(&data_dir).await.map_err(|e| {
            QueryError::Database(format!("Failed to read {}: {}", data_dir.display(), e))
        })?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| QueryError::Database(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DB_EXTENSION) {
                continue;
            }
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| QueryError::Database(e.to_string()))?;
            if !file_type.is_file() {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Err(e) = validate_database_name(name) {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
            databases.push(name.to_string());
        }

        databases.sort();
        info!("Available databases: {:?}", databases);
        Ok(databases)
    }

    /// Tables of `database` mapped to their columns in ordinal order.
    pub async fn get_table_info(&self, database: &str) -> Result<SchemaMap, QueryError> {
        let conn_manager = Arc::clone(&self.conn_manager);
        let database = database.to_string();

        tokio::task::spawn_blocking(move || -> Result<SchemaMap, QueryError> {
            let conn = conn_manager.connection(&database)?;
            let schema = read_schema(&conn)
                .map_err(|e| QueryError::Database(format!("{}: {}", database, e)))?;
            debug!("Found {} tables in database {}", schema.len(), database);
            Ok(schema)
        })
        .await?
    }
}

fn read_schema(conn: &Connection) -> Result<SchemaMap, duckdb::Error> {
    let mut tables_stmt = conn.prepare(TABLES_QUERY)?;
    let tables = tables_stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns_stmt = conn.prepare(COLUMNS_QUERY)?;
    let mut schema = SchemaMap::new();
    for table in tables {
        let columns = columns_stmt
            .query_map([&table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        schema.insert(table, columns);
    }

    Ok(schema)
}
