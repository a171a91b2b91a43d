use crate::db::multi_db_pool::MultiDbConnectionManager;
use crate::db::ResultRow;
use crate::error::QueryError;
use arrow::json::writer::{JsonArray, WriterBuilder};
use arrow::record_batch::RecordBatch;
use duckdb::Connection;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Runs generated SQL and materializes the full result in memory.
pub struct QueryExecutor {
    conn_manager: Arc<MultiDbConnectionManager>,
}

impl QueryExecutor {
    pub fn new(conn_manager: Arc<MultiDbConnectionManager>) -> Self {
        Self { conn_manager }
    }

    pub async fn execute(&self, sql: &str, database: &str) -> Result<Vec<ResultRow>, QueryError> {
        let conn_manager = Arc::clone(&self.conn_manager);
        let database = database.to_string();
        let sql = sql.to_string();

        tokio::task::spawn_blocking(move || -> Result<Vec<ResultRow>, QueryError> {
            let start_time = Instant::now();
            let conn = conn_manager.connection(&database)?;
            let rows = run_statement(&conn, &sql)?;

            info!(
                "Query executed successfully on {}. Row count: {}, Execution time: {}ms",
                database,
                rows.len(),
                start_time.elapsed().as_millis()
            );
            Ok(rows)
        })
        .await?
    }
}

fn run_statement(conn: &Connection, sql: &str) -> Result<Vec<ResultRow>, QueryError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| QueryError::QueryExecution(e.to_string()))?;
    let arrow_batch = stmt
        .query_arrow([])
        .map_err(|e| QueryError::QueryExecution(e.to_string()))?;

    let record_batches = arrow_batch.collect::<Vec<_>>();
    rows_from_batches(&record_batches)
}

/// Converts Arrow batches to JSON objects, one per row, keyed in schema order.
fn rows_from_batches(record_batches: &[RecordBatch]) -> Result<Vec<ResultRow>, QueryError> {
    let non_empty: Vec<&RecordBatch> = record_batches.iter().filter(|b| b.num_rows() > 0).collect();
    if non_empty.is_empty() {
        return Ok(Vec::new());
    }

    let serialize_err = |e: arrow::error::ArrowError| {
        QueryError::QueryExecution(format!("Failed to serialize query results: {}", e))
    };

    let mut writer = WriterBuilder::new()
        .with_explicit_nulls(true)
        .build::<_, JsonArray>(Vec::new());
    writer.write_batches(&non_empty).map_err(serialize_err)?;
    writer.finish().map_err(serialize_err)?;

    serde_json::from_slice(&writer.into_inner())
        .map_err(|e| QueryError::QueryExecution(format!("Failed to decode query results: {}", e)))
}
