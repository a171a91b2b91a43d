use crate::db::executor::QueryExecutor;
use crate::db::multi_db_pool::MultiDbConnectionManager;
use crate::db::schema_manager::SchemaManager;
use crate::db::{ResultRow, SchemaMap};
use crate::error::QueryError;
use crate::history::HistorySink;
use crate::llm::prompt::build_prompt;
use crate::llm::sanitize::sanitize;
use crate::llm::LlmManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A natural-language question aimed at one database.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub database: String,
}

#[derive(Debug, Serialize)]
pub struct QueryOutcome {
    /// The sanitized SQL that was executed
    pub query: String,
    pub results: Vec<ResultRow>,
    pub table_info: SchemaMap,
}

/// Question in, rows out: introspect, prompt, translate, sanitize, execute, record.
pub struct QueryService {
    schema_manager: SchemaManager,
    executor: QueryExecutor,
    llm_manager: LlmManager,
    history: Arc<dyn HistorySink>,
}

impl QueryService {
    pub fn new(
        conn_manager: Arc<MultiDbConnectionManager>,
        llm_manager: LlmManager,
        history: Arc<dyn HistorySink>,
    ) -> Self {
        Self {
            schema_manager: SchemaManager::new(Arc::clone(&conn_manager)),
            executor: QueryExecutor::new(conn_manager),
            llm_manager,
            history,
        }
    }

    pub async fn list_databases(&self) -> Result<Vec<String>, QueryError> {
        self.schema_manager.list_databases().await
    }

    pub async fn table_info(&self, database: &str) -> Result<SchemaMap, QueryError> {
        self.schema_manager.get_table_info(database).await
    }

    pub async fn run(&self, request: &TranslationRequest) -> Result<QueryOutcome, QueryError> {
        let TranslationRequest { query, database } = request;
        if database.is_empty() {
            warn!("Rejected query without a database: {}", query);
            return Err(QueryError::Validation("Database selection required".to_string()));
        }

        info!("Processing query '{}' against database '{}'", query, database);

        let table_info = self.schema_manager.get_table_info(database).await.inspect_err(|e| {
            error!("Schema lookup failed for database '{}' (query '{}'): {}", database, query, e)
        })?;

        let prompt = build_prompt(&table_info, query);
        debug!("Prepared LLM prompt: {}", prompt);

        let completion = self.llm_manager.translate(&prompt).await.map_err(|e| {
            error!("Translation failed for query '{}' on '{}': {}", query, database, e);
            QueryError::from(e)
        })?;

        let sql = sanitize(&completion).inspect_err(|_| {
            warn!("No SQL in completion for query '{}': {:?}", query, completion)
        })?;
        info!("Generated SQL: {}", sql);

        let results = self.executor.execute(sql.as_str(), database).await.inspect_err(|e| {
            error!("Query execution error on '{}' for query '{}' (SQL: {}): {}", database, query, sql, e)
        })?;

        self.history.record(query, sql.as_str(), database);

        Ok(QueryOutcome {
            query: sql.into_inner(),
            results,
            table_info,
        })
    }
}
