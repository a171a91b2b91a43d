use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;
use tracing::info;

/// One successful question-to-SQL translation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRecord {
    pub query: String,
    pub sql: String,
    pub database: String,
    pub timestamp: DateTime<Utc>,
}

/// Destination for completed queries. The service only ever writes to it.
pub trait HistorySink: Send + Sync {
    fn record(&self, query: &str, sql: &str, database: &str);
}

/// Unbounded, process-lifetime history kept in memory.
#[derive(Default)]
pub struct InMemoryHistory {
    records: Mutex<Vec<QueryRecord>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<QueryRecord> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<QueryRecord>> {
        // Appends never leave the list half-written
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HistorySink for InMemoryHistory {
    fn record(&self, query: &str, sql: &str, database: &str) {
        info!("Recording query: {}", query);
        self.lock().push(QueryRecord {
            query: query.to_string(),
            sql: sql.to_string(),
            database: database.to_string(),
            timestamp: Utc::now(),
        });
    }
}
