use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default, Clone, Copy)]
struct QueryStats {
    count: u64,
    total: Duration,
}

/// Timing summary for one distinct question.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryTiming {
    pub query: String,
    pub avg_time_ms: f64,
    pub count: u64,
}

/// Per-question response times of answered queries, kept for the process lifetime.
#[derive(Debug, Default)]
pub struct QueryAnalytics {
    queries: Mutex<HashMap<String, QueryStats>>,
}

impl QueryAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, query: &str, elapsed: Duration) {
        let mut queries = self.queries.lock().unwrap_or_else(|e| e.into_inner());
        let stats = queries.entry(query.to_string()).or_default();
        stats.count += 1;
        stats.total += elapsed;
    }

    /// Averages per question, sorted by question text.
    pub fn snapshot(&self) -> Vec<QueryTiming> {
        let queries = self.queries.lock().unwrap_or_else(|e| e.into_inner());
        let mut timings: Vec<QueryTiming> = queries
            .iter()
            .map(|(query, stats)| QueryTiming {
                query: query.clone(),
                avg_time_ms: stats.total.as_secs_f64() * 1000.0 / stats.count as f64,
                count: stats.count,
            })
            .collect();
        timings.sort_by(|a, b| a.query.cmp(&b.query));
        timings
    }
}
