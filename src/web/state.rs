use crate::analytics::QueryAnalytics;
use crate::config::AppConfig;
use crate::db::multi_db_pool::MultiDbConnectionManager;
use crate::history::HistorySink;
use crate::llm::LlmManager;
use crate::service::QueryService;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state for the web server
pub struct AppState {
    pub config: AppConfig,
    pub query_service: QueryService,
    pub analytics: QueryAnalytics,
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, llm_manager: LlmManager, history: Arc<dyn HistorySink>) -> Self {
        let conn_manager = Arc::new(MultiDbConnectionManager::new(
            PathBuf::from(&config.database.data_dir),
            config.database.pool_size,
        ));

        Self {
            query_service: QueryService::new(conn_manager, llm_manager, history),
            analytics: QueryAnalytics::new(),
            config,
            startup_time: chrono::Utc::now(),
        }
    }
}
