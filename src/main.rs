use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use nl_query::config::{AppConfig, CliArgs};
use nl_query::history::InMemoryHistory;
use nl_query::llm::LlmManager;
use nl_query::util::logging::init_tracing;
use nl_query::web::{self, state::AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = CliArgs::parse();

    if let Err(e) = init_tracing(args.debug, args.log_json, args.log_file.as_deref()) {
        eprintln!("Failed to open log file: {}", e);
        return Err(e.into());
    }

    // Load configuration
    let config = match AppConfig::new(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Ensure data directory exists
    let data_dir = PathBuf::from(&config.database.data_dir);
    if !data_dir.exists() {
        info!("Creating data directory: {}", config.database.data_dir);
        std::fs::create_dir_all(&data_dir)?;
    }

    info!("Initializing LLM manager with backend: {}", config.llm.backend);
    let llm_manager = match LlmManager::new(&config.llm) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Failed to initialize LLM backend: {}", e);
            return Err(e.into());
        }
    };

    let history = Arc::new(InMemoryHistory::new());
    let app_state = Arc::new(AppState::new(config.clone(), llm_manager, history));

    info!("Starting nl-query server on {}:{}", config.web.host, config.web.port);
    match web::run_server(config.web, app_state).await {
        Ok(_) => info!("Server stopped gracefully"),
        Err(e) => {
            error!("Server error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
