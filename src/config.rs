use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Directory holding one `<name>.duckdb` file per database
    pub data_dir: String,
    pub pool_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    /// CORS origins; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub backend: String, // "remote" or "ollama"
    pub model: String,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub llm: LlmConfig,
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory containing the DuckDB database files
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

const ENV_PREFIX: &str = "NLQ";

impl AppConfig {
    pub fn new(args: &CliArgs) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();
        let mut config_builder = Config::builder()
            .set_default("database.data_dir", defaults.database.data_dir)?
            .set_default("database.pool_size", defaults.database.pool_size)?
            .set_default("web.host", defaults.web.host)?
            .set_default("web.port", defaults.web.port)?
            .set_default("web.allowed_origins", Vec::<String>::new())?
            .set_default("llm.backend", defaults.llm.backend)?
            .set_default("llm.model", defaults.llm.model)?
            .set_default("llm.api_url", defaults.llm.api_url)?
            .set_default("llm.temperature", defaults.llm.temperature as f64)?
            .set_default("llm.max_tokens", defaults.llm.max_tokens)?
            .set_default("llm.timeout_secs", defaults.llm.timeout_secs)?;

        // Add configuration from file if specified
        if let Some(config_path) = &args.config {
            config_builder = config_builder.add_source(File::from(config_path.as_path()));
        } else {
            // Check for config in default locations
            let default_locations = vec![
                "config.toml",
                "config/config.toml",
                "/etc/nl-query/config.toml",
            ];

            for location in default_locations {
                if Path::new(location).exists() {
                    config_builder =
                        config_builder.add_source(File::new(location, config::FileFormat::Toml));
                    break;
                }
            }
        }

        // NLQ_LLM__API_KEY, NLQ_WEB__PORT, ...
        config_builder = config_builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let mut config: AppConfig = config_builder.build()?.try_deserialize()?;

        // Override with command line args if provided
        if let Some(host) = &args.host {
            config.web.host = host.clone();
        }
        if let Some(port) = args.port {
            config.web.port = port;
        }
        if let Some(data_dir) = &args.data_dir {
            config.database.data_dir = data_dir.clone();
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                data_dir: "data".to_string(),
                pool_size: 4,
            },
            web: WebConfig {
                host: "127.0.0.1".to_string(),
                port: 5001,
                allowed_origins: Vec::new(),
            },
            llm: LlmConfig {
                backend: "remote".to_string(),
                model: "llama-3.3-70b-versatile".to_string(),
                api_key: None,
                api_url: Some("https://api.groq.com/openai/v1/chat/completions".to_string()),
                temperature: 0.5,
                max_tokens: 512,
                timeout_secs: 60,
            },
        }
    }
}
