//! Ask a database a question in plain language and get rows back.
//!
//! The schema of the selected DuckDB database is rendered into a prompt, a
//! hosted model translates the question into SQL, and the cleaned-up statement
//! is executed with its rows returned as JSON.

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod llm;
pub mod service;
pub mod util;
pub mod web;
