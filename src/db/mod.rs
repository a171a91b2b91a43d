pub mod db_pool;
pub mod executor;
pub mod multi_db_pool;
pub mod schema_manager;

use std::collections::BTreeMap;

/// Table name to column names, tables sorted by name, columns in ordinal order.
pub type SchemaMap = BTreeMap<String, Vec<String>>;

/// One result row: column name to value, in result-set column order.
pub type ResultRow = serde_json::Map<String, serde_json::Value>;
