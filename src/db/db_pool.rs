use duckdb::Connection;
use r2d2::ManageConnection;
use std::path::Path;
use std::sync::Mutex;

/// Hands out connections to a single DuckDB file.
///
/// DuckDB locks a file per database instance, so every pooled connection is a
/// clone of one instance opened up front rather than a fresh `open`.
pub struct DuckDBConnectionManager {
    instance: Mutex<Connection>,
}

impl DuckDBConnectionManager {
    pub fn open(path: &Path) -> Result<Self, duckdb::Error> {
        let instance = Connection::open(path)?;
        Ok(Self {
            instance: Mutex::new(instance),
        })
    }
}

impl ManageConnection for DuckDBConnectionManager {
    type Connection = Connection;
    type Error = duckdb::Error;

    fn connect(&self) -> Result<Self::Connection, Self::Error> {
        // A poisoned lock still guards a usable connection
        let instance = self.instance.lock().unwrap_or_else(|e| e.into_inner());
        instance.try_clone()
    }

    fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        conn.execute("SELECT 1", [])?;
        Ok(())
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}
