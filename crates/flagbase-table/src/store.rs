use std::path::Path;
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::schema::all_schemas;

/// Tunables applied when opening an on-disk store.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { busy_timeout: Duration::from_millis(5_000) }
    }
}

/// The embedded relational store holding the `items` and `features` tables.
///
/// `Store` owns a single SQLite connection behind a mutex, so one
/// `Arc<Store>` can be shared by every request handler on both transports.
/// Each repository call runs exactly one statement while holding the lock,
/// which makes every operation atomic at the statement level.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens (or creates) a SQLite database at the given file path and
    /// creates any missing tables.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, options: &StoreOptions) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.busy_timeout(options.busy_timeout)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        debug!("Opened Store at {}", path.as_ref().display());
        Self::init(conn)
    }

    /// Opens an in-memory SQLite database (useful for testing).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        debug!("Opened in-memory Store");
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        for schema in all_schemas() {
            let sql = schema.create_sql();
            debug!("Schema SQL: {}", sql);
            conn.execute_batch(&sql)?;
        }
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Lists all user-created table names (excludes SQLite system tables).
    pub fn table_names(&self) -> Result<Vec<String>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(names)
        })
    }

    /// Runs `f` with exclusive access to the connection.
    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self.conn.lock();
        f(&conn)
    }
}
