//! Database connection management.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, Statement};
use tracing::debug;

use crate::error::{Error, Result};
use crate::parser::ParsedRow;

/// Database open mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Create the data directory and database file if missing
    #[default]
    Create,
    /// Fail when the database file does not exist yet
    Existing,
}

/// Identity and secret given on the command line.
///
/// The identity names the database file. SQLite has no authentication
/// layer, so the secret is only carried along and never printed.
#[derive(Clone)]
pub struct Credentials {
    pub identity: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }

    /// Database file for this identity inside `data_dir`
    pub fn database_path(&self, data_dir: &Path) -> Result<PathBuf> {
        let valid = !self.identity.is_empty()
            && !self.identity.starts_with('.')
            && self
                .identity
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

        if !valid {
            return Err(Error::InvalidIdentity(self.identity.clone()));
        }

        Ok(data_dir.join(format!("{}.sqlite", self.identity)))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"***")
            .finish()
    }
}

/// Where and how to open the database.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub data_dir: PathBuf,
    pub mode: OpenMode,
}

/// The single connection all statements of a run go through.
pub struct Gateway {
    pub(crate) conn: Connection,
}

impl Gateway {
    /// Open the database named by `credentials`.
    pub fn connect(credentials: &Credentials, options: &ConnectOptions) -> Result<Self> {
        let path = credentials.database_path(&options.data_dir)?;

        let flags = match options.mode {
            OpenMode::Existing => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path));
                }
                OpenFlags::SQLITE_OPEN_READ_WRITE
            }
            OpenMode::Create => {
                std::fs::create_dir_all(&options.data_dir).map_err(|source| Error::DataDir {
                    path: options.data_dir.clone(),
                    source,
                })?;
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
            }
        };

        let conn = Connection::open_with_flags(&path, flags).map_err(|source| {
            Error::DatabaseOpen {
                path: path.clone(),
                source,
            }
        })?;

        // Enable foreign keys and use WAL for the on-disk database
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        debug!("Opened database at {} ({:?})", path.display(), options.mode);
        Ok(Self { conn })
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        debug!("Created in-memory database");
        Ok(Self { conn })
    }

    /// Execute a single statement, returning the number of changed rows
    pub fn execute(&self, sql: &str) -> Result<usize> {
        debug!(sql, "execute");
        Ok(self.conn.execute(sql, [])?)
    }

    /// Prepare a query; stepping its rows is the caller's cursor
    pub fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
        Ok(self.conn.prepare(sql)?)
    }

    /// Run a query and map every row
    pub fn query_rows<T>(
        &self,
        sql: &str,
        map: impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], map)?;
        Ok(rows.collect::<rusqlite::Result<Vec<T>>>()?)
    }

    /// Insert all rows with one prepared statement inside one transaction.
    ///
    /// Returns the number of rows actually inserted, which is lower than
    /// `rows.len()` when conflicting rows were ignored.
    pub fn insert_batch(&mut self, sql: &str, rows: &[ParsedRow]) -> Result<u64> {
        let tx = self.conn.transaction()?;
        let mut count: u64 = 0;

        {
            let mut stmt = tx.prepare_cached(sql)?;
            for row in rows {
                for (idx, value) in row.values.iter().enumerate() {
                    value.bind_to(idx + 1, &mut stmt)?;
                }
                count += stmt.raw_execute()? as u64;
            }
        }

        tx.commit()?;
        debug!(sql, rows = rows.len(), inserted = count, "insert batch");
        Ok(count)
    }

    /// Close the connection, reporting any error SQLite returns on close
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Sqlite(e))
    }

    /// Get raw connection (for advanced usage).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
