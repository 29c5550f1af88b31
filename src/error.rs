//! Error types for loading and reporting.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::RecordError;

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// What was being done to a schema object when a statement failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Drop,
    Create,
    Populate,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Drop => write!(f, "drop"),
            Action::Create => write!(f, "create"),
            Action::Populate => write!(f, "populate"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database file not found (when opening an existing database)
    #[error("Database not found at: {0}")]
    DatabaseNotFound(PathBuf),

    /// Identity cannot name a database file
    #[error("Invalid database identity: '{0}'")]
    InvalidIdentity(String),

    /// Could not create the data directory
    #[error("Failed to create data directory '{path}': {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file missing or unreadable
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input line that does not parse
    #[error("Malformed record at {}:{line}: {source}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: RecordError,
    },

    /// Constraint violation while loading rows
    #[error("Integrity violation in {object}: {source}")]
    Integrity {
        object: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// DDL or population statement failed for a schema object
    #[error("Failed to {action} {object}: {source}")]
    Object {
        object: &'static str,
        action: Action,
        #[source]
        source: rusqlite::Error,
    },

    /// Schema objects depend on each other in a loop
    #[error("Circular dependency detected at: {0}")]
    CircularDependency(&'static str),
}

impl Error {
    /// Wrap a statement failure for `object`, classifying constraint
    /// violations as integrity errors.
    pub(crate) fn for_object(object: &'static str, action: Action, err: Error) -> Error {
        match err {
            Error::Sqlite(source) if is_constraint_violation(&source) => {
                Error::Integrity { object, source }
            }
            Error::Sqlite(source) => Error::Object {
                object,
                action,
                source,
            },
            other => other,
        }
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
