use rusqlite::ErrorCode;
use rusqlite::ffi;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

/// Store failures, with constraint violations split out so callers can map
/// them to client errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// UNIQUE or PRIMARY KEY constraint.
    #[error("Duplicate record: {0}")]
    Conflict(String),

    /// FOREIGN KEY constraint: the referenced row does not exist.
    #[error("Referenced record missing: {0}")]
    ForeignKey(String),

    #[error("DB lock poisoned")]
    LockPoisoned,

    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, ref msg) = err {
            if failure.code == ErrorCode::ConstraintViolation {
                let detail = msg.clone().unwrap_or_else(|| failure.to_string());
                match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        return Self::Conflict(detail);
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return Self::ForeignKey(detail),
                    _ => {}
                }
            }
        }
        Self::Sqlite(err)
    }
}
