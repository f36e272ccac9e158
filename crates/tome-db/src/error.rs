//! # Storage Errors
//!
//! Storage is only touched at startup and shutdown, so every `DbError` ends
//! the process: the console reports it and exits non-zero.
//!
//! ```text
//! sqlx::Error / MigrateError ──► DbError ──► AppError (console) ──► exit 1
//! row that no longer decodes ──► DbError::CorruptRow
//! ```

use thiserror::Error;

/// Why a snapshot could not be loaded or saved.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - A snapshot carries two accounts or books with the same key
    #[error("Duplicate {field}")]
    UniqueViolation { field: String },

    /// The database file could not be opened or created.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// An embedded migration did not apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row cannot be turned back into a record.
    ///
    /// ## When This Occurs
    /// - Unknown transaction direction
    /// - Privilege outside {1, 3, 7}
    #[error("Corrupt {table} row: {reason}")]
    CorruptRow { table: &'static str, reason: String },

    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Anything sqlx reports that has no more specific variant.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn corrupt(table: &'static str, reason: impl Into<String>) -> Self {
        DbError::CorruptRow {
            table,
            reason: reason.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → UniqueViolation or QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                match msg.split_once("UNIQUE constraint failed: ") {
                    Some((_, field)) => DbError::UniqueViolation {
                        field: field.to_string(),
                    },
                    None => DbError::QueryFailed(msg.to_string()),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_map() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_corrupt_message() {
        let err = DbError::corrupt("transactions", "direction 'refund'");
        assert_eq!(err.to_string(), "Corrupt transactions row: direction 'refund'");
    }
}
