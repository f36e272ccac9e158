//! # Application Error Type
//!
//! Everything that can stop the console. Rejected commands are not errors
//! at this level; they are answered with `Invalid` and the loop continues.
//!
//! ```text
//! DbError ─────┬──► AppError ──┐
//! io::Error ───┘               ├──► main (anyhow) ──► exit status 1
//! ConfigError ─────────────────┘
//! ```
//!
//! Configuration is read before anything is opened, so `main` reports a
//! `ConfigError` directly.

use thiserror::Error;
use tome_db::DbError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Database(#[from] DbError),

    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_layer() {
        let db = AppError::from(DbError::PoolExhausted);
        assert_eq!(db.to_string(), "Storage error: Connection pool exhausted");

        let io = AppError::from(std::io::Error::other("stdin closed"));
        assert_eq!(io.to_string(), "Console I/O error: stdin closed");
    }
}
