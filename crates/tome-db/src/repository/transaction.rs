//! # Transaction Repository
//!
//! Persists the append-only financial history. Row order is `seq` order, which
//! is the order the transactions were recorded in.
//!
//! Amounts are written as decimal text of the cent value, since a single
//! purchase can exceed what an SQLite INTEGER holds.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tome_core::{Direction, Money, Transaction};

/// One `transactions` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionRecord {
    pub seq: i64,
    pub amount_cents: String,
    pub direction: String,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = DbError;

    fn try_from(row: TransactionRecord) -> DbResult<Transaction> {
        let direction = Direction::parse(&row.direction).ok_or_else(|| {
            DbError::corrupt("transactions", format!("direction '{}' at seq {}", row.direction, row.seq))
        })?;

        let cents = row
            .amount_cents
            .parse::<i128>()
            .ok()
            .filter(|cents| *cents >= 0)
            .ok_or_else(|| {
                DbError::corrupt("transactions", format!("amount '{}' at seq {}", row.amount_cents, row.seq))
            })?;

        Ok(Transaction {
            amount: Money::from_cents(cents),
            direction,
        })
    }
}

/// Repository for transaction rows.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// The full history in append order.
    pub async fn list(&self) -> DbResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT seq, amount_cents, direction
            FROM transactions
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    /// Rewrites the history inside the caller's transaction, preserving order.
    pub(crate) async fn replace_all(
        conn: &mut SqliteConnection,
        transactions: &[Transaction],
    ) -> DbResult<()> {
        debug!(count = transactions.len(), "Writing transactions");

        sqlx::query("DELETE FROM transactions").execute(&mut *conn).await?;

        for (seq, transaction) in (1_i64..).zip(transactions) {
            sqlx::query(
                r#"
                INSERT INTO transactions (seq, amount_cents, direction)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(seq)
            .bind(transaction.amount.cents().to_string())
            .bind(transaction.direction.as_str())
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}
