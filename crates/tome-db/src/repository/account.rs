//! # Account Repository
//!
//! Persists [`Account`] records, keyed by user ID.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tome_core::{Account, Privilege};

/// One `accounts` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRecord {
    pub user_id: String,
    pub password: String,
    pub username: String,
    pub privilege: i64,
}

impl TryFrom<AccountRecord> for Account {
    type Error = DbError;

    fn try_from(row: AccountRecord) -> DbResult<Account> {
        let privilege = u8::try_from(row.privilege)
            .ok()
            .and_then(Privilege::from_rank)
            .ok_or_else(|| {
                DbError::corrupt("accounts", format!("privilege {} for {}", row.privilege, row.user_id))
            })?;

        Ok(Account::new(row.user_id, row.password, row.username, privilege))
    }
}

/// Repository for account rows.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// All accounts, ordered by user ID.
    pub async fn list(&self) -> DbResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRecord>(
            r#"
            SELECT user_id, password, username, privilege
            FROM accounts
            ORDER BY user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Account::try_from).collect()
    }

    /// Replaces every account row inside the caller's transaction.
    pub(crate) async fn replace_all(conn: &mut SqliteConnection, accounts: &[Account]) -> DbResult<()> {
        debug!(count = accounts.len(), "Writing accounts");

        sqlx::query("DELETE FROM accounts").execute(&mut *conn).await?;

        for account in accounts {
            sqlx::query(
                r#"
                INSERT INTO accounts (user_id, password, username, privilege)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&account.user_id)
            .bind(&account.password)
            .bind(&account.username)
            .bind(i64::from(account.privilege.rank()))
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}
