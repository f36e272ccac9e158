//! Startup load / first-run bootstrap, and the shutdown flush.

use tracing::info;

use tome_core::{Bookstore, Dispatcher, RecordStore};
use tome_db::Database;

use crate::config::ConsoleConfig;
use crate::error::AppResult;

/// Builds the in-memory state from storage.
///
/// On the very first run the database is seeded with the root account and
/// marked initialized; afterwards the stored records are loaded as-is.
pub async fn open_bookstore(db: &Database, config: &ConsoleConfig) -> AppResult<Bookstore> {
    let bookstore = if db.is_initialized().await? {
        let snapshot = db.load_snapshot(config.persist_audit_log).await?;
        Bookstore::new(RecordStore::from_snapshot(snapshot))
    } else {
        info!("First run, creating root account");
        let bookstore = Bookstore::bootstrap();
        db.save_snapshot(&bookstore.snapshot(), config.persist_audit_log)
            .await?;
        db.mark_initialized().await?;
        bookstore
    };

    Ok(bookstore.with_logout_policy(config.logout_policy()))
}

/// Writes every record back to storage.
pub async fn flush(db: &Database, dispatcher: &Dispatcher, config: &ConsoleConfig) -> AppResult<()> {
    db.save_snapshot(&dispatcher.snapshot(), config.persist_audit_log)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_core::{Reply, ROOT_USER_ID};
    use tome_db::DbConfig;

    async fn memory_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_run_bootstraps_root() {
        let db = memory_db().await;
        let bookstore = open_bookstore(&db, &ConsoleConfig::default()).await.unwrap();

        assert!(bookstore.store().account(ROOT_USER_ID).is_some());
        assert!(db.is_initialized().await.unwrap());
        assert_eq!(db.accounts().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_restart_reloads_records() {
        let db = memory_db().await;
        let config = ConsoleConfig::default();

        let mut dispatcher = Dispatcher::new(open_bookstore(&db, &config).await.unwrap());
        for line in ["su root sjtu", "register bob pw Bob", "select 9", "import 4 8"] {
            assert!(matches!(dispatcher.dispatch(line), Reply::Applied(_)));
        }
        flush(&db, &dispatcher, &config).await.unwrap();

        let reopened = open_bookstore(&db, &config).await.unwrap();
        assert!(reopened.store().account("bob").is_some());
        assert_eq!(reopened.store().book("9").unwrap().quantity, 4);
        assert_eq!(reopened.store().transactions().len(), 1);
        // Sessions are never persisted and the log is off by default.
        assert!(reopened.sessions().is_empty());
        assert!(reopened.store().logs().is_empty());
    }

    #[tokio::test]
    async fn test_audit_log_survives_when_enabled() {
        let db = memory_db().await;
        let config = ConsoleConfig {
            persist_audit_log: true,
            ..ConsoleConfig::default()
        };

        let mut dispatcher = Dispatcher::new(open_bookstore(&db, &config).await.unwrap());
        assert!(matches!(dispatcher.dispatch("su root sjtu"), Reply::Applied(_)));
        flush(&db, &dispatcher, &config).await.unwrap();

        let reopened = open_bookstore(&db, &config).await.unwrap();
        assert_eq!(reopened.store().logs().len(), 1);
        assert_eq!(reopened.store().logs()[0].actor, "root");
    }
}
