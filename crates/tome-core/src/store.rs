//! # Record Store
//!
//! In-memory repositories for the four kinds of record.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  accounts      BTreeMap<user_id, Account>    unique key                 │
//! │  books         BTreeMap<isbn, Book>          unique key, ISBN order     │
//! │  transactions  Vec<Transaction>              append-only                │
//! │  logs          Vec<LogEntry>                 append-only                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Books are kept in a `BTreeMap` so iteration is already in ascending ISBN
//! order, which is the order `show` prints.
//!
//! ## Snapshot
//! Persistence is wholesale: [`RecordStore::from_snapshot`] at startup,
//! [`RecordStore::to_snapshot`] at shutdown. The storage crate never sees the
//! maps themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Account, Book, LogEntry, Transaction};

/// Everything that crosses the persistence boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    pub books: Vec<Book>,
    /// In append order.
    pub transactions: Vec<Transaction>,
    /// In append order. Empty when the audit log is not persisted.
    pub logs: Vec<LogEntry>,
}

/// Keyed and append-only record repositories.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    accounts: BTreeMap<String, Account>,
    books: BTreeMap<String, Book>,
    transactions: Vec<Transaction>,
    logs: Vec<LogEntry>,
}

impl RecordStore {
    pub fn new() -> Self {
        RecordStore::default()
    }

    /// Rebuilds the store from persisted records.
    ///
    /// A later record with a duplicate key replaces an earlier one, so the
    /// key uniqueness invariant holds even for a damaged snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        RecordStore {
            accounts: snapshot
                .accounts
                .into_iter()
                .map(|account| (account.user_id.clone(), account))
                .collect(),
            books: snapshot
                .books
                .into_iter()
                .map(|book| (book.isbn.clone(), book))
                .collect(),
            transactions: snapshot.transactions,
            logs: snapshot.logs,
        }
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            accounts: self.accounts.values().cloned().collect(),
            books: self.books.values().cloned().collect(),
            transactions: self.transactions.clone(),
            logs: self.logs.clone(),
        }
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    pub fn account(&self, user_id: &str) -> Option<&Account> {
        self.accounts.get(user_id)
    }

    pub fn account_mut(&mut self, user_id: &str) -> Option<&mut Account> {
        self.accounts.get_mut(user_id)
    }

    pub fn contains_account(&self, user_id: &str) -> bool {
        self.accounts.contains_key(user_id)
    }

    /// Inserts or replaces an account under its own identity.
    pub fn insert_account(&mut self, account: Account) {
        self.accounts.insert(account.user_id.clone(), account);
    }

    pub fn remove_account(&mut self, user_id: &str) -> Option<Account> {
        self.accounts.remove(user_id)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    // =========================================================================
    // Books
    // =========================================================================

    pub fn book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub fn book_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    pub fn contains_book(&self, isbn: &str) -> bool {
        self.books.contains_key(isbn)
    }

    /// Inserts or replaces a book under its own ISBN.
    pub fn insert_book(&mut self, book: Book) {
        self.books.insert(book.isbn.clone(), book);
    }

    pub fn remove_book(&mut self, isbn: &str) -> Option<Book> {
        self.books.remove(isbn)
    }

    /// All books in ascending ISBN order.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    // =========================================================================
    // Append-only Sequences
    // =========================================================================

    pub fn push_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn push_log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
