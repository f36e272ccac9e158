//! # Report Formatting
//!
//! Turns records into output lines. Nothing here decides *whether* a command
//! may run; handlers call these after every check has passed.
//!
//! ## Formats
//! ```text
//! show row        978-0\tDune\tHerbert\tsf|classic\t12.50\t3
//! show finance    + 25.00 - 10.00
//! report finance  === Financial Report ===
//!                 Total Transactions: 2
//!                 Total Income: 25.00
//!                 Total Expense: 10.00
//!                 Net Profit: 15.00
//! ```

use std::collections::BTreeMap;

use crate::money::Money;
use crate::types::{Book, Direction, LogEntry, Transaction};

/// Income and expense over a run of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinanceTotals {
    pub income: Money,
    pub expense: Money,
}

impl FinanceTotals {
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(FinanceTotals::default(), |mut totals, t| {
                match t.direction {
                    Direction::Income => totals.income = totals.income + t.amount,
                    Direction::Expense => totals.expense = totals.expense + t.amount,
                }
                totals
            })
    }

    /// Income minus expense.
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// One tab-separated `show` row.
pub fn book_row(book: &Book) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        book.isbn, book.name, book.author, book.keywords, book.price, book.quantity
    )
}

/// The `show finance` line.
pub fn finance_line(totals: &FinanceTotals) -> String {
    format!("+ {} - {}", totals.income, totals.expense)
}

/// The `report finance` block.
pub fn finance_report(transactions: &[Transaction]) -> Vec<String> {
    let totals = FinanceTotals::from_transactions(transactions);
    vec![
        "=== Financial Report ===".to_string(),
        format!("Total Transactions: {}", transactions.len()),
        format!("Total Income: {}", totals.income),
        format!("Total Expense: {}", totals.expense),
        format!("Net Profit: {}", totals.net()),
    ]
}

/// The `report employee` block: audit entries per acting identity.
///
/// Entries written while nobody was logged in are not attributed to anyone.
pub fn employee_report(logs: &[LogEntry]) -> Vec<String> {
    let mut per_user: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in logs.iter().filter(|e| !e.actor.is_empty()) {
        *per_user.entry(entry.actor.as_str()).or_default() += 1;
    }

    std::iter::once("=== Employee Work Report ===".to_string())
        .chain(
            per_user
                .into_iter()
                .map(|(user, count)| format!("User: {user}, Operations: {count}")),
        )
        .collect()
}

/// The `log` block.
pub fn log_dump(logs: &[LogEntry]) -> Vec<String> {
    std::iter::once("=== System Log ===".to_string())
        .chain(logs.iter().map(|entry| {
            if entry.details.is_empty() {
                format!("[{}] {}", entry.actor, entry.operation)
            } else {
                format!("[{}] {} ({})", entry.actor, entry.operation, entry.details)
            }
        }))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(actor: &str, operation: &str, details: &str) -> LogEntry {
        LogEntry {
            operation: operation.to_string(),
            actor: actor.to_string(),
            details: details.to_string(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_book_row() {
        let book = Book {
            isbn: "978-0".to_string(),
            name: "Dune".to_string(),
            author: "Herbert".to_string(),
            keywords: "sf|classic".to_string(),
            price: Money::from_cents(1250),
            quantity: 3,
        };
        assert_eq!(book_row(&book), "978-0\tDune\tHerbert\tsf|classic\t12.50\t3");
        assert_eq!(book_row(&Book::blank("1")), "1\t\t\t\t0.00\t0");
    }

    #[test]
    fn test_finance_totals() {
        let transactions = [
            Transaction::income(Money::from_cents(2500)),
            Transaction::expense(Money::from_cents(1000)),
            Transaction::income(Money::from_cents(100)),
        ];
        let totals = FinanceTotals::from_transactions(&transactions);
        assert_eq!(finance_line(&totals), "+ 26.00 - 10.00");
        assert_eq!(totals.net().cents(), 1600);
    }

    #[test]
    fn test_totals_of_largest_purchases_are_exact() {
        let largest = Money::from_cents(9_999_999_998_999_000_000_000_100);
        let transactions = [
            Transaction::income(largest),
            Transaction::income(largest),
            Transaction::expense(Money::from_cents(1)),
        ];
        let totals = FinanceTotals::from_transactions(&transactions);

        assert_eq!(
            finance_line(&totals),
            "+ 199999999979980000000002.00 - 0.01"
        );
        assert_eq!(totals.net().to_string(), "199999999979980000000001.99");
    }

    #[test]
    fn test_finance_report() {
        let transactions = [Transaction::expense(Money::from_cents(4000))];
        assert_eq!(
            finance_report(&transactions),
            [
                "=== Financial Report ===",
                "Total Transactions: 1",
                "Total Income: 0.00",
                "Total Expense: 40.00",
                "Net Profit: -40.00",
            ]
        );
    }

    #[test]
    fn test_employee_report_skips_guests() {
        let logs = [
            entry("", "register", "bob"),
            entry("root", "su", "root"),
            entry("alice", "select", "1"),
            entry("root", "log", ""),
        ];
        assert_eq!(
            employee_report(&logs),
            [
                "=== Employee Work Report ===",
                "User: alice, Operations: 1",
                "User: root, Operations: 2",
            ]
        );
    }

    #[test]
    fn test_log_dump() {
        let logs = [entry("root", "buy", "978 2"), entry("root", "show", "")];
        assert_eq!(
            log_dump(&logs),
            ["=== System Log ===", "[root] buy (978 2)", "[root] show"]
        );
    }
}
