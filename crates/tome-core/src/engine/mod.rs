//! # Command Engine
//!
//! One handler per command, all sharing a fixed precondition order.
//!
//! ## Handler Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tokens ──► 1. arity ──► 2. lexical ──► 3. privilege ──► 4. business    │
//! │                 │            │               │                │         │
//! │                 └────────────┴───────┬───────┴────────────────┘         │
//! │                                      ▼                                  │
//! │                      Err(CommandError)  → nothing changed, no audit     │
//! │                                                                         │
//! │  all checks pass ──► 5. mutation ──► Applied ──► audit entry appended   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers never mutate before step 5, so an early `?` return is always a
//! clean rejection. The audit entry is written by [`Bookstore::execute`],
//! not by the handlers, which makes "rejected ⇒ no log" structural.
//!
//! ## Submodules
//! - `account` - su, logout, register, passwd, useradd, delete
//! - `book` - show, buy, select, modify, import
//! - `finance` - show finance, report finance, report employee, log

mod account;
mod book;
mod finance;

use chrono::Utc;
use tracing::debug;

use crate::error::{CommandError, CommandResult};
use crate::selection::SelectionTable;
use crate::session::SessionStack;
use crate::store::{RecordStore, Snapshot};
use crate::types::{Account, LogEntry, Privilege};
use crate::{ROOT_PASSWORD, ROOT_USERNAME, ROOT_USER_ID};

// =============================================================================
// Verbs
// =============================================================================

/// A routable command, after the dispatcher has resolved two-token verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Su,
    Logout,
    Register,
    Passwd,
    Useradd,
    Delete,
    Show,
    ShowFinance,
    Buy,
    Select,
    Modify,
    Import,
    ReportFinance,
    ReportEmployee,
    Log,
}

impl Verb {
    /// Operation name used in the audit log.
    pub const fn name(self) -> &'static str {
        match self {
            Verb::Su => "su",
            Verb::Logout => "logout",
            Verb::Register => "register",
            Verb::Passwd => "passwd",
            Verb::Useradd => "useradd",
            Verb::Delete => "delete",
            Verb::Show => "show",
            Verb::ShowFinance => "show finance",
            Verb::Buy => "buy",
            Verb::Select => "select",
            Verb::Modify => "modify",
            Verb::Import => "import",
            Verb::ReportFinance => "report finance",
            Verb::ReportEmployee => "report employee",
            Verb::Log => "log",
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Output lines of an applied command. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    lines: Vec<String>,
}

impl Response {
    /// No output at all.
    pub fn none() -> Self {
        Response::default()
    }

    pub fn line(line: impl Into<String>) -> Self {
        Response {
            lines: vec![line.into()],
        }
    }

    /// A single empty line.
    pub fn blank() -> Self {
        Response::line("")
    }

    pub fn lines(lines: Vec<String>) -> Self {
        Response { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A handler's successful result: output plus what to write to the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Applied {
    response: Response,
    details: String,
}

impl Applied {
    pub(crate) fn new(response: Response, details: impl Into<String>) -> Self {
        Applied {
            response,
            details: details.into(),
        }
    }

    pub(crate) fn silent(details: impl Into<String>) -> Self {
        Applied::new(Response::none(), details)
    }
}

// =============================================================================
// Logout Policy
// =============================================================================

/// What `logout` does to the leaving identity's selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogoutPolicy {
    /// Keep the selection while another frame of the same identity remains
    /// on the stack; clear it once the last frame leaves.
    #[default]
    RetainWhileActive,

    /// Always clear the selection of the identity that logs out.
    ClearAlways,
}

// =============================================================================
// Bookstore
// =============================================================================

/// The whole process state: records, login stack and selections.
///
/// Built once at startup and threaded through the dispatcher; there is no
/// global instance.
#[derive(Debug, Clone)]
pub struct Bookstore {
    store: RecordStore,
    sessions: SessionStack,
    selections: SelectionTable,
    logout_policy: LogoutPolicy,
}

impl Bookstore {
    /// Wraps an existing record store with nobody logged in.
    pub fn new(store: RecordStore) -> Self {
        Bookstore {
            store,
            sessions: SessionStack::new(),
            selections: SelectionTable::new(),
            logout_policy: LogoutPolicy::default(),
        }
    }

    /// First-run state: an empty store holding only the root account.
    pub fn bootstrap() -> Self {
        let mut store = RecordStore::new();
        store.insert_account(Self::root_account());
        Bookstore::new(store)
    }

    /// The administrator account created on first run.
    pub fn root_account() -> Account {
        Account::new(ROOT_USER_ID, ROOT_PASSWORD, ROOT_USERNAME, Privilege::Admin)
    }

    pub fn with_logout_policy(mut self, policy: LogoutPolicy) -> Self {
        self.logout_policy = policy;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionStack {
        &self.sessions
    }

    pub fn selections(&self) -> &SelectionTable {
        &self.selections
    }

    /// Records to hand to the persistence layer.
    pub fn snapshot(&self) -> Snapshot {
        self.store.to_snapshot()
    }

    /// Runs one command and, if it applied, appends its audit entry.
    ///
    /// `tokens[0]` is the verb (for two-token verbs, `tokens[1]` is its
    /// second word).
    pub fn execute(&mut self, verb: Verb, tokens: &[String]) -> CommandResult<Response> {
        let outcome = match verb {
            Verb::Su => self.su(tokens),
            Verb::Logout => self.logout(tokens),
            Verb::Register => self.register(tokens),
            Verb::Passwd => self.passwd(tokens),
            Verb::Useradd => self.useradd(tokens),
            Verb::Delete => self.delete(tokens),
            Verb::Show => self.show(tokens),
            Verb::ShowFinance => self.show_finance(tokens),
            Verb::Buy => self.buy(tokens),
            Verb::Select => self.select(tokens),
            Verb::Modify => self.modify(tokens),
            Verb::Import => self.import(tokens),
            Verb::ReportFinance => self.report_finance(tokens),
            Verb::ReportEmployee => self.report_employee(tokens),
            Verb::Log => self.log(tokens),
        };

        match outcome {
            Ok(applied) => {
                self.store.push_log(LogEntry {
                    operation: verb.name().to_string(),
                    actor: self.sessions.current_identity().unwrap_or_default().to_string(),
                    details: applied.details,
                    recorded_at: Utc::now(),
                });
                Ok(applied.response)
            }
            Err(err) => {
                debug!(command = verb.name(), reason = %err, "Command rejected");
                Err(err)
            }
        }
    }

    // =========================================================================
    // Shared Checks
    // =========================================================================

    /// Privilege gate: the current frame must rank at least `required`.
    fn require(&self, required: Privilege) -> CommandResult<()> {
        let current = self.sessions.current_privilege();
        if current < required {
            return Err(CommandError::InsufficientPrivilege { required, current });
        }
        Ok(())
    }

    /// Identity of the current frame, for commands past the privilege gate.
    fn current_user(&self) -> CommandResult<&str> {
        self.sessions
            .current_identity()
            .ok_or(CommandError::InsufficientPrivilege {
                required: Privilege::Customer,
                current: Privilege::Guest,
            })
    }
}

/// Arity check: `tokens.len()` must lie in `min..=max`.
fn check_arity(
    command: &'static str,
    tokens: &[String],
    min: usize,
    max: usize,
) -> CommandResult<()> {
    let actual = tokens.len();
    if actual < min || actual > max {
        return Err(CommandError::Arity {
            command,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn tokens(line: &str) -> Vec<String> {
        crate::tokenizer::tokenize(line)
    }

    #[test]
    fn test_bootstrap_has_only_root() {
        let bookstore = Bookstore::bootstrap();
        let root = bookstore.store().account(ROOT_USER_ID).unwrap();
        assert_eq!(root.privilege, Privilege::Admin);
        assert_eq!(root.password, ROOT_PASSWORD);
        assert_eq!(bookstore.store().account_count(), 1);
        assert!(bookstore.sessions().is_empty());
    }

    #[test]
    fn test_applied_command_is_audited() {
        let mut bookstore = Bookstore::bootstrap();
        bookstore
            .execute(Verb::Su, &tokens("su root sjtu"))
            .unwrap();

        let entry = bookstore.store().logs().last().unwrap();
        assert_eq!(entry.operation, "su");
        assert_eq!(entry.actor, "root");
        assert_eq!(entry.details, "root");
    }

    #[test]
    fn test_rejected_command_is_not_audited() {
        let mut bookstore = Bookstore::bootstrap();
        let err = bookstore
            .execute(Verb::Su, &tokens("su root wrong"))
            .unwrap_err();
        assert_eq!(err, CommandError::AuthenticationFailed("root".to_string()));
        assert!(bookstore.store().logs().is_empty());
    }

    #[test]
    fn test_check_arity() {
        let t = tokens("buy 1 2");
        assert!(check_arity("buy", &t, 3, 3).is_ok());
        assert!(matches!(
            check_arity("buy", &t, 2, 2),
            Err(CommandError::Arity { actual: 3, .. })
        ));
    }

    #[test]
    fn test_verb_names() {
        assert_eq!(Verb::ShowFinance.name(), "show finance");
        assert_eq!(Verb::ReportEmployee.name(), "report employee");
    }
}
