//! # Dispatcher
//!
//! Line-level front door: tokenizes, resolves the verb, runs the engine and
//! folds the outcome into a [`Reply`] the console can print.
//!
//! ## Verb Resolution
//! ```text
//! (blank)                  → Ignored
//! quit | exit ...         → Quit            (trailing tokens ignored)
//! show finance ...         → ShowFinance
//! show ...                 → Show
//! report finance           → ReportFinance
//! report employee          → ReportEmployee
//! su logout register ...   → the one-word verbs
//! anything else            → Rejected(UnknownCommand)
//! ```

use tracing::debug;

use crate::engine::{Bookstore, Response, Verb};
use crate::error::{CommandError, CommandResult};
use crate::store::Snapshot;
use crate::tokenizer::tokenize;

/// What the console should do with one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Blank line: no output, no state change.
    Ignored,

    /// The command ran; print its lines (possibly none).
    Applied(Response),

    /// The command was refused; print the rejection marker.
    Rejected(CommandError),

    /// `quit` / `exit`: persist and stop reading.
    Quit,
}

/// Owns the bookstore state for the lifetime of the console.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    bookstore: Bookstore,
}

impl Dispatcher {
    pub fn new(bookstore: Bookstore) -> Self {
        Dispatcher { bookstore }
    }

    pub fn bookstore(&self) -> &Bookstore {
        &self.bookstore
    }

    pub fn into_bookstore(self) -> Bookstore {
        self.bookstore
    }

    pub fn snapshot(&self) -> Snapshot {
        self.bookstore.snapshot()
    }

    /// Handles one raw input line.
    pub fn dispatch(&mut self, line: &str) -> Reply {
        let tokens = tokenize(line);
        let Some(first) = tokens.first() else {
            return Reply::Ignored;
        };

        if first == "quit" || first == "exit" {
            return Reply::Quit;
        }

        let outcome = resolve(&tokens).and_then(|verb| self.bookstore.execute(verb, &tokens));
        match outcome {
            Ok(response) => Reply::Applied(response),
            Err(err) => Reply::Rejected(err),
        }
    }
}

/// Maps the leading token(s) to a verb.
fn resolve(tokens: &[String]) -> CommandResult<Verb> {
    let second = tokens.get(1).map(String::as_str);
    let verb = match tokens[0].as_str() {
        "su" => Verb::Su,
        "logout" => Verb::Logout,
        "register" => Verb::Register,
        "passwd" => Verb::Passwd,
        "useradd" => Verb::Useradd,
        "delete" => Verb::Delete,
        "show" if second == Some("finance") => Verb::ShowFinance,
        "show" => Verb::Show,
        "buy" => Verb::Buy,
        "select" => Verb::Select,
        "modify" => Verb::Modify,
        "import" => Verb::Import,
        "report" if second == Some("finance") => Verb::ReportFinance,
        "report" if second == Some("employee") => Verb::ReportEmployee,
        "log" => Verb::Log,
        _ => {
            debug!(line = %tokens.join(" "), "Unknown command");
            return Err(CommandError::UnknownCommand(tokens.join(" ")));
        }
    };
    Ok(verb)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LogoutPolicy;
    use crate::types::Privilege;

    fn applied(reply: Reply) -> Vec<String> {
        match reply {
            Reply::Applied(response) => response.as_lines().to_vec(),
            other => panic!("expected Applied, got {other:?}"),
        }
    }

    fn run_all(dispatcher: &mut Dispatcher, lines: &[&str]) {
        for line in lines {
            assert!(
                matches!(dispatcher.dispatch(line), Reply::Applied(_)),
                "{line} was not applied"
            );
        }
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let mut dispatcher = Dispatcher::new(Bookstore::bootstrap());
        assert_eq!(dispatcher.dispatch(""), Reply::Ignored);
        assert_eq!(dispatcher.dispatch("    "), Reply::Ignored);
        assert!(dispatcher.bookstore().store().logs().is_empty());
    }

    #[test]
    fn test_quit_and_exit() {
        let mut dispatcher = Dispatcher::new(Bookstore::bootstrap());
        assert_eq!(dispatcher.dispatch("quit"), Reply::Quit);
        assert_eq!(dispatcher.dispatch("exit"), Reply::Quit);
        assert_eq!(dispatcher.dispatch("quit now"), Reply::Quit);
        assert_eq!(dispatcher.dispatch("exit x y"), Reply::Quit);
        assert!(dispatcher.bookstore().store().logs().is_empty());
    }

    #[test]
    fn test_unknown_verbs_rejected() {
        let mut dispatcher = Dispatcher::new(Bookstore::bootstrap());
        for line in ["hello", "report", "report sales", "SU root sjtu"] {
            assert!(
                matches!(dispatcher.dispatch(line), Reply::Rejected(_)),
                "{line} should be rejected"
            );
        }
    }

    #[test]
    fn test_purchase_scenario() {
        let mut dispatcher = Dispatcher::new(Bookstore::bootstrap());
        run_all(
            &mut dispatcher,
            &[
                "su root sjtu",
                "useradd user1 123 3 Alice",
                "logout",
                "su user1 123",
                "select 1000000001",
                "import 5 50.00",
                "modify -price=10.00",
            ],
        );

        assert_eq!(applied(dispatcher.dispatch("buy 1000000001 2")), ["20.00"]);
        assert_eq!(
            applied(dispatcher.dispatch("show")),
            ["1000000001\t\t\t\t10.00\t3"]
        );
    }

    #[test]
    fn test_customer_cannot_select() {
        let mut dispatcher = Dispatcher::new(Bookstore::bootstrap());
        run_all(
            &mut dispatcher,
            &["su root sjtu", "useradd user1 123 1 Alice", "logout", "su user1 123"],
        );
        assert!(matches!(
            dispatcher.dispatch("select 1000000001"),
            Reply::Rejected(CommandError::InsufficientPrivilege {
                required: Privilege::Staff,
                current: Privilege::Customer,
            })
        ));
    }

    #[test]
    fn test_show_finance_zero_prints_blank() {
        let mut dispatcher = Dispatcher::new(Bookstore::bootstrap());
        run_all(&mut dispatcher, &["su root sjtu"]);
        assert_eq!(applied(dispatcher.dispatch("show finance 0")), [""]);
        assert_eq!(applied(dispatcher.dispatch("show finance")), ["+ 0.00 - 0.00"]);
    }

    #[test]
    fn test_quoted_names_with_spaces() {
        let mut dispatcher = Dispatcher::new(Bookstore::bootstrap());
        run_all(
            &mut dispatcher,
            &[
                "su root sjtu",
                "select 978-7",
                "modify -name=\"The Left Hand of Darkness\" -author=\"Le Guin\"",
            ],
        );
        assert_eq!(
            applied(dispatcher.dispatch("show -name=\"The Left Hand of Darkness\"")),
            ["978-7\tThe Left Hand of Darkness\tLe Guin\t\t0.00\t0"]
        );
    }

    #[test]
    fn test_delete_logged_in_account_refused() {
        let mut dispatcher = Dispatcher::new(Bookstore::bootstrap());
        run_all(
            &mut dispatcher,
            &["su root sjtu", "useradd clerk pw 3 Clerk", "su clerk pw", "su root sjtu"],
        );
        assert!(matches!(
            dispatcher.dispatch("delete clerk"),
            Reply::Rejected(CommandError::AccountActive(_))
        ));
        run_all(&mut dispatcher, &["logout", "logout", "delete clerk"]);
        assert!(dispatcher.bookstore().store().account("clerk").is_none());
    }

    #[test]
    fn test_nested_relogin_keeps_selection() {
        let mut dispatcher = Dispatcher::new(Bookstore::bootstrap());
        run_all(
            &mut dispatcher,
            &["su root sjtu", "select 1", "su root sjtu", "logout"],
        );
        assert!(matches!(dispatcher.dispatch("import 1 1"), Reply::Applied(_)));
    }

    #[test]
    fn test_nested_relogin_clear_always() {
        let bookstore = Bookstore::bootstrap().with_logout_policy(LogoutPolicy::ClearAlways);
        let mut dispatcher = Dispatcher::new(bookstore);
        run_all(
            &mut dispatcher,
            &["su root sjtu", "select 1", "su root sjtu", "logout"],
        );
        assert_eq!(
            dispatcher.dispatch("import 1 1"),
            Reply::Rejected(CommandError::NoSelection)
        );
    }

    #[test]
    fn test_rejections_leave_no_trace() {
        let mut dispatcher = Dispatcher::new(Bookstore::bootstrap());
        run_all(&mut dispatcher, &["su root sjtu"]);
        let before = dispatcher.snapshot();

        for line in ["buy nothing 1", "modify -price=1", "passwd root wrong new", "bogus"] {
            assert!(matches!(dispatcher.dispatch(line), Reply::Rejected(_)));
        }
        assert_eq!(dispatcher.snapshot(), before);
    }
}
