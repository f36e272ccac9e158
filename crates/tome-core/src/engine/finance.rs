//! Admin read-outs: show finance, report finance, report employee, log.

use super::{check_arity, Applied, Bookstore, Response};
use crate::error::{CommandError, CommandResult};
use crate::report::{employee_report, finance_line, finance_report, log_dump, FinanceTotals};
use crate::types::Privilege;
use crate::validation::parse_count;

impl Bookstore {
    /// `show finance [<count>]`
    ///
    /// Without a count, totals the whole history. With one, totals the most
    /// recent `count` transactions; `0` prints an empty line.
    pub(super) fn show_finance(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("show finance", tokens, 2, 3)?;
        if tokens[1] != "finance" {
            return Err(CommandError::UnknownCommand(tokens.join(" ")));
        }
        let count = tokens.get(2).map(|c| parse_count(c)).transpose()?;

        self.require(Privilege::Admin)?;

        let history = self.store.transactions();
        let window = match count {
            None => history,
            Some(0) => return Ok(Applied::new(Response::blank(), "")),
            Some(count) => {
                let available = history.len();
                let count = usize::try_from(count)
                    .ok()
                    .filter(|&count| count <= available)
                    .ok_or(CommandError::CountExceedsHistory {
                        requested: count,
                        available,
                    })?;
                &history[available - count..]
            }
        };

        let totals = FinanceTotals::from_transactions(window);
        Ok(Applied::new(Response::line(finance_line(&totals)), ""))
    }

    /// `report finance`
    pub(super) fn report_finance(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("report finance", tokens, 2, 2)?;
        self.require(Privilege::Admin)?;

        let lines = finance_report(self.store.transactions());
        Ok(Applied::new(Response::lines(lines), ""))
    }

    /// `report employee`
    pub(super) fn report_employee(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("report employee", tokens, 2, 2)?;
        self.require(Privilege::Admin)?;

        let lines = employee_report(self.store.logs());
        Ok(Applied::new(Response::lines(lines), ""))
    }

    /// `log`
    ///
    /// The dump is taken before this command's own entry is appended.
    pub(super) fn log(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("log", tokens, 1, 1)?;
        self.require(Privilege::Admin)?;

        let lines = log_dump(self.store.logs());
        Ok(Applied::new(Response::lines(lines), ""))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
