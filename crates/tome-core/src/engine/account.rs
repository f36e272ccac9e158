//! Account commands: su, logout, register, passwd, useradd, delete.
//!
//! ## Privilege Rules
//! ```text
//! su        0   password may be omitted only when current > target
//! logout    1
//! register  0   new account is always a Customer
//! passwd    1   current password may be omitted only by an Admin
//! useradd   3   new privilege ∈ {1,3,7} and strictly below the caller
//! delete    7   refused while the target has any frame on the stack
//! ```

use super::{check_arity, Applied, Bookstore, LogoutPolicy};
use crate::error::{CommandError, CommandResult};
use crate::types::{Account, Privilege};
use crate::validation::{parse_privilege, validate_password, validate_user_id, validate_username};

impl Bookstore {
    /// `su <user-id> [<password>]`
    pub(super) fn su(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("su", tokens, 2, 3)?;

        let user_id = &tokens[1];
        let password = tokens.get(2);
        validate_user_id(user_id)?;
        if let Some(password) = password {
            validate_password(password)?;
        }

        let account = self
            .store
            .account(user_id)
            .ok_or_else(|| CommandError::AccountNotFound(user_id.clone()))?;

        let authorized = match password {
            Some(password) => account.password == *password,
            None => self.sessions.current_privilege() > account.privilege,
        };
        if !authorized {
            return Err(CommandError::AuthenticationFailed(user_id.clone()));
        }

        let privilege = account.privilege;
        self.sessions.push(user_id.clone(), privilege);
        Ok(Applied::silent(user_id.clone()))
    }

    /// `logout`
    pub(super) fn logout(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("logout", tokens, 1, 1)?;
        self.require(Privilege::Customer)?;

        let frame = self.sessions.pop()?;
        let clear_selection = match self.logout_policy {
            LogoutPolicy::ClearAlways => true,
            LogoutPolicy::RetainWhileActive => !self.sessions.is_active(&frame.user_id),
        };
        if clear_selection {
            self.selections.clear(&frame.user_id);
        }

        Ok(Applied::silent(frame.user_id))
    }

    /// `register <user-id> <password> <username>`
    pub(super) fn register(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("register", tokens, 4, 4)?;

        let (user_id, password, username) = (&tokens[1], &tokens[2], &tokens[3]);
        validate_user_id(user_id)?;
        validate_password(password)?;
        validate_username(username)?;

        if self.store.contains_account(user_id) {
            return Err(CommandError::AccountExists(user_id.clone()));
        }

        self.store.insert_account(Account::new(
            user_id.as_str(),
            password.as_str(),
            username.as_str(),
            Privilege::Customer,
        ));
        Ok(Applied::silent(user_id.clone()))
    }

    /// `passwd <user-id> [<current-password>] <new-password>`
    pub(super) fn passwd(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("passwd", tokens, 3, 4)?;

        let user_id = &tokens[1];
        let new_password = &tokens[tokens.len() - 1];
        let current_password = (tokens.len() == 4).then(|| &tokens[2]);
        validate_user_id(user_id)?;
        if let Some(current) = current_password {
            validate_password(current)?;
        }
        validate_password(new_password)?;

        self.require(Privilege::Customer)?;

        let caller = self.sessions.current_privilege();
        let account = self
            .store
            .account_mut(user_id)
            .ok_or_else(|| CommandError::AccountNotFound(user_id.clone()))?;

        let authorized = match current_password {
            Some(current) => account.password == *current,
            None => caller == Privilege::Admin,
        };
        if !authorized {
            return Err(CommandError::AuthenticationFailed(user_id.clone()));
        }

        account.password = new_password.clone();
        Ok(Applied::silent(user_id.clone()))
    }

    /// `useradd <user-id> <password> <privilege> <username>`
    pub(super) fn useradd(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("useradd", tokens, 5, 5)?;

        let (user_id, password, username) = (&tokens[1], &tokens[2], &tokens[4]);
        validate_user_id(user_id)?;
        validate_password(password)?;
        let privilege = parse_privilege(&tokens[3])?;
        validate_username(username)?;

        self.require(Privilege::Staff)?;

        let current = self.sessions.current_privilege();
        if privilege >= current {
            return Err(CommandError::PrivilegeNotGrantable {
                requested: privilege,
                current,
            });
        }
        if self.store.contains_account(user_id) {
            return Err(CommandError::AccountExists(user_id.clone()));
        }

        self.store.insert_account(Account::new(
            user_id.as_str(),
            password.as_str(),
            username.as_str(),
            privilege,
        ));
        Ok(Applied::silent(user_id.clone()))
    }

    /// `delete <user-id>`
    pub(super) fn delete(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("delete", tokens, 2, 2)?;

        let user_id = &tokens[1];
        validate_user_id(user_id)?;

        self.require(Privilege::Admin)?;

        if !self.store.contains_account(user_id) {
            return Err(CommandError::AccountNotFound(user_id.clone()));
        }
        if self.sessions.is_active(user_id) {
            return Err(CommandError::AccountActive(user_id.clone()));
        }

        self.store.remove_account(user_id);
        Ok(Applied::silent(user_id.clone()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::engine::{Bookstore, LogoutPolicy, Verb};
    use crate::error::CommandError;
    use crate::tokenizer::tokenize;
    use crate::types::Privilege;

    fn run(bookstore: &mut Bookstore, verb: Verb, line: &str) -> Result<(), CommandError> {
        bookstore.execute(verb, &tokenize(line)).map(|_| ())
    }

    fn staffed_store() -> Bookstore {
        let mut bookstore = Bookstore::bootstrap();
        run(&mut bookstore, Verb::Su, "su root sjtu").unwrap();
        run(&mut bookstore, Verb::Useradd, "useradd clerk pw 3 Clerk").unwrap();
        run(&mut bookstore, Verb::Useradd, "useradd cust pw 1 Cust").unwrap();
        bookstore
    }

    #[test]
    fn test_register_creates_customers() {
        let mut bookstore = Bookstore::bootstrap();
        for id in ["ann", "ben", "cat"] {
            run(&mut bookstore, Verb::Register, &format!("register {id} pw {id}")).unwrap();
        }

        assert_eq!(bookstore.store().account_count(), 4);
        for id in ["ann", "ben", "cat"] {
            assert_eq!(
                bookstore.store().account(id).unwrap().privilege,
                Privilege::Customer
            );
        }
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let mut bookstore = Bookstore::bootstrap();
        let err = run(&mut bookstore, Verb::Register, "register root x y").unwrap_err();
        assert_eq!(err, CommandError::AccountExists("root".to_string()));
        assert_eq!(bookstore.store().account(crate::ROOT_USER_ID).unwrap().password, "sjtu");
    }

    #[test]
    fn test_su_without_password_needs_higher_rank() {
        let mut bookstore = staffed_store();

        // Admin → Staff without a password.
        run(&mut bookstore, Verb::Su, "su clerk").unwrap();
        // Staff → Staff without a password is refused.
        assert!(run(&mut bookstore, Verb::Su, "su clerk").is_err());
        // Staff → Customer is fine.
        run(&mut bookstore, Verb::Su, "su cust").unwrap();
        // Customer → root needs the password.
        assert!(run(&mut bookstore, Verb::Su, "su root").is_err());
        run(&mut bookstore, Verb::Su, "su root sjtu").unwrap();
        assert_eq!(bookstore.sessions().depth(), 4);
    }

    #[test]
    fn test_su_password_must_match() {
        let mut bookstore = staffed_store();
        assert!(run(&mut bookstore, Verb::Su, "su cust wrong").is_err());
        assert!(run(&mut bookstore, Verb::Su, "su ghost pw").is_err());
        assert!(run(&mut bookstore, Verb::Su, "su cust pw extra").is_err());
        run(&mut bookstore, Verb::Su, "su cust pw").unwrap();
        assert_eq!(bookstore.sessions().current_identity(), Some("cust"));
    }

    #[test]
    fn test_privilege_pinned_at_login() {
        let mut bookstore = staffed_store();
        run(&mut bookstore, Verb::Su, "su clerk pw").unwrap();

        bookstore.store.account_mut("clerk").unwrap().privilege = Privilege::Customer;
        assert_eq!(bookstore.sessions().current_privilege(), Privilege::Staff);
    }

    #[test]
    fn test_logout_to_guest_blocks_gated_commands() {
        let mut bookstore = Bookstore::bootstrap();
        run(&mut bookstore, Verb::Su, "su root sjtu").unwrap();
        run(&mut bookstore, Verb::Logout, "logout").unwrap();

        assert!(matches!(
            run(&mut bookstore, Verb::Logout, "logout"),
            Err(CommandError::InsufficientPrivilege { .. })
        ));
        assert!(run(&mut bookstore, Verb::Show, "show").is_err());
        assert!(run(&mut bookstore, Verb::Select, "select 1").is_err());
        assert!(run(&mut bookstore, Verb::Log, "log").is_err());
        assert!(run(&mut bookstore, Verb::Passwd, "passwd root sjtu x").is_err());
    }

    #[test]
    fn test_logout_retains_selection_while_identity_active() {
        let mut bookstore = staffed_store();
        run(&mut bookstore, Verb::Su, "su clerk").unwrap();
        run(&mut bookstore, Verb::Select, "select 111").unwrap();
        run(&mut bookstore, Verb::Su, "su cust").unwrap();
        run(&mut bookstore, Verb::Su, "su clerk pw").unwrap();

        run(&mut bookstore, Verb::Logout, "logout").unwrap();
        assert_eq!(bookstore.selections().current("clerk"), Some("111"));

        run(&mut bookstore, Verb::Logout, "logout").unwrap();
        run(&mut bookstore, Verb::Logout, "logout").unwrap();
        assert_eq!(bookstore.selections().current("clerk"), None);
    }

    #[test]
    fn test_logout_clear_always_policy() {
        let mut bookstore = staffed_store().with_logout_policy(LogoutPolicy::ClearAlways);
        run(&mut bookstore, Verb::Su, "su clerk").unwrap();
        run(&mut bookstore, Verb::Select, "select 111").unwrap();
        run(&mut bookstore, Verb::Su, "su clerk pw").unwrap();

        run(&mut bookstore, Verb::Logout, "logout").unwrap();
        assert_eq!(bookstore.sessions().current_identity(), Some("clerk"));
        assert_eq!(bookstore.selections().current("clerk"), None);
        assert_eq!(run(&mut bookstore, Verb::Import, "import 1 1"), Err(CommandError::NoSelection));
    }

    #[test]
    fn test_passwd_rules() {
        let mut bookstore = staffed_store();

        // Admin may omit the current password.
        run(&mut bookstore, Verb::Passwd, "passwd cust newpw").unwrap();
        assert_eq!(bookstore.store().account("cust").unwrap().password, "newpw");

        run(&mut bookstore, Verb::Su, "su cust newpw").unwrap();
        // A customer must give it, and it must match.
        assert!(run(&mut bookstore, Verb::Passwd, "passwd cust other").is_err());
        assert!(run(&mut bookstore, Verb::Passwd, "passwd cust wrong other").is_err());
        run(&mut bookstore, Verb::Passwd, "passwd cust newpw other").unwrap();
        assert_eq!(bookstore.store().account("cust").unwrap().password, "other");

        assert!(run(&mut bookstore, Verb::Passwd, "passwd ghost a b").is_err());
    }

    #[test]
    fn test_useradd_rules() {
        let mut bookstore = staffed_store();
        run(&mut bookstore, Verb::Su, "su clerk").unwrap();

        // Staff cannot create Staff or Admin.
        assert!(matches!(
            run(&mut bookstore, Verb::Useradd, "useradd s2 pw 3 S2"),
            Err(CommandError::PrivilegeNotGrantable { .. })
        ));
        assert!(run(&mut bookstore, Verb::Useradd, "useradd a2 pw 7 A2").is_err());
        // Ranks outside {1,3,7} are lexically invalid.
        assert!(matches!(
            run(&mut bookstore, Verb::Useradd, "useradd c2 pw 2 C2"),
            Err(CommandError::Validation(_))
        ));
        assert!(run(&mut bookstore, Verb::Useradd, "useradd cust pw 1 Dup").is_err());

        run(&mut bookstore, Verb::Useradd, "useradd c2 pw 1 C2").unwrap();
        assert_eq!(
            bookstore.store().account("c2").unwrap().privilege,
            Privilege::Customer
        );
    }

    #[test]
    fn test_useradd_needs_staff() {
        let mut bookstore = staffed_store();
        run(&mut bookstore, Verb::Su, "su cust").unwrap();
        assert!(matches!(
            run(&mut bookstore, Verb::Useradd, "useradd x pw 1 X"),
            Err(CommandError::InsufficientPrivilege { .. })
        ));
    }

    #[test]
    fn test_delete_active_account_refused_even_for_root() {
        let mut bookstore = staffed_store();
        assert_eq!(
            run(&mut bookstore, Verb::Delete, "delete root"),
            Err(CommandError::AccountActive("root".to_string()))
        );

        run(&mut bookstore, Verb::Su, "su clerk").unwrap();
        run(&mut bookstore, Verb::Su, "su root sjtu").unwrap();
        assert!(run(&mut bookstore, Verb::Delete, "delete clerk").is_err());

        run(&mut bookstore, Verb::Delete, "delete cust").unwrap();
        assert!(!bookstore.store().contains_account("cust"));
        assert!(run(&mut bookstore, Verb::Delete, "delete cust").is_err());
    }
}
