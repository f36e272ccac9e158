//! # Session Stack
//!
//! The ordered stack of active logins.
//!
//! ## Nested Logins
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  su root sjtu     su alice        su bob x       logout                 │
//! │                                                                         │
//! │                                  ┌──────────┐                           │
//! │                  ┌──────────┐    │ bob   1  │ ◄ top   ┌──────────┐      │
//! │  ┌──────────┐    │ alice 3  │    │ alice 3  │         │ alice 3  │      │
//! │  │ root  7  │    │ root  7  │    │ root  7  │         │ root  7  │      │
//! │  └──────────┘    └──────────┘    └──────────┘         └──────────┘      │
//! │                                                                         │
//! │  Each frame pins the privilege the account had at login time.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::SessionError;
use crate::types::Privilege;

/// One login: identity plus the privilege it had when it logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFrame {
    pub user_id: String,
    pub privilege: Privilege,
}

/// Array-backed login stack. The last element is the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionStack {
    frames: Vec<SessionFrame>,
}

impl SessionStack {
    pub fn new() -> Self {
        SessionStack::default()
    }

    /// Privilege of the top frame, `Guest` when nobody is logged in.
    pub fn current_privilege(&self) -> Privilege {
        self.frames
            .last()
            .map_or(Privilege::Guest, |frame| frame.privilege)
    }

    /// Identity of the top frame.
    pub fn current_identity(&self) -> Option<&str> {
        self.frames.last().map(|frame| frame.user_id.as_str())
    }

    pub fn push(&mut self, user_id: impl Into<String>, privilege: Privilege) {
        self.frames.push(SessionFrame {
            user_id: user_id.into(),
            privilege,
        });
    }

    pub fn pop(&mut self) -> Result<SessionFrame, SessionError> {
        self.frames.pop().ok_or(SessionError::EmptyStack)
    }

    /// Whether any frame, at any depth, belongs to `user_id`.
    pub fn is_active(&self, user_id: &str) -> bool {
        self.frames.iter().any(|frame| frame.user_id == user_id)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stack_is_guest() {
        let stack = SessionStack::new();
        assert_eq!(stack.current_privilege(), Privilege::Guest);
        assert_eq!(stack.current_identity(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_push_pop_order() {
        let mut stack = SessionStack::new();
        stack.push("root", Privilege::Admin);
        stack.push("alice", Privilege::Staff);

        assert_eq!(stack.current_identity(), Some("alice"));
        assert_eq!(stack.current_privilege(), Privilege::Staff);

        let frame = stack.pop().unwrap();
        assert_eq!(frame.user_id, "alice");
        assert_eq!(stack.current_identity(), Some("root"));
        assert_eq!(stack.current_privilege(), Privilege::Admin);
    }

    #[test]
    fn test_pop_empty_fails() {
        let mut stack = SessionStack::new();
        assert_eq!(stack.pop(), Err(SessionError::EmptyStack));
    }

    #[test]
    fn test_same_identity_nested() {
        let mut stack = SessionStack::new();
        stack.push("alice", Privilege::Staff);
        stack.push("bob", Privilege::Customer);
        stack.push("alice", Privilege::Staff);
        assert_eq!(stack.depth(), 3);

        stack.pop().unwrap();
        assert!(stack.is_active("alice"));
        assert!(stack.is_active("bob"));
        assert!(!stack.is_active("carol"));
    }
}
