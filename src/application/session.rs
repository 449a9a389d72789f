//! # Session State
//!
//! Process-lifetime chat session: who has been greeted, and where the
//! connection currently stands.

use std::collections::HashSet;

use crate::domain::types::ConnectionState;

#[derive(Debug, Default)]
pub struct Session {
    greeted_users: HashSet<String>,
    pub connection: ConnectionState,
    /// Number of the live transport; bumped on every (re)start.
    pub generation: u64,
    /// Set when the control surface asked to disconnect.
    pub manual_disconnect: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new transport generation. Greeted users are kept.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.connection = ConnectionState::Disconnected;
        self.manual_disconnect = false;
        self.generation
    }

    /// Records `username` as greeted. Returns false if they already were.
    pub fn greet(&mut self, username: &str) -> bool {
        self.greeted_users.insert(username.to_string())
    }

    pub fn was_greeted(&self, username: &str) -> bool {
        self.greeted_users.contains(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greets_once() {
        let mut session = Session::new();
        assert!(session.greet("alice"));
        assert!(!session.greet("alice"));
        assert!(session.greet("bob"));
        assert!(session.was_greeted("alice"));
    }

    #[test]
    fn test_begin_keeps_greetings() {
        let mut session = Session::new();
        session.greet("alice");
        session.connection = ConnectionState::Connected;
        session.manual_disconnect = true;

        assert_eq!(session.begin(), 1);
        assert_eq!(session.begin(), 2);
        assert!(session.was_greeted("alice"));
        assert_eq!(session.connection, ConnectionState::Disconnected);
        assert!(!session.manual_disconnect);
    }
}
