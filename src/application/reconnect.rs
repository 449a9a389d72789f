//! # Reconnection Policy
//!
//! Drives the `Disconnected -> Connecting -> Connected` cycle.
//! Reconnects are immediate and unlimited when `autoConnect` is on.

use crate::application::session::Session;
use crate::domain::types::{Action, ConnectionState};
use crate::strings::{logs, messages};

#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    pub auto_connect: bool,
    /// Used in the disconnect notification title.
    pub bot_name: String,
}

impl ReconnectPolicy {
    pub fn new(auto_connect: bool, bot_name: &str) -> Self {
        Self {
            auto_connect,
            bot_name: bot_name.to_string(),
        }
    }

    /// Transport reported a drop: notify, then reconnect if allowed.
    pub fn on_disconnected(&self, session: &mut Session, reason: &str) -> Vec<Action> {
        session.connection = ConnectionState::Disconnected;
        let mut actions = vec![Action::Notify {
            title: messages::disconnected_title(&self.bot_name),
            body: reason.to_string(),
        }];

        if self.auto_connect && !session.manual_disconnect {
            tracing::info!("{}", logs::RECONNECTING);
            session.connection = ConnectionState::Connecting;
            actions.push(Action::Connect);
        }
        actions
    }

    pub fn on_connected(&self, session: &mut Session, addr: &str, port: u16) {
        tracing::info!("{}", logs::connected(addr, port));
        session.connection = ConnectionState::Connected;
        session.manual_disconnect = false;
    }

    /// Explicit reconnect request, or the initial connect of a session.
    pub fn request_connect(&self, session: &mut Session) -> Option<Action> {
        if session.connection != ConnectionState::Disconnected {
            return None;
        }
        session.manual_disconnect = false;
        session.connection = ConnectionState::Connecting;
        Some(Action::Connect)
    }

    /// Explicit disconnect request; suppresses the automatic reconnect that follows.
    pub fn request_disconnect(&self, session: &mut Session) {
        session.manual_disconnect = true;
    }

    /// Connect attempt did not go through. Returns true when it should be
    /// retried, which is the case whenever a drop would be.
    pub fn on_connect_failed(&self, session: &mut Session) -> bool {
        session.connection = ConnectionState::Disconnected;
        self.auto_connect && !session.manual_disconnect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_reconnect() {
        let policy = ReconnectPolicy::new(true, "Awesom-O");
        let mut session = Session::new();
        policy.on_connected(&mut session, "irc.chat.twitch.tv", 6697);

        let actions = policy.on_disconnected(&mut session, "Connection closed.");
        assert_eq!(
            actions,
            vec![
                Action::Notify {
                    title: "Awesom-O disconnected".into(),
                    body: "Connection closed.".into(),
                },
                Action::Connect,
            ]
        );
        assert_eq!(session.connection, ConnectionState::Connecting);

        policy.on_connected(&mut session, "irc.chat.twitch.tv", 6697);
        assert_eq!(session.connection, ConnectionState::Connected);
    }

    #[test]
    fn test_no_auto_reconnect() {
        let policy = ReconnectPolicy::new(false, "Awesom-O");
        let mut session = Session::new();
        session.connection = ConnectionState::Connected;

        let actions = policy.on_disconnected(&mut session, "ping timeout");
        assert!(!actions.contains(&Action::Connect));
        assert_eq!(session.connection, ConnectionState::Disconnected);

        assert_eq!(policy.request_connect(&mut session), Some(Action::Connect));
        assert_eq!(session.connection, ConnectionState::Connecting);
        assert_eq!(policy.request_connect(&mut session), None);
    }

    #[test]
    fn test_failed_connect_retry() {
        let mut session = Session::new();
        session.connection = ConnectionState::Connecting;
        assert!(ReconnectPolicy::new(true, "Awesom-O").on_connect_failed(&mut session));
        assert_eq!(session.connection, ConnectionState::Disconnected);

        assert!(!ReconnectPolicy::new(false, "Awesom-O").on_connect_failed(&mut session));

        session.manual_disconnect = true;
        assert!(!ReconnectPolicy::new(true, "Awesom-O").on_connect_failed(&mut session));
    }

    #[test]
    fn test_manual_disconnect_is_not_undone() {
        let policy = ReconnectPolicy::new(true, "Awesom-O");
        let mut session = Session::new();
        session.connection = ConnectionState::Connected;

        policy.request_disconnect(&mut session);
        let actions = policy.on_disconnected(&mut session, "requested");
        assert!(!actions.contains(&Action::Connect));
        assert_eq!(session.connection, ConnectionState::Disconnected);
    }
}
