//! # Log Messages
//!
//! Format functions for log-only lines.

pub fn plain_message(target: &str, message_type: &str, username: &str, text: &str) -> String {
    format!("[{target} ({message_type})] {username}: {text}")
}

pub fn unknown_command(name: &str, username: &str) -> String {
    format!("* Unknown command {name} from {username}")
}

pub fn disabled_command(name: &str, username: &str) -> String {
    format!("* Disabled command {name} requested by {username}")
}

pub fn executed_command(name: &str, username: &str) -> String {
    format!("* Executed {name} command for {username}")
}

pub fn connected(addr: &str, port: u16) -> String {
    format!("* Connected to {addr}:{port}")
}

pub const RECONNECTING: &str = "Reconnecting attempt";
pub const NOTHING_TO_ECHO: &str = "* Nothing to echo";

pub fn seeded_defaults(count: usize) -> String {
    format!("No stored commands, seeded {count} defaults")
}

pub fn session_started(session: u64, channel: &str) -> String {
    format!("Session {session} started for {channel}")
}

pub fn stale_event(session: u64) -> String {
    format!("Dropping event from closed session {session}")
}
