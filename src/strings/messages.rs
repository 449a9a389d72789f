//! # Messages
//!
//! Constant strings and format functions for everything the bot says in chat
//! or shows as a notification.

pub const HELP_USAGE: &str = "USAGE: !help cmd (without !)";

/// Always uses `!`, whatever the configured prefix.
pub fn command_disabled(name: &str) -> String {
    format!("!{name} is disabled")
}

pub fn command_help(prefix: char, name: &str, description: &str) -> String {
    format!("{prefix}{name} - {description}")
}

pub fn welcome(prefix: char, username: &str) -> String {
    format!("Welcome @{username}, see {prefix}commands for chat commands ;-)")
}

pub fn hosted(channel: &str, username: &str, viewers: u32) -> String {
    format!("{channel} is hosted by {username} viewers={viewers}")
}

// Notifications

pub fn message_from(username: &str) -> String {
    format!("Message from @{username}")
}

pub fn disconnected_title(bot_name: &str) -> String {
    format!("{bot_name} disconnected")
}

pub fn command_failed_title(prefix: char, name: &str) -> String {
    format!("{prefix}{name} failed")
}

pub const CONFIGURATION_REQUIRED_TITLE: &str = "Configuration required";
pub const CONFIGURATION_REQUIRED: &str =
    "Channel name, bot username and OAuth token must all be set. Use /config <channel> <bot> <oauth> [auto].";

pub const OPERATION_FAILED_TITLE: &str = "Operation failed";

// Console

pub const CONSOLE_USAGE: &str = "Commands: /connect, /disconnect, /add <json>, /select <name>, \
/config <channel> <bot> <oauth> [auto], /export [path], /import <path>, /commands, /quit";

pub fn console_unknown(line: &str) -> String {
    format!("Unrecognized input: {line}")
}

pub fn invalid_command_json(err: &str) -> String {
    format!("Invalid command JSON: {err}")
}
