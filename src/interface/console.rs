//! # Control Console
//!
//! Reads operator input from stdin and forwards it to the dispatcher as
//! `ControlRequest`s.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::config::Configuration;
use crate::domain::types::{Command, ControlRequest, Inbound};
use crate::interface::cli::default_export_path;
use crate::strings::messages;

/// Parses one console line. `Ok(None)` for blank input.
pub fn parse_line(line: &str) -> Result<Option<ControlRequest>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let request = match verb {
        "/connect" => ControlRequest::Connect,
        "/disconnect" => ControlRequest::Disconnect,
        "/commands" => ControlRequest::ListCommands,
        "/quit" | "/exit" => ControlRequest::Shutdown,
        "/add" => {
            let cmd: Command =
                serde_json::from_str(rest).map_err(|e| messages::invalid_command_json(&e.to_string()))?;
            ControlRequest::AddOrUpdateCommand(cmd)
        }
        "/select" if !rest.is_empty() => ControlRequest::SelectCommand(rest.to_string()),
        "/export" if rest.is_empty() => ControlRequest::ExportCommands(default_export_path()),
        "/export" => ControlRequest::ExportCommands(rest.into()),
        "/import" if !rest.is_empty() => ControlRequest::ImportCommands(rest.into()),
        "/config" => {
            let args: Vec<&str> = rest.split_whitespace().collect();
            match args.as_slice() {
                [channel, bot, oauth] | [channel, bot, oauth, "auto"] => {
                    ControlRequest::ReplaceConfiguration(Configuration {
                        channel_name: channel.to_string(),
                        bot_username: bot.to_string(),
                        oauth_token: oauth.to_string(),
                        auto_connect: args.len() == 4,
                    })
                }
                _ => return Err(messages::CONSOLE_USAGE.to_string()),
            }
        }
        "/help" => return Err(messages::CONSOLE_USAGE.to_string()),
        _ => return Err(messages::console_unknown(line)),
    };
    Ok(Some(request))
}

/// Forwards stdin to `mailbox` until EOF or the dispatcher goes away.
pub async fn run(mailbox: UnboundedSender<Inbound>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Console read failed: {}", e);
                break;
            }
        };
        match parse_line(&line) {
            Ok(Some(request)) => {
                if mailbox.send(Inbound::Control(request)).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(message) => println!("{message}"),
        }
    }
    tracing::debug!("Console closed");
}
