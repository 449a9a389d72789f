//! # Command Line
//!
//! `clap` definitions plus the offline subcommands, which run the same
//! control operations as the console without connecting to chat.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::application::router::CommandRouter;
use crate::domain::config::{Configuration, DEFAULT_CONFIG_PATH};

#[derive(Debug, Parser)]
#[command(name = "awesomo", version, about = "Chat command bot for Twitch channels")]
pub struct Cli {
    /// Path to the settings file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Connect to chat and serve commands (default)
    Run,
    /// Store channel credentials
    Configure {
        channel: String,
        bot: String,
        oauth: String,
        /// Reconnect automatically after a disconnect
        #[arg(long)]
        auto_connect: bool,
    },
    /// Write all commands to a JSON file
    Export { path: Option<PathBuf> },
    /// Replace all commands with those in a JSON file
    Import { path: PathBuf },
    /// Print the command table
    List,
}

/// Where exports go when no path is given.
pub fn default_export_path() -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("data.json")
}

/// Runs an offline subcommand. `Run` is handled by `main`.
pub fn execute(router: &mut CommandRouter, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Run => {}
        CliCommand::Configure {
            channel,
            bot,
            oauth,
            auto_connect,
        } => {
            router.replace_configuration(Configuration {
                channel_name: channel,
                bot_username: bot,
                oauth_token: oauth,
                auto_connect,
            })?;
            println!("Saved configuration for {}", router.state.config.channel());
        }
        CliCommand::Export { path } => {
            let path = path.unwrap_or_else(default_export_path);
            router.export_commands(&path)?;
            println!("Exported commands to {}", path.display());
        }
        CliCommand::Import { path } => {
            let count = router.import_commands(&path)?;
            println!("Imported {count} commands from {}", path.display());
        }
        CliCommand::List => {
            let prefix = router.state.prefix;
            for cmd in router.state.registry.commands() {
                let status = if cmd.enabled { "enabled" } else { "disabled" };
                println!(
                    "{prefix}{:<12} {:<8} {:<9} {}",
                    cmd.name,
                    cmd.kind.as_str(),
                    status,
                    cmd.description
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["awesomo"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));

        let cli = Cli::try_parse_from([
            "awesomo", "--config", "alt.yaml", "configure", "scanf", "awesomo", "oauth:x", "--auto-connect",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("alt.yaml"));
        match cli.command {
            Some(CliCommand::Configure { channel, auto_connect, .. }) => {
                assert_eq!(channel, "scanf");
                assert!(auto_connect);
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(
            Cli::try_parse_from(["awesomo", "export"]).unwrap().command,
            Some(CliCommand::Export { path: None })
        ));
    }
}
