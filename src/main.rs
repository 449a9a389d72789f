//! # Main Entry Point
//!
//! Wires the layers together:
//! - Domain: configuration, types, collaborator traits
//! - Infrastructure: file cache, Twitch transport, joke provider, notifications
//! - Application: registry, resolver, router, dispatcher, logging
//! - Interface: CLI and control console
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use crate::application::dispatcher::Dispatcher;
use crate::application::router::CommandRouter;
use crate::application::state::RouterState;
use crate::domain::config::AppConfig;
use crate::infrastructure::cache::FsCache;
use crate::infrastructure::joke::HttpJokeProvider;
use crate::infrastructure::notify::LogNotifier;
use crate::infrastructure::twitch::TwitchFactory;
use crate::interface::cli::{Cli, CliCommand};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let _guard = application::logging::init(&config)?;

    // 3. Load commands and secrets
    let store = Arc::new(FsCache::new(config.data_dir()));
    let mut router = CommandRouter::new(RouterState::load(&config, store)?);

    match cli.command.unwrap_or(CliCommand::Run) {
        CliCommand::Run => {}
        offline => return interface::cli::execute(&mut router, offline),
    }

    tracing::info!("Starting Awesom-O...");

    // 4. Dispatcher and collaborators
    let dispatcher = Dispatcher::new(
        router,
        Arc::new(TwitchFactory::new(config.twitch.clone())),
        Arc::new(LogNotifier),
        Arc::new(HttpJokeProvider::new(&config.joke)?),
    );

    // 5. Control surfaces
    let mailbox = dispatcher.mailbox();
    tokio::spawn(interface::console::run(mailbox.clone()));
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Unable to listen for shutdown signal: {}", e);
            return;
        }
        tracing::info!("Shutting down...");
        let _ = mailbox.send(domain::types::Inbound::Control(
            domain::types::ControlRequest::Shutdown,
        ));
    });

    println!("{}", strings::messages::CONSOLE_USAGE);
    dispatcher.run().await
}
