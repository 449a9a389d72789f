//! # Event Dispatcher
//!
//! Single-mailbox actor that owns the `CommandRouter`. Transport events,
//! control requests and async completions (jokes) all arrive on one channel
//! and are handled one at a time, so router state needs no locking.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::application::router::CommandRouter;
use crate::domain::traits::{ChatTransport, EventSink, JokeProvider, Notifier, TransportFactory};
use crate::domain::types::{Action, ControlRequest, Inbound, TransportEvent};
use crate::strings::{logs, messages};

pub struct Dispatcher {
    router: CommandRouter,
    factory: Arc<dyn TransportFactory>,
    notifier: Arc<dyn Notifier>,
    jokes: Arc<dyn JokeProvider>,
    transport: Option<Arc<dyn ChatTransport>>,
    tx: UnboundedSender<Inbound>,
    rx: UnboundedReceiver<Inbound>,
}

impl Dispatcher {
    pub fn new(
        router: CommandRouter,
        factory: Arc<dyn TransportFactory>,
        notifier: Arc<dyn Notifier>,
        jokes: Arc<dyn JokeProvider>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            router,
            factory,
            notifier,
            jokes,
            transport: None,
            tx,
            rx,
        }
    }

    /// Sender for the control surface.
    pub fn mailbox(&self) -> UnboundedSender<Inbound> {
        self.tx.clone()
    }

    pub async fn run(mut self) -> Result<()> {
        self.start_session().await;
        while let Some(inbound) = self.rx.recv().await {
            if !self.handle(inbound).await {
                break;
            }
        }
        if let Some(transport) = self.transport.take() {
            if let Err(e) = transport.disconnect().await {
                tracing::warn!("Disconnect on shutdown failed: {:#}", e);
            }
        }
        tracing::info!("Dispatcher stopped");
        Ok(())
    }

    /// Tears down the current transport and, when the configuration allows, builds a new one.
    async fn start_session(&mut self) {
        if let Some(old) = self.transport.take() {
            if let Err(e) = old.disconnect().await {
                tracing::warn!("Failed to close previous session: {:#}", e);
            }
        }

        let state = &mut self.router.state;
        if !state.config.is_valid() {
            tracing::warn!("{}", messages::CONFIGURATION_REQUIRED);
            self.notifier
                .show(messages::CONFIGURATION_REQUIRED_TITLE, messages::CONFIGURATION_REQUIRED);
            return;
        }

        let session = state.session.begin();
        let sink = EventSink::new(session, self.tx.clone());
        self.transport = Some(self.factory.create(&state.config, sink));
        tracing::info!("{}", logs::session_started(session, &state.config.channel()));

        if state.config.auto_connect {
            if let Some(action) = state.policy.request_connect(&mut state.session) {
                self.perform(action).await;
            }
        }
    }

    /// Handles one mailbox message. Returns false on shutdown.
    async fn handle(&mut self, inbound: Inbound) -> bool {
        match inbound {
            Inbound::Transport { session, event } => {
                if session != self.router.state.session.generation {
                    tracing::debug!("{}", logs::stale_event(session));
                    return true;
                }
                for action in self.router.handle_event(event) {
                    self.perform(action).await;
                }
            }
            Inbound::JokeReady {
                target,
                context,
                joke,
            } => {
                for action in self.router.joke_ready(&target, &context, joke) {
                    self.perform(action).await;
                }
            }
            Inbound::Control(ControlRequest::Shutdown) => return false,
            Inbound::Control(request) => self.control(request).await,
        }
        true
    }

    async fn control(&mut self, request: ControlRequest) {
        match request {
            ControlRequest::Connect => {
                if self.transport.is_none() {
                    self.notifier
                        .show(messages::CONFIGURATION_REQUIRED_TITLE, messages::CONFIGURATION_REQUIRED);
                    return;
                }
                let state = &mut self.router.state;
                if let Some(action) = state.policy.request_connect(&mut state.session) {
                    self.perform(action).await;
                }
            }
            ControlRequest::Disconnect => {
                let state = &mut self.router.state;
                state.policy.request_disconnect(&mut state.session);
                if let Some(transport) = &self.transport {
                    if let Err(e) = transport.disconnect().await {
                        self.surface_error(e);
                    }
                }
            }
            ControlRequest::AddOrUpdateCommand(cmd) => match self.router.add_or_update_command(cmd) {
                Ok(saved) => tracing::info!("Saved command {} ({})", saved.name, saved.kind.as_str()),
                Err(e) => self.surface_error(e),
            },
            ControlRequest::SelectCommand(name) => {
                let selected = self.router.select_command(&name).map(serde_json::to_string_pretty);
                match selected {
                    Some(Ok(json)) => tracing::info!("Selected command:\n{}", json),
                    Some(Err(e)) => self.surface_error(e.into()),
                    None => tracing::warn!("No command named '{}'", name),
                }
            }
            ControlRequest::ReplaceConfiguration(config) => {
                match self.router.replace_configuration(config) {
                    Ok(()) => self.start_session().await,
                    Err(e) => self.surface_error(e),
                }
            }
            ControlRequest::ExportCommands(path) => match self.router.export_commands(&path) {
                Ok(()) => tracing::info!("Exported commands to {}", path.display()),
                Err(e) => self.surface_error(e),
            },
            ControlRequest::ImportCommands(path) => match self.router.import_commands(&path) {
                Ok(count) => tracing::info!("Imported {} commands from {}", count, path.display()),
                Err(e) => self.surface_error(e),
            },
            ControlRequest::ListCommands => {
                let prefix = self.router.state.prefix;
                for cmd in self.router.state.registry.commands() {
                    tracing::info!(
                        "{}{} [{}{}] {}",
                        prefix,
                        cmd.name,
                        cmd.kind.as_str(),
                        if cmd.enabled { "" } else { ", disabled" },
                        cmd.description
                    );
                }
            }
            ControlRequest::Shutdown => {}
        }
    }

    async fn perform(&mut self, action: Action) {
        match action {
            Action::Say { target, text } => {
                let Some(transport) = &self.transport else {
                    tracing::warn!("No transport; dropping reply to {}", target);
                    return;
                };
                if let Err(e) = transport.say(&target, &text).await {
                    tracing::error!("Failed to send to {}: {:#}", target, e);
                }
            }
            Action::Whisper { target, text } => {
                let Some(transport) = &self.transport else {
                    tracing::warn!("No transport; dropping whisper to {}", target);
                    return;
                };
                if let Err(e) = transport.whisper(&target, &text).await {
                    tracing::error!("Failed to whisper {}: {:#}", target, e);
                }
            }
            Action::Notify { title, body } => self.notifier.show(&title, &body),
            Action::Connect => {
                let Some(transport) = self.transport.clone() else {
                    return;
                };
                if let Err(e) = transport.connect().await {
                    let error = e.context("Connect failed");
                    let state = &mut self.router.state;
                    if !state.policy.on_connect_failed(&mut state.session) {
                        self.surface_error(error);
                        return;
                    }
                    // Retry through the mailbox, the same way a dropped connection is handled.
                    tracing::warn!("{:#}", error);
                    let _ = self.tx.send(Inbound::Transport {
                        session: state.session.generation,
                        event: TransportEvent::Disconnected {
                            reason: format!("{error:#}"),
                        },
                    });
                }
            }
            Action::FetchJoke { target, context } => {
                let jokes = self.jokes.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    match jokes.random_joke().await {
                        Ok(joke) => {
                            let _ = tx.send(Inbound::JokeReady {
                                target,
                                context,
                                joke,
                            });
                        }
                        Err(e) => tracing::error!("Joke request failed: {:#}", e),
                    }
                });
            }
        }
    }

    fn surface_error(&self, error: anyhow::Error) {
        tracing::error!("{:#}", error);
        self.notifier
            .show(messages::OPERATION_FAILED_TITLE, &format!("{error:#}"));
    }
}
