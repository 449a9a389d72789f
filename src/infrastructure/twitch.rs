//! # Twitch Chat Adapter
//!
//! Implements the `ChatTransport` trait on top of `twitch_irc`. Server messages
//! are translated into `TransportEvent`s and pushed into the dispatcher's
//! mailbox through the session's `EventSink`.

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use twitch_irc::login::StaticLoginCredentials;
use twitch_irc::message::{IRCMessage, IRCPrefix, ServerMessage};
use twitch_irc::{ClientConfig, SecureTCPTransport, TwitchIRCClient};

use crate::domain::config::{Configuration, TwitchConfig};
use crate::domain::traits::{ChatTransport, EventSink, TransportFactory};
use crate::domain::types::{MessageContext, MessageType, TransportEvent};

type IrcClient = TwitchIRCClient<SecureTCPTransport, StaticLoginCredentials>;

const TWITCH_HOST: &str = "irc.chat.twitch.tv";
const TWITCH_TLS_PORT: u16 = 6697;
const HOST_NOTICE_SENDER: &str = "jtv";
const CLOSED_BY_PEER: &str = "Connection closed.";
const CLOSED_BY_REQUEST: &str = "Disconnected by request.";
const RECONNECT_REQUESTED: &str = "Server requested a reconnect.";

/// Maps a server message to an event, from the point of view of `bot` in `channel`.
pub fn translate(message: ServerMessage, bot: &str, channel: &str) -> Option<TransportEvent> {
    if let Some(hosted) = host_notice(message.source(), channel) {
        return Some(hosted);
    }

    match message {
        ServerMessage::GlobalUserState(_) => Some(TransportEvent::Connected {
            addr: TWITCH_HOST.to_string(),
            port: TWITCH_TLS_PORT,
        }),
        ServerMessage::Reconnect(_) => Some(TransportEvent::Disconnected {
            reason: RECONNECT_REQUESTED.to_string(),
        }),
        ServerMessage::Join(join) => Some(TransportEvent::Join {
            channel: format!("#{}", join.channel_login),
            is_self: join.user_login.eq_ignore_ascii_case(bot),
            username: join.user_login,
        }),
        ServerMessage::Privmsg(msg) => {
            let mut context = MessageContext::chat(&msg.sender.login);
            if msg.is_action {
                context.message_type = MessageType::Action;
            }
            Some(TransportEvent::Message {
                target: format!("#{}", msg.channel_login),
                is_self: msg.sender.login.eq_ignore_ascii_case(bot),
                context,
                text: msg.message_text,
            })
        }
        ServerMessage::Whisper(msg) => Some(TransportEvent::Message {
            target: msg.sender.login.clone(),
            context: MessageContext::whisper(&msg.sender.login),
            is_self: msg.sender.login.eq_ignore_ascii_case(bot),
            text: msg.message_text,
        }),
        _ => None,
    }
}

/// A `jtv` PRIVMSG announcing a host. Addressed to the bot, so the event is
/// stamped with the joined `channel` instead of the message target.
fn host_notice(source: &IRCMessage, channel: &str) -> Option<TransportEvent> {
    let from_jtv = matches!(
        &source.prefix,
        Some(IRCPrefix::Full { nick, .. }) if nick == HOST_NOTICE_SENDER
    );
    if !from_jtv || source.command != "PRIVMSG" {
        return None;
    }
    parse_host_notice(channel, source.params.get(1)?)
}

/// `"Bob is now hosting you for 12 viewers."` / `"Bob is now auto hosting you for up to 3 viewers."`
fn parse_host_notice(channel: &str, text: &str) -> Option<TransportEvent> {
    let (username, rest) = text.split_once(" is now ")?;
    if username.is_empty() || username.contains(char::is_whitespace) {
        return None;
    }
    let (autohost, rest) = match rest.strip_prefix("auto ") {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let rest = rest.strip_prefix("hosting you")?;
    let viewers = rest
        .split_whitespace()
        .find_map(|word| word.parse().ok())
        .unwrap_or(0);

    Some(TransportEvent::Hosted {
        channel: channel.to_string(),
        username: username.to_string(),
        viewers,
        autohost,
    })
}

/// Lines to send for `text`: one PRIVMSG per non-empty line.
fn chat_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim_end).filter(|l| !l.is_empty())
}

struct Connection {
    client: IrcClient,
    reader: JoinHandle<()>,
}

pub struct TwitchClient {
    config: Configuration,
    settings: TwitchConfig,
    sink: EventSink,
    connection: Mutex<Option<Connection>>,
}

impl TwitchClient {
    pub fn new(config: Configuration, settings: TwitchConfig, sink: EventSink) -> Self {
        Self {
            config,
            settings,
            sink,
            connection: Mutex::new(None),
        }
    }

    fn credentials(&self) -> StaticLoginCredentials {
        let token = self.config.oauth_token.trim();
        let token = token.strip_prefix("oauth:").unwrap_or(token);
        StaticLoginCredentials::new(
            self.config.bot_username.to_lowercase(),
            Some(token.to_string()),
        )
    }

    async fn client(&self) -> Result<IrcClient> {
        match self.connection.lock().await.as_ref() {
            Some(connection) => Ok(connection.client.clone()),
            None => bail!("Not connected"),
        }
    }

    async fn privmsg(&self, channel: &str, text: &str) -> Result<()> {
        let client = self.client().await?;
        let login = channel.trim_start_matches('#').to_string();
        for line in chat_lines(text) {
            client
                .privmsg(login.clone(), line.to_string())
                .await
                .map_err(|e| anyhow!("Failed to send to #{login}: {e}"))?;
        }
        Ok(())
    }
}

async fn read_loop(
    mut incoming: UnboundedReceiver<ServerMessage>,
    sink: EventSink,
    bot: String,
    channel: String,
) {
    while let Some(message) = incoming.recv().await {
        tracing::trace!("< {:?}", message);
        let Some(event) = translate(message, &bot, &channel) else {
            continue;
        };
        if !sink.emit(event) {
            return;
        }
    }
    tracing::debug!("Session {} message stream ended", sink.session());
    sink.emit(TransportEvent::Disconnected {
        reason: CLOSED_BY_PEER.to_string(),
    });
}

#[async_trait]
impl ChatTransport for TwitchClient {
    async fn connect(&self) -> Result<()> {
        let mut guard = self.connection.lock().await;
        if let Some(connection) = guard.as_ref() {
            connection.client.connect().await;
            return Ok(());
        }

        let mut client_config = ClientConfig::new_simple(self.credentials());
        client_config.connect_timeout = Duration::from_secs(self.settings.connect_timeout_secs);
        let (incoming, client) = IrcClient::new(client_config);

        let channel = self.config.channel();
        client
            .join(self.config.owner().to_lowercase())
            .map_err(|e| anyhow!("Cannot join {channel}: {e:?}"))?;
        client.connect().await;

        let reader = tokio::spawn(read_loop(
            incoming,
            self.sink.clone(),
            self.config.bot_username.to_lowercase(),
            channel,
        ));
        *guard = Some(Connection { client, reader });
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        let Some(connection) = self.connection.lock().await.take() else {
            return Ok(());
        };
        connection.reader.abort();
        drop(connection.client);
        self.sink.emit(TransportEvent::Disconnected {
            reason: CLOSED_BY_REQUEST.to_string(),
        });
        Ok(())
    }

    async fn say(&self, target: &str, text: &str) -> Result<()> {
        tracing::info!("Bot sending message to {}: {}", target, text);
        self.privmsg(target, text).await
    }

    async fn whisper(&self, target: &str, text: &str) -> Result<()> {
        let user = target.trim_start_matches('#');
        tracing::info!("Bot whispering {}: {}", user, text);
        let whispers = chat_lines(text)
            .map(|line| format!("/w {user} {line}"))
            .collect::<Vec<_>>()
            .join("\n");
        self.privmsg(&self.config.channel(), &whispers).await
    }
}

/// Builds a `TwitchClient` per session.
pub struct TwitchFactory {
    settings: TwitchConfig,
}

impl TwitchFactory {
    pub fn new(settings: TwitchConfig) -> Self {
        Self { settings }
    }
}

impl TransportFactory for TwitchFactory {
    fn create(&self, config: &Configuration, events: EventSink) -> Arc<dyn ChatTransport> {
        Arc::new(TwitchClient::new(config.clone(), self.settings.clone(), events))
    }
}
