//! Event keys, inbound events, and the handler registry.

use std::{collections::HashMap, fmt, sync::Arc};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::base::types::Res;

// Types.

/// A handler turns one inbound event into one reply.
pub type Handler = fn(&InboundEvent) -> Res<Reply>;

/// The key a handler is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// A slash command, keyed by its name including the leading `/`.
    Command(String),
    /// The bot was `@`-mentioned in a channel.
    AppMention,
    /// A message was sent to the bot.
    Message,
}

impl EventKey {
    /// Key for the slash command `name`, e.g. `/calm`.
    pub fn command(name: impl Into<String>) -> Self {
        Self::Command(name.into())
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Command(name) => write!(f, "command `{name}`"),
            EventKey::AppMention => write!(f, "app_mention"),
            EventKey::Message => write!(f, "message"),
        }
    }
}

/// A single event delivered by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub key: EventKey,
    pub body: Map<String, Value>,
}

impl InboundEvent {
    /// Builds an event from anything that serializes to a JSON object.
    pub fn from_serialize<T: Serialize>(key: EventKey, payload: &T) -> Res<Self> {
        match serde_json::to_value(payload)? {
            Value::Object(body) => Ok(Self { key, body }),
            other => Err(anyhow::anyhow!("Payload for {} is not an object: {}", key, other)),
        }
    }

    /// Returns the string field `name`, failing if it is absent or not a string.
    pub fn str_field(&self, name: &str) -> Res<&str> {
        self.body
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("Event {} is missing string field `{}`.", self.key, name))
    }

    /// The channel the event happened in.
    pub fn channel(&self) -> Res<&str> {
        self.str_field("channel")
    }
}

/// What a handler wants sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Returned as the acknowledgment of the request (slash commands).
    Ack(String),
    /// Posted publicly to the event's channel.
    Say(String),
}

impl Reply {
    /// The reply text, however it is delivered.
    pub fn text(&self) -> &str {
        match self {
            Reply::Ack(text) | Reply::Say(text) => text,
        }
    }
}

// Structs.

/// Maps event keys to handlers.
///
/// Cloning is cheap; the registry is shared and immutable once built.
#[derive(Clone, Default)]
pub struct Dispatcher {
    handlers: Arc<HashMap<EventKey, Handler>>,
}

impl Dispatcher {
    /// An empty registry; see [`crate::interaction::dispatcher`] for the bot's handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `key`, replacing any earlier registration.
    pub fn on(mut self, key: EventKey, handler: Handler) -> Self {
        let handlers = Arc::make_mut(&mut self.handlers);

        if handlers.insert(key.clone(), handler).is_some() {
            warn!("Replacing the handler registered for {}.", key);
        }

        self
    }

    /// Whether a handler is registered under `key`.
    pub fn handles(&self, key: &EventKey) -> bool {
        self.handlers.contains_key(key)
    }

    /// Runs the handler registered for the event's key, if any.
    #[instrument(skip_all, fields(key = %event.key))]
    pub fn dispatch(&self, event: &InboundEvent) -> Res<Option<Reply>> {
        let Some(handler) = self.handlers.get(&event.key) else {
            warn!("Unknown event: {}", event.key);
            return Ok(None);
        };

        let reply = handler(event)?;
        debug!("Handler replied: {}", reply.text());

        Ok(Some(reply))
    }
}
