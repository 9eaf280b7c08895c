//! Event handling and user interactions for calm-bot.
//!
//! This module provides:
//! - The dispatcher that maps event keys to handlers
//! - The three handlers (calm command, app mention, message)
//! - Delivery of handler replies back to the chat platform

pub mod app_mention;
pub mod calm_command;
pub mod dispatch;
pub mod message;

use tracing::{Instrument, error, instrument};

use crate::{
    base::{config::Config, types::Res},
    service::chat::ChatClient,
};

pub use dispatch::{Dispatcher, EventKey, InboundEvent, Reply};

/// Builds the dispatcher with every handler the bot answers to.
pub fn dispatcher(config: &Config) -> Dispatcher {
    Dispatcher::new()
        .on(EventKey::command(config.calm_command.clone()), calm_command::handle_calm_command)
        .on(EventKey::AppMention, app_mention::handle_app_mention)
        .on(EventKey::Message, message::handle_message)
}

/// Dispatches the event and delivers the reply.
///
/// `Say` replies are posted to the event's channel. `Ack` replies are handed
/// back to the caller, which owns the acknowledgment of the request.
#[instrument(skip_all, fields(key = %event.key))]
pub async fn handle_event(dispatcher: &Dispatcher, event: &InboundEvent, chat: &ChatClient) -> Res<Option<String>> {
    match dispatcher.dispatch(event)? {
        None => Ok(None),
        Some(Reply::Ack(text)) => Ok(Some(text)),
        Some(Reply::Say(text)) => {
            chat.say(event.channel()?, &text).await?;
            Ok(None)
        }
    }
}

/// Handles the event on its own task, logging any failure.
#[instrument(skip_all)]
pub fn spawn_event(dispatcher: Dispatcher, event: InboundEvent, chat: ChatClient) {
    tokio::spawn(
        async move {
            // Process the event.
            let result = handle_event(&dispatcher, &event, &chat).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling {}: {}", event.key, err);
            }
        }
        .in_current_span(),
    );
}
