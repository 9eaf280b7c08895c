//! Slack integration for calm-bot.
//!
//! This module connects to Slack over Socket Mode and adapts its callbacks to
//! the interaction layer:
//! - Slash commands are dispatched inline and answered with the acknowledgment
//! - Push events (mentions, messages) are dispatched on their own tasks
//! - Replies are posted with `chat.postMessage`

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::{self, Dispatcher, EventKey, InboundEvent, message},
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{debug, info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config, dispatcher: Dispatcher) -> Res<Self> {
        let client = SlackChatClient::new(config, dispatcher).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    dispatcher: Dispatcher,
    chat: ChatClient,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    app_token: SlackApiToken,
    bot_token: SlackApiToken,
    bot_user_id: String,
    client: Arc<FullClient>,
    dispatcher: Dispatcher,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config, dispatcher: Dispatcher) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;
        let bot_user_id = bot_user.user_id.0;

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self {
            app_token,
            bot_token,
            bot_user_id,
            client,
            dispatcher,
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new()
            .with_command_events(handle_command_event)
            .with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            dispatcher: self.dispatcher.clone(),
            chat: ChatClient::from(self.clone()),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register the app token to open the session.
        socket_mode_listener.listen_for(&self.app_token).await?;

        info!("Listening for Slack events ...");

        // Serves until Ctrl-C, then shuts the connections down.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn say(&self, channel_id: &str, text: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());
        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message);

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}

// Socket mode listener callbacks for Slack.

/// Pulls the shared handles out of the listener's user state.
async fn user_state(states: &SlackClientEventsUserState) -> Res<(Dispatcher, ChatClient)> {
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    Ok((user_state.dispatcher.clone(), user_state.chat.clone()))
}

/// Handles command events from Slack.
#[instrument(skip_all, fields(command = %event.command.0))]
async fn handle_command_event(
    event: SlackCommandEvent,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> Result<SlackCommandEventResponse, Box<dyn std::error::Error + Send + Sync>> {
    info!("Received command event ...");

    let (dispatcher, chat) = user_state(&states).await?;

    let key = EventKey::command(event.command.0.clone());
    if !dispatcher.handles(&key) {
        warn!("No handler is registered for {}.", key);
        return Ok(SlackCommandEventResponse::new(SlackMessageContent::new().with_text(format!("No handler is registered for `{}`.", event.command.0))));
    }

    let inbound = InboundEvent::from_serialize(key, &event)?;
    let text = interaction::handle_event(&dispatcher, &inbound, &chat).await?.unwrap_or_default();

    Ok(SlackCommandEventResponse::new(SlackMessageContent::new().with_text(text)))
}

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (dispatcher, chat) = user_state(&states).await?;

    let inbound = match event_callback.event {
        SlackEventCallbackBody::Message(slack_message_event) => {
            info!("Received message event ...");

            let inbound = InboundEvent::from_serialize(EventKey::Message, &slack_message_event)?;

            // Our own replies arrive as message events too.
            if message::is_bot_message(&inbound, chat.bot_user_id()) {
                debug!("Skipping message event posted by a bot.");
                return Ok(());
            }

            inbound
        }
        SlackEventCallbackBody::AppMention(slack_app_mention_event) => {
            info!("Received app mention event ...");

            InboundEvent::from_serialize(EventKey::AppMention, &slack_app_mention_event)?
        }
        _ => {
            warn!("Received unhandled push event.");
            return Ok(());
        }
    };

    interaction::spawn_event(dispatcher, inbound, chat);

    Ok(())
}
