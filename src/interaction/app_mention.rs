//! Replies to `@`-mentions of the bot.

use tracing::instrument;

use crate::base::{replies, types::Res};

use super::dispatch::{InboundEvent, Reply};

/// Greets whoever mentioned the bot, in the same channel.
#[instrument(skip_all)]
pub fn handle_app_mention(event: &InboundEvent) -> Res<Reply> {
    let user = event.str_field("user")?;

    Ok(Reply::Say(replies::mention_greeting(user)))
}
