//! The calm slash command.

use tracing::instrument;

use crate::base::{replies, types::Res};

use super::dispatch::{InboundEvent, Reply};

/// Acknowledges the command, thanking the user who invoked it.
#[instrument(skip_all)]
pub fn handle_calm_command(event: &InboundEvent) -> Res<Reply> {
    let user_id = event.str_field("user_id")?;

    Ok(Reply::Ack(replies::calm_acknowledgment(user_id)))
}
