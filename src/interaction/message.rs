//! Replies to direct messages.

use serde_json::{Map, Value};
use tracing::instrument;

use crate::base::{replies, types::Res};

use super::dispatch::{InboundEvent, Reply};

/// Replies with the same line whatever was said.
#[instrument(skip_all)]
pub fn handle_message(_event: &InboundEvent) -> Res<Reply> {
    Ok(Reply::Say(replies::MESSAGE_REPLY.to_string()))
}

/// Whether a message was posted by a bot, including this one.
///
/// The bot's own replies come back as message events; answering them would loop.
///
/// Edits (`message_changed`) carry the author on the nested `message` instead.
pub fn is_bot_message(event: &InboundEvent, bot_user_id: &str) -> bool {
    let posted_by_bot = |fields: &Map<String, Value>| {
        let has_bot_id = fields.get("bot_id").is_some_and(|id| !id.is_null());
        let from_self = fields.get("user").and_then(Value::as_str) == Some(bot_user_id);

        has_bot_id || from_self
    };

    let nested = event.body.get("message").and_then(Value::as_object);

    posted_by_bot(&event.body) || nested.is_some_and(posted_by_bot)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::interaction::dispatch::EventKey;

    fn message(body: serde_json::Value) -> InboundEvent {
        InboundEvent::from_serialize(EventKey::Message, &body).unwrap()
    }

    #[test]
    fn replies_regardless_of_content() {
        for body in [json!({}), json!({ "text": "how are you?", "user": "U1" }), json!({ "text": 12 })] {
            assert_eq!(handle_message(&message(body)).unwrap(), Reply::Say("Haha, yeah.".to_string()));
        }
    }

    #[test]
    fn detects_bot_messages() {
        assert!(is_bot_message(&message(json!({ "bot_id": "B1", "text": "Haha, yeah." })), "UBOT"));
        assert!(is_bot_message(&message(json!({ "user": "UBOT" })), "UBOT"));
    }

    #[test]
    fn detects_edits_of_bot_messages() {
        let edit = message(json!({
            "subtype": "message_changed",
            "channel": "D1",
            "ts": "1700000001.000200",
            "message": { "user": "UBOT", "text": "Haha, yeah!", "ts": "1700000000.000100" },
            "previous_message": { "user": "UBOT", "text": "Haha, yeah.", "ts": "1700000000.000100" },
        }));

        assert!(is_bot_message(&edit, "UBOT"));
        assert!(is_bot_message(&message(json!({ "message": { "bot_id": "B1" } })), "UBOT"));
        assert!(!is_bot_message(&message(json!({ "message": { "user": "U1" } })), "UBOT"));
    }

    #[test]
    fn user_messages_are_not_bot_messages() {
        assert!(!is_bot_message(&message(json!({ "user": "U1", "bot_id": null })), "UBOT"));
        assert!(!is_bot_message(&message(json!({})), "UBOT"));
    }
}
