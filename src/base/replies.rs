//! Reply templates.

/// Fixed reply to any direct message.
pub const MESSAGE_REPLY: &str = "Haha, yeah.";

/// Acknowledgment sent back for the calm slash command.
pub fn calm_acknowledgment(user_id: &str) -> String {
    format!("Thanks <@{user_id}>. I feel better now!")
}

/// Public greeting posted when someone mentions the bot.
pub fn mention_greeting(user: &str) -> String {
    format!("Hi <@{user}>!")
}
