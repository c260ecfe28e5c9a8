//! Assistant chat messages.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::wire::lenient_string;

/// Greeting shown when there is no stored conversation.
pub const WELCOME: &str = "Hi! I'm your liftlog assistant. How can I help you today?";

/// Greeting shown after the history has been cleared.
pub const WELCOME_AGAIN: &str = "Hi! I'm your liftlog assistant. How can I help you now?";

/// Shown in place of a reply when the assistant could not be reached.
pub const REPLY_FAILED: &str = "Sorry, something went wrong. Please try again.";

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    #[default]
    Assistant,
    System,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        }
    }
}

// Anything the client did not write itself is shown as the assistant's.
impl<'de> Deserialize<'de> for ChatRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value.as_ref().and_then(Value::as_str).map(str::trim) {
            Some(role) if role.eq_ignore_ascii_case("user") => ChatRole::User,
            Some(role) if role.eq_ignore_ascii_case("system") => ChatRole::System,
            _ => ChatRole::Assistant,
        })
    }
}

/// One turn of the conversation, as stored by `/chat/history/{userId}`
/// and sent back whole to `/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, alias = "rol")]
    pub role: ChatRole,
    #[serde(
        default,
        alias = "contenido",
        alias = "message",
        deserialize_with = "lenient_string"
    )]
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// POST `/chat` body.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: &'a [ChatMessage],
    #[serde(rename = "userId")]
    pub user_id: u64,
}

/// POST `/chat` response: `{role, reply}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub role: ChatRole,
    #[serde(default, alias = "content", deserialize_with = "lenient_string")]
    pub reply: String,
}

impl From<ChatReply> for ChatMessage {
    fn from(reply: ChatReply) -> Self {
        Self {
            role: reply.role,
            content: reply.reply,
        }
    }
}
