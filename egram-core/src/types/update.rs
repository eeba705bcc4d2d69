use serde::{Deserialize, Serialize};

use super::callback::CallbackQuery;
use super::message::Message;
use super::poll::{Poll, PollAnswer};

/// One inbound event from the long-poll feed. The platform delivers exactly
/// one payload key per update; all are optional here so partial or unknown
/// payloads still decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
    #[serde(default)]
    pub poll: Option<Poll>,
    #[serde(default)]
    pub poll_answer: Option<PollAnswer>,
}

/// Update categories for the long-poll allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowedUpdate {
    Message,
    CallbackQuery,
    Poll,
    PollAnswer,
}

impl AllowedUpdate {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllowedUpdate::Message => "message",
            AllowedUpdate::CallbackQuery => "callback_query",
            AllowedUpdate::Poll => "poll",
            AllowedUpdate::PollAnswer => "poll_answer",
        }
    }

    /// The default allow-list: every category the dispatcher routes.
    pub fn all() -> Vec<AllowedUpdate> {
        vec![
            AllowedUpdate::Message,
            AllowedUpdate::CallbackQuery,
            AllowedUpdate::Poll,
            AllowedUpdate::PollAnswer,
        ]
    }
}
