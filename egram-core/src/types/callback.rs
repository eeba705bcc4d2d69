use serde::{Deserialize, Serialize};

use super::chat::Chat;
use super::message::Message;
use super::user::User;

/// An inline-keyboard button press.
///
/// The raw payload does not duplicate the chat at the top level; after
/// decoding, [`CallbackQuery::normalized`] back-fills `chat` from the quoted
/// message and stamps the pressing user onto that message's sender, so
/// downstream state matching keys on the user who pressed the button.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub message: Option<Box<Message>>,
    #[serde(default)]
    pub data: Option<String>,
    /// Back-filled from the quoted message's chat; absent in the raw payload.
    #[serde(skip)]
    pub chat: Option<Chat>,
}

impl CallbackQuery {
    /// Copies the quoted message's chat to the top level and overwrites the
    /// quoted message's sender with the pressing user.
    pub fn normalized(mut self) -> Self {
        if let Some(message) = self.message.as_mut() {
            self.chat = message.chat.clone();
            if let Some(from) = self.from.as_ref() {
                message.from = Some(from.clone());
            }
        }
        self
    }

    /// Id of the user who pressed the button.
    pub fn user_id(&self) -> Option<i64> {
        self.from.as_ref().and_then(|u| u.id)
    }

    pub fn chat_id(&self) -> Option<i64> {
        self.chat.as_ref().and_then(|c| c.id)
    }

    pub fn chat_type(&self) -> Option<&str> {
        self.chat.as_ref().and_then(|c| c.kind.as_deref())
    }
}
