use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::chat::Chat;
use super::poll::Poll;
use super::user::User;

/// One inbound or sent message.
///
/// Identity fields are typed; every other payload key (photo, sticker,
/// location, ...) is kept verbatim in `extra` so content-type filters can test
/// for its presence without this crate enumerating the full platform schema.
/// Missing fields resolve to `None`, never to a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message_id: Option<i64>,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub chat: Option<Chat>,
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub poll: Option<Poll>,
    #[serde(default)]
    pub reply_to_message: Option<Box<Message>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Message {
    /// Sender id, when the payload carried one.
    pub fn user_id(&self) -> Option<i64> {
        self.from.as_ref().and_then(|u| u.id)
    }

    pub fn chat_id(&self) -> Option<i64> {
        self.chat.as_ref().and_then(|c| c.id)
    }

    /// Chat type tag (`private`, `group`, ...), when known.
    pub fn chat_type(&self) -> Option<&str> {
        self.chat.as_ref().and_then(|c| c.kind.as_deref())
    }

    /// Message timestamp as UTC, when the payload carried one.
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        self.date.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Whether the given content type is present on this message.
    ///
    /// Typed fields are checked directly; everything else is looked up in the
    /// raw payload, where a key counts as present unless its value is `null`
    /// or `false`.
    pub fn has_content(&self, content_type: ContentType) -> bool {
        match content_type {
            ContentType::Any => true,
            ContentType::Text => self.text.is_some(),
            ContentType::Poll => self.poll.is_some(),
            other => self
                .extra
                .get(other.key())
                .map(|v| !v.is_null() && *v != Value::Bool(false))
                .unwrap_or(false),
        }
    }
}

/// Content type selectors for message handler filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Photo,
    Video,
    Audio,
    Document,
    Animation,
    Voice,
    VideoNote,
    Location,
    Contact,
    Sticker,
    Poll,
    Dice,
    Game,
    Invoice,
    Venue,
    /// Wildcard: matches any message.
    Any,
}

impl ContentType {
    /// The payload key this content type corresponds to.
    pub fn key(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Photo => "photo",
            ContentType::Video => "video",
            ContentType::Audio => "audio",
            ContentType::Document => "document",
            ContentType::Animation => "animation",
            ContentType::Voice => "voice",
            ContentType::VideoNote => "video_note",
            ContentType::Location => "location",
            ContentType::Contact => "contact",
            ContentType::Sticker => "sticker",
            ContentType::Poll => "poll",
            ContentType::Dice => "dice",
            ContentType::Game => "game",
            ContentType::Invoice => "invoice",
            ContentType::Venue => "venue",
            ContentType::Any => "any",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_payload_decodes() {
        let msg: Message = serde_json::from_value(json!({})).unwrap();
        assert!(msg.message_id.is_none());
        assert!(msg.user_id().is_none());
        assert!(msg.chat_type().is_none());
    }

    #[test]
    fn test_has_content_typed_and_raw() {
        let msg: Message = serde_json::from_value(json!({
            "message_id": 1,
            "text": "hi",
            "photo": [{"file_id": "abc"}]
        }))
        .unwrap();
        assert!(msg.has_content(ContentType::Text));
        assert!(msg.has_content(ContentType::Photo));
        assert!(!msg.has_content(ContentType::Sticker));
        assert!(msg.has_content(ContentType::Any));
    }

    #[test]
    fn test_reply_to_message_is_recursive() {
        let msg: Message = serde_json::from_value(json!({
            "message_id": 2,
            "text": "reply",
            "reply_to_message": {"message_id": 1, "text": "original"}
        }))
        .unwrap();
        let quoted = msg.reply_to_message.unwrap();
        assert_eq!(quoted.message_id, Some(1));
        assert_eq!(quoted.text.as_deref(), Some("original"));
    }
}
