//! Turns one raw update into its typed event.

use egram_core::types::{CallbackQuery, Message, Poll, PollAnswer, Update};

/// A classified update, ready for routing.
#[derive(Debug, Clone)]
pub enum Event {
    Message(Message),
    CallbackQuery(CallbackQuery),
    Poll(Poll),
    PollAnswer(PollAnswer),
}

/// Classifies by the first present payload key, in priority order
/// message > callback_query > poll > poll_answer. Callback queries are
/// normalized (chat back-filled from the quoted message). Returns `None` for
/// updates carrying none of the four payloads.
pub fn classify(update: Update) -> Option<Event> {
    if let Some(message) = update.message {
        return Some(Event::Message(message));
    }
    if let Some(query) = update.callback_query {
        return Some(Event::CallbackQuery(query.normalized()));
    }
    if let Some(poll) = update.poll {
        return Some(Event::Poll(poll));
    }
    if let Some(answer) = update.poll_answer {
        return Some(Event::PollAnswer(answer));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_prefers_message() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 1,
            "message": {"message_id": 10, "text": "hi"},
            "callback_query": {"id": "q"}
        }))
        .unwrap();
        assert!(matches!(classify(update), Some(Event::Message(_))));
    }

    #[test]
    fn test_callback_query_is_normalized() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 2,
            "callback_query": {
                "id": "q",
                "from": {"id": 9},
                "message": {"message_id": 1, "chat": {"id": 42, "type": "group"}},
                "data": "d"
            }
        }))
        .unwrap();
        match classify(update) {
            Some(Event::CallbackQuery(query)) => {
                assert_eq!(query.chat_id(), Some(42));
                assert_eq!(query.chat_type(), Some("group"));
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_empty_update_classifies_to_none() {
        let update: Update = serde_json::from_value(json!({"update_id": 3})).unwrap();
        assert!(classify(update).is_none());
    }

    #[test]
    fn test_poll_and_poll_answer() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 4,
            "poll": {"id": "p1", "question": "?"}
        }))
        .unwrap();
        assert!(matches!(classify(update), Some(Event::Poll(_))));

        let update: Update = serde_json::from_value(json!({
            "update_id": 5,
            "poll_answer": {"poll_id": "p1", "user": {"id": 3}, "option_ids": [0]}
        }))
        .unwrap();
        assert!(matches!(classify(update), Some(Event::PollAnswer(_))));
    }
}
