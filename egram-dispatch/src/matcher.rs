//! Filter evaluation: fixed precedence, short-circuit on the first miss.
//!
//! Message order is predicate → commands → content types → chat type →
//! state. The other categories run the applicable subset in the same order.

use egram_core::types::{CallbackQuery, Message, Poll, PollAnswer};
use egram_fsm::{StateStore, StateTag};

use crate::registry::{
    CallbackFilter, ChatTypeSelector, CommandSelector, ContentTypeSelector, MessageFilter,
    PollAnswerFilter, PollFilter,
};

pub(crate) fn message_matches(
    filter: &MessageFilter,
    message: &Message,
    store: &StateStore,
) -> bool {
    if let Some(predicate) = &filter.predicate {
        if !predicate(message) {
            return false;
        }
    }
    if let Some(selector) = &filter.commands {
        if !command_matches(selector, message.text.as_deref()) {
            return false;
        }
    }
    if let Some(selector) = &filter.content_types {
        if !content_type_matches(selector, message) {
            return false;
        }
    }
    if let Some(selector) = &filter.chat_types {
        if !chat_type_matches(selector, message.chat_type()) {
            return false;
        }
    }
    if let Some(required) = filter.state {
        if !state_matches(required, message.user_id(), store) {
            return false;
        }
    }
    true
}

pub(crate) fn callback_matches(
    filter: &CallbackFilter,
    query: &CallbackQuery,
    store: &StateStore,
) -> bool {
    if let Some(predicate) = &filter.predicate {
        if !predicate(query) {
            return false;
        }
    }
    if let Some(selector) = &filter.chat_types {
        if !chat_type_matches(selector, query.chat_type()) {
            return false;
        }
    }
    if let Some(required) = filter.state {
        if !state_matches(required, query.user_id(), store) {
            return false;
        }
    }
    true
}

pub(crate) fn poll_matches(filter: &PollFilter, poll: &Poll) -> bool {
    match &filter.predicate {
        Some(predicate) => predicate(poll),
        None => true,
    }
}

pub(crate) fn poll_answer_matches(
    filter: &PollAnswerFilter,
    answer: &PollAnswer,
    store: &StateStore,
) -> bool {
    if let Some(predicate) = &filter.predicate {
        if !predicate(answer) {
            return false;
        }
    }
    if let Some(required) = filter.state {
        if !state_matches(required, answer.user_id(), store) {
            return false;
        }
    }
    true
}

fn command_matches(selector: &CommandSelector, text: Option<&str>) -> bool {
    let Some(text) = text else {
        return false;
    };
    match selector {
        CommandSelector::Single(command) => text.starts_with(&format!("/{}", command)),
        CommandSelector::List(commands) => {
            let Some(first) = text.split_whitespace().next() else {
                return false;
            };
            commands.iter().any(|command| first == format!("/{}", command))
        }
    }
}

fn content_type_matches(selector: &ContentTypeSelector, message: &Message) -> bool {
    match selector {
        ContentTypeSelector::Single(content_type) => message.has_content(*content_type),
        ContentTypeSelector::List(content_types) => content_types
            .iter()
            .any(|content_type| message.has_content(*content_type)),
    }
}

fn chat_type_matches(selector: &ChatTypeSelector, kind: Option<&str>) -> bool {
    let Some(kind) = kind else {
        return false;
    };
    match selector {
        ChatTypeSelector::Single(chat_type) => kind == chat_type.as_str(),
        ChatTypeSelector::List(chat_types) => {
            chat_types.iter().any(|chat_type| kind == chat_type.as_str())
        }
    }
}

/// Requires an existing record whose tag equals the wanted one; users with no
/// record never match.
fn state_matches(required: StateTag, user_id: Option<i64>, store: &StateStore) -> bool {
    let Some(user_id) = user_id else {
        return false;
    };
    store.get_tag(user_id) == Some(required)
}
