//! Handler registrations: callbacks with their matching constraints.
//!
//! A callback's signature is fixed at registration time (event-only or
//! event+context), so dispatch never inspects the target.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use egram_core::types::{CallbackQuery, ChatType, ContentType, Message, Poll, PollAnswer};
use egram_core::Result;
use egram_fsm::{FsmContext, StateTag};

pub type EventFuture = BoxFuture<'static, Result<()>>;

/// Custom filter predicate evaluated before the built-in constraints.
pub type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// A registered callback. Handlers that want FSM access register the
/// two-argument form; everyone else gets the event alone.
pub enum Callback<E> {
    Event(Arc<dyn Fn(E) -> EventFuture + Send + Sync>),
    EventWithFsm(Arc<dyn Fn(E, FsmContext) -> EventFuture + Send + Sync>),
}

impl<E> Clone for Callback<E> {
    fn clone(&self) -> Self {
        match self {
            Callback::Event(f) => Callback::Event(f.clone()),
            Callback::EventWithFsm(f) => Callback::EventWithFsm(f.clone()),
        }
    }
}

impl<E: Send + 'static> Callback<E> {
    /// Wraps an async function taking the event alone.
    pub fn event<F, Fut>(f: F) -> Self
    where
        F: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Callback::Event(Arc::new(move |event| Box::pin(f(event))))
    }

    /// Wraps an async function taking the event and an [`FsmContext`].
    pub fn with_fsm<F, Fut>(f: F) -> Self
    where
        F: Fn(E, FsmContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Callback::EventWithFsm(Arc::new(move |event, fsm| Box::pin(f(event, fsm))))
    }

    pub(crate) fn call(&self, event: E, fsm: FsmContext) -> EventFuture {
        match self {
            Callback::Event(f) => f(event),
            Callback::EventWithFsm(f) => f(event, fsm),
        }
    }
}

/// Command constraint. The two source forms behave differently and both are
/// kept: a single command is a prefix match on the text, a list matches the
/// first whitespace-separated token exactly.
#[derive(Debug, Clone)]
pub enum CommandSelector {
    Single(String),
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub enum ContentTypeSelector {
    Single(ContentType),
    List(Vec<ContentType>),
}

#[derive(Debug, Clone)]
pub enum ChatTypeSelector {
    Single(ChatType),
    List(Vec<ChatType>),
}

/// Matching constraints for message handlers.
#[derive(Clone, Default)]
pub struct MessageFilter {
    pub(crate) predicate: Option<Predicate<Message>>,
    pub(crate) commands: Option<CommandSelector>,
    pub(crate) content_types: Option<ContentTypeSelector>,
    pub(crate) chat_types: Option<ChatTypeSelector>,
    pub(crate) state: Option<StateTag>,
}

impl MessageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Message) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(f));
        self
    }

    /// Single command: matches text starting with `/name`.
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.commands = Some(CommandSelector::Single(command.into()));
        self
    }

    /// Command list: matches when the first token equals `/name` for one of
    /// the listed names.
    pub fn commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands = Some(CommandSelector::List(
            commands.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_types = Some(ContentTypeSelector::Single(content_type));
        self
    }

    pub fn content_types<I>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = ContentType>,
    {
        self.content_types = Some(ContentTypeSelector::List(
            content_types.into_iter().collect(),
        ));
        self
    }

    pub fn chat_type(mut self, chat_type: ChatType) -> Self {
        self.chat_types = Some(ChatTypeSelector::Single(chat_type));
        self
    }

    pub fn chat_types<I>(mut self, chat_types: I) -> Self
    where
        I: IntoIterator<Item = ChatType>,
    {
        self.chat_types = Some(ChatTypeSelector::List(chat_types.into_iter().collect()));
        self
    }

    pub fn state(mut self, state: StateTag) -> Self {
        self.state = Some(state);
        self
    }
}

/// Matching constraints for callback-query handlers.
#[derive(Clone, Default)]
pub struct CallbackFilter {
    pub(crate) predicate: Option<Predicate<CallbackQuery>>,
    pub(crate) chat_types: Option<ChatTypeSelector>,
    pub(crate) state: Option<StateTag>,
}

impl CallbackFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&CallbackQuery) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(f));
        self
    }

    pub fn chat_type(mut self, chat_type: ChatType) -> Self {
        self.chat_types = Some(ChatTypeSelector::Single(chat_type));
        self
    }

    pub fn chat_types<I>(mut self, chat_types: I) -> Self
    where
        I: IntoIterator<Item = ChatType>,
    {
        self.chat_types = Some(ChatTypeSelector::List(chat_types.into_iter().collect()));
        self
    }

    pub fn state(mut self, state: StateTag) -> Self {
        self.state = Some(state);
        self
    }
}

/// Matching constraints for poll handlers.
#[derive(Clone, Default)]
pub struct PollFilter {
    pub(crate) predicate: Option<Predicate<Poll>>,
}

impl PollFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Poll) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(f));
        self
    }
}

/// Matching constraints for poll-answer handlers.
#[derive(Clone, Default)]
pub struct PollAnswerFilter {
    pub(crate) predicate: Option<Predicate<PollAnswer>>,
    pub(crate) state: Option<StateTag>,
}

impl PollAnswerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&PollAnswer) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(f));
        self
    }

    pub fn state(mut self, state: StateTag) -> Self {
        self.state = Some(state);
        self
    }
}

pub(crate) struct MessageRegistration {
    pub filter: MessageFilter,
    pub callback: Callback<Message>,
}

pub(crate) struct CallbackRegistration {
    pub filter: CallbackFilter,
    pub callback: Callback<CallbackQuery>,
}

pub(crate) struct PollRegistration {
    pub filter: PollFilter,
    pub callback: Callback<Poll>,
}

pub(crate) struct PollAnswerRegistration {
    pub filter: PollAnswerFilter,
    pub callback: Callback<PollAnswer>,
}
