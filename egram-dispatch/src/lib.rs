//! # egram-dispatch
//!
//! The update dispatch and routing engine: ordered handler registries with
//! predicate matching, one-shot next-step continuations, an event classifier,
//! and the long-polling loop with direct or pooled handler execution. The
//! loop is a hard isolation boundary: handler errors and panics are logged
//! and never reach it.

mod classifier;
mod dispatcher;
mod matcher;
mod registry;

pub use classifier::{classify, Event};
pub use dispatcher::{Dispatcher, ExecutionMode, PollingConfig, DEFAULT_POOL_WORKERS};
pub use registry::{
    Callback, CallbackFilter, ChatTypeSelector, CommandSelector, ContentTypeSelector,
    MessageFilter, PollAnswerFilter, PollFilter,
};
