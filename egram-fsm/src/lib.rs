//! # egram-fsm
//!
//! Minimal per-user finite-state-machine support for conversation flows:
//! value-type [`StateTag`]s declared with [`states_group!`], the shared
//! [`StateStore`], and the per-user [`FsmContext`] handle the dispatcher
//! passes to handlers.

mod context;
mod state;
mod store;

pub use context::FsmContext;
pub use state::StateTag;
pub use store::{StateStore, UserStateRecord};
