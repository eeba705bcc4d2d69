//! # egram-client
//!
//! HTTP client for the platform's Bot API: the reqwest-backed transport with
//! envelope classification, the async [`Bot`] with one method per endpoint,
//! a [`blocking`] facade, and minimal environment-based configuration.

pub mod blocking;
mod bot;
mod config;
mod transport;

pub use bot::{
    Bot, EditMessageOptions, PollKind, SendMediaOptions, SendMessageOptions, SendPollOptions,
    DICE_EMOJI,
};
pub use config::BotConfig;
pub use transport::Request;
