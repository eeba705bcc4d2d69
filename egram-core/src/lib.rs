//! # egram-core
//!
//! Core types and traits for the egram Telegram Bot API client: entity types,
//! the error taxonomy, the [`UpdateSource`] seam consumed by the dispatcher,
//! HTML helpers, and tracing initialization. No I/O lives here.

pub mod error;
pub mod html;
pub mod logger;
pub mod source;
pub mod types;

pub use error::{ApiError, EgramError, Result, StateError, ValidationError};
pub use logger::init_tracing;
pub use source::UpdateSource;
pub use types::{
    AllowedUpdate, BotCommand, BotCommandScope, CallbackQuery, Chat, ChatAction, ChatTarget,
    ChatType, ContentType, File, InlineKeyboardButton, InlineKeyboardMarkup, InputFile,
    KeyboardButton, Message, ParseMode, Poll, PollAnswer, PollOption, PollOptionSpec,
    ReplyKeyboardMarkup, ReplyMarkup, Update, User,
};
