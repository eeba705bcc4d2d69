//! Entity types for the platform's API: updates, messages, callback queries,
//! polls, users, chats, keyboards, commands, and files.

mod callback;
mod chat;
mod command;
mod file;
mod format;
mod keyboard;
mod message;
mod poll;
mod update;
mod user;

pub use callback::CallbackQuery;
pub use chat::{Chat, ChatTarget, ChatType};
pub use command::{BotCommand, BotCommandScope};
pub use file::{File, InputFile};
pub use format::{ChatAction, ParseMode};
pub use keyboard::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, ReplyKeyboardMarkup, ReplyMarkup,
};
pub use message::{ContentType, Message};
pub use poll::{Poll, PollAnswer, PollOption, PollOptionSpec};
pub use update::{AllowedUpdate, Update};
pub use user::User;
