//! Blocking facade over the async [`Bot`](crate::Bot): owns a private tokio
//! runtime and drives the async client on it, so callers without a runtime of
//! their own get the same API synchronously.

use egram_core::types::{
    AllowedUpdate, BotCommand, BotCommandScope, ChatAction, ChatTarget, File, InputFile, Message,
    PollOptionSpec, ReplyMarkup, Update, User,
};
use egram_core::Result;

use crate::bot::{EditMessageOptions, SendMediaOptions, SendMessageOptions, SendPollOptions};

/// Blocking client for the platform's HTTP API.
pub struct Bot {
    inner: crate::Bot,
    runtime: tokio::runtime::Runtime,
}

impl Bot {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::from_async(crate::Bot::new(token))
    }

    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>) -> Result<Self> {
        Self::from_async(crate::Bot::with_api_url(token, api_url))
    }

    /// Constructs and validates the token against `getMe`, like
    /// [`crate::Bot::connect`].
    pub fn connect(token: impl Into<String>) -> Result<Self> {
        let runtime = build_runtime()?;
        let inner = runtime.block_on(crate::Bot::connect(token))?;
        Ok(Self { inner, runtime })
    }

    fn from_async(inner: crate::Bot) -> Result<Self> {
        Ok(Self {
            inner,
            runtime: build_runtime()?,
        })
    }

    /// The wrapped async client, for use from async contexts.
    pub fn as_async(&self) -> &crate::Bot {
        &self.inner
    }

    pub fn get_me(&self) -> Result<User> {
        self.runtime.block_on(self.inner.get_me())
    }

    pub fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
        allowed_updates: &[AllowedUpdate],
    ) -> Result<Vec<Update>> {
        self.runtime
            .block_on(self.inner.get_updates(offset, timeout_secs, allowed_updates))
    }

    pub fn send_message(
        &self,
        chat: impl Into<ChatTarget>,
        text: impl Into<String>,
    ) -> Result<Message> {
        self.runtime.block_on(self.inner.send_message(chat, text))
    }

    pub fn send_message_with(
        &self,
        chat: impl Into<ChatTarget>,
        text: impl Into<String>,
        options: SendMessageOptions,
    ) -> Result<Message> {
        self.runtime
            .block_on(self.inner.send_message_with(chat, text, options))
    }

    pub fn send_photo(
        &self,
        chat: impl Into<ChatTarget>,
        photo: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.runtime
            .block_on(self.inner.send_photo(chat, photo, options))
    }

    pub fn send_audio(
        &self,
        chat: impl Into<ChatTarget>,
        audio: InputFile,
        title: Option<String>,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.runtime
            .block_on(self.inner.send_audio(chat, audio, title, options))
    }

    pub fn send_document(
        &self,
        chat: impl Into<ChatTarget>,
        document: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.runtime
            .block_on(self.inner.send_document(chat, document, options))
    }

    pub fn send_animation(
        &self,
        chat: impl Into<ChatTarget>,
        animation: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.runtime
            .block_on(self.inner.send_animation(chat, animation, options))
    }

    pub fn send_voice(
        &self,
        chat: impl Into<ChatTarget>,
        voice: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.runtime
            .block_on(self.inner.send_voice(chat, voice, options))
    }

    pub fn send_video(
        &self,
        chat: impl Into<ChatTarget>,
        video: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.runtime
            .block_on(self.inner.send_video(chat, video, options))
    }

    pub fn send_video_note(
        &self,
        chat: impl Into<ChatTarget>,
        video_note: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.runtime
            .block_on(self.inner.send_video_note(chat, video_note, options))
    }

    pub fn send_poll(
        &self,
        chat: impl Into<ChatTarget>,
        question: impl Into<String>,
        options: &[PollOptionSpec],
        poll: SendPollOptions,
    ) -> Result<Message> {
        self.runtime
            .block_on(self.inner.send_poll(chat, question, options, poll))
    }

    pub fn send_contact(
        &self,
        chat: impl Into<ChatTarget>,
        phone_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: Option<String>,
        reply_markup: Option<ReplyMarkup>,
        reply_to_message_id: Option<i64>,
    ) -> Result<Message> {
        self.runtime.block_on(self.inner.send_contact(
            chat,
            phone_number,
            first_name,
            last_name,
            reply_markup,
            reply_to_message_id,
        ))
    }

    pub fn send_dice(
        &self,
        chat: impl Into<ChatTarget>,
        emoji: &str,
        reply_markup: Option<ReplyMarkup>,
        reply_to_message_id: Option<i64>,
    ) -> Result<Message> {
        self.runtime
            .block_on(self.inner.send_dice(chat, emoji, reply_markup, reply_to_message_id))
    }

    pub fn send_chat_action(
        &self,
        chat: impl Into<ChatTarget>,
        action: ChatAction,
    ) -> Result<bool> {
        self.runtime
            .block_on(self.inner.send_chat_action(chat, action))
    }

    pub fn answer_callback_query(
        &self,
        query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<bool> {
        self.runtime
            .block_on(self.inner.answer_callback_query(query_id, text, show_alert))
    }

    pub fn delete_message(&self, chat: impl Into<ChatTarget>, message_id: i64) -> Result<bool> {
        self.runtime
            .block_on(self.inner.delete_message(chat, message_id))
    }

    pub fn edit_message_text(
        &self,
        chat: impl Into<ChatTarget>,
        message_id: i64,
        text: impl Into<String>,
        options: EditMessageOptions,
    ) -> Result<bool> {
        self.runtime
            .block_on(self.inner.edit_message_text(chat, message_id, text, options))
    }

    pub fn edit_message_reply_markup(
        &self,
        chat: Option<ChatTarget>,
        message_id: Option<i64>,
        inline_message_id: Option<String>,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<bool> {
        self.runtime.block_on(self.inner.edit_message_reply_markup(
            chat,
            message_id,
            inline_message_id,
            reply_markup,
        ))
    }

    pub fn set_my_commands(
        &self,
        commands: &[BotCommand],
        scope: Option<BotCommandScope>,
        language_code: Option<&str>,
    ) -> Result<bool> {
        self.runtime
            .block_on(self.inner.set_my_commands(commands, scope, language_code))
    }

    pub fn get_file(&self, file_id: &str) -> Result<File> {
        self.runtime.block_on(self.inner.get_file(file_id))
    }

    pub fn download_file(&self, file_path: &str) -> Result<Vec<u8>> {
        self.runtime.block_on(self.inner.download_file(file_path))
    }
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
