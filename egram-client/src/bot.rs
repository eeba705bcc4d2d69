//! The `Bot` object: one method per platform endpoint, request validation at
//! the call site, and the [`UpdateSource`] implementation the dispatcher polls.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use egram_core::types::{
    AllowedUpdate, BotCommand, BotCommandScope, ChatAction, ChatTarget, File, InputFile, Message,
    ParseMode, PollOptionSpec, ReplyMarkup, Update, User,
};
use egram_core::{Result, UpdateSource, ValidationError};

use crate::transport::Request;

const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Dice emojis the platform animates; anything else is rejected locally.
pub const DICE_EMOJI: [&str; 6] = ["🎲", "🎯", "🏀", "⚽", "🎳", "🎰"];

/// Options for [`Bot::send_message_with`].
#[derive(Debug, Clone, Default)]
pub struct SendMessageOptions {
    pub reply_markup: Option<ReplyMarkup>,
    pub parse_mode: Option<ParseMode>,
    pub reply_to_message_id: Option<i64>,
    pub disable_web_page_preview: bool,
}

/// Options shared by the media-upload endpoints.
#[derive(Debug, Clone, Default)]
pub struct SendMediaOptions {
    pub caption: Option<String>,
    pub parse_mode: Option<ParseMode>,
    pub reply_markup: Option<ReplyMarkup>,
    pub reply_to_message_id: Option<i64>,
}

/// Poll variant: a regular poll or a quiz with one correct option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollKind {
    Regular,
    Quiz,
}

impl PollKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollKind::Regular => "regular",
            PollKind::Quiz => "quiz",
        }
    }
}

/// Options for [`Bot::send_poll`].
#[derive(Debug, Clone)]
pub struct SendPollOptions {
    pub kind: PollKind,
    pub question_parse_mode: Option<ParseMode>,
    pub is_anonymous: bool,
    pub allows_multiple_answers: bool,
    pub correct_option_id: i64,
    pub explanation: Option<String>,
    pub explanation_parse_mode: Option<ParseMode>,
    pub open_period: Option<i64>,
    pub is_closed: bool,
    pub reply_markup: Option<ReplyMarkup>,
    pub reply_to_message_id: Option<i64>,
}

impl Default for SendPollOptions {
    fn default() -> Self {
        Self {
            kind: PollKind::Regular,
            question_parse_mode: None,
            is_anonymous: true,
            allows_multiple_answers: false,
            correct_option_id: 0,
            explanation: None,
            explanation_parse_mode: None,
            open_period: None,
            is_closed: false,
            reply_markup: None,
            reply_to_message_id: None,
        }
    }
}

/// Options for [`Bot::edit_message_text`].
#[derive(Debug, Clone, Default)]
pub struct EditMessageOptions {
    pub parse_mode: Option<ParseMode>,
    pub reply_markup: Option<ReplyMarkup>,
    pub disable_web_page_preview: bool,
}

/// Asynchronous client for the platform's HTTP API.
#[derive(Debug, Clone)]
pub struct Bot {
    token: String,
    api_url: String,
    request: Request,
}

impl Bot {
    /// Cheap constructor; performs no network call.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    /// Constructor with a custom API server (tests, local API servers).
    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        let api_url = api_url.trim_end_matches('/').to_string();
        Self {
            token: token.into(),
            api_url,
            request: Request::default(),
        }
    }

    /// Constructs and validates the token against `getMe`. Transport and
    /// authorization failures surface to the caller.
    pub async fn connect(token: impl Into<String>) -> Result<Self> {
        Self::connect_with_api_url(token, DEFAULT_API_URL).await
    }

    /// [`Bot::connect`] against a custom API server.
    pub async fn connect_with_api_url(
        token: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Result<Self> {
        let bot = Self::with_api_url(token, api_url);
        let me = bot.get_me().await?;
        info!(
            username = me.username.as_deref().unwrap_or("unknown"),
            "bot authorized"
        );
        Ok(bot)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_url, self.token, file_path)
    }

    pub async fn get_me(&self) -> Result<User> {
        let result = self
            .request
            .get_json(&self.method_url("getMe"), &[] as &[(&str, String)])
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Long-poll fetch. Updates that fail to decode are logged and skipped so
    /// one malformed record cannot wedge the cursor.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
        allowed_updates: &[AllowedUpdate],
    ) -> Result<Vec<Update>> {
        let allowed: Vec<&str> = allowed_updates.iter().map(AllowedUpdate::as_str).collect();
        let params = [
            ("offset", offset.to_string()),
            ("timeout", timeout_secs.to_string()),
            ("allowed_updates", serde_json::to_string(&allowed)?),
        ];
        let result = self
            .request
            .get_json(&self.method_url("getUpdates"), &params)
            .await?;

        let items = match result {
            Value::Array(items) => items,
            other => {
                warn!(?other, "getUpdates result was not an array");
                return Ok(Vec::new());
            }
        };
        let mut updates = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<Update>(item) {
                Ok(update) => updates.push(update),
                Err(e) => warn!(error = %e, "skipping undecodable update"),
            }
        }
        Ok(updates)
    }

    pub async fn send_message(
        &self,
        chat: impl Into<ChatTarget>,
        text: impl Into<String>,
    ) -> Result<Message> {
        self.send_message_with(chat, text, SendMessageOptions::default())
            .await
    }

    pub async fn send_message_with(
        &self,
        chat: impl Into<ChatTarget>,
        text: impl Into<String>,
        options: SendMessageOptions,
    ) -> Result<Message> {
        let chat: ChatTarget = chat.into();
        let text: String = text.into();
        let mut parameters = json!({
            "chat_id": chat,
            "text": text,
            "link_preview_options": { "is_disabled": options.disable_web_page_preview },
        });
        if let Some(markup) = options.reply_markup.as_ref().and_then(ReplyMarkup::to_wire) {
            parameters["reply_markup"] = markup;
        }
        if let Some(mode) = options.parse_mode {
            parameters["parse_mode"] = json!(mode);
        }
        if let Some(id) = options.reply_to_message_id {
            parameters["reply_to_message_id"] = json!(id);
        }
        let result = self
            .request
            .post_json(&self.method_url("sendMessage"), &parameters)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn send_photo(
        &self,
        chat: impl Into<ChatTarget>,
        photo: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.send_media("sendPhoto", "photo", chat.into(), photo, None, options)
            .await
    }

    pub async fn send_audio(
        &self,
        chat: impl Into<ChatTarget>,
        audio: InputFile,
        title: Option<String>,
        options: SendMediaOptions,
    ) -> Result<Message> {
        let title = title.or_else(|| Some(audio.file_name.clone()));
        self.send_media("sendAudio", "audio", chat.into(), audio, title, options)
            .await
    }

    pub async fn send_document(
        &self,
        chat: impl Into<ChatTarget>,
        document: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.send_media("sendDocument", "document", chat.into(), document, None, options)
            .await
    }

    pub async fn send_animation(
        &self,
        chat: impl Into<ChatTarget>,
        animation: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.send_media("sendAnimation", "animation", chat.into(), animation, None, options)
            .await
    }

    pub async fn send_voice(
        &self,
        chat: impl Into<ChatTarget>,
        voice: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.send_media("sendVoice", "voice", chat.into(), voice, None, options)
            .await
    }

    pub async fn send_video(
        &self,
        chat: impl Into<ChatTarget>,
        video: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.send_media("sendVideo", "video", chat.into(), video, None, options)
            .await
    }

    pub async fn send_video_note(
        &self,
        chat: impl Into<ChatTarget>,
        video_note: InputFile,
        options: SendMediaOptions,
    ) -> Result<Message> {
        self.send_media("sendVideoNote", "video_note", chat.into(), video_note, None, options)
            .await
    }

    async fn send_media(
        &self,
        method: &str,
        field: &'static str,
        chat: ChatTarget,
        file: InputFile,
        title: Option<String>,
        options: SendMediaOptions,
    ) -> Result<Message> {
        let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
        let mut form = reqwest::multipart::Form::new()
            .part(field, part)
            .text("chat_id", chat_target_text(&chat));
        if let Some(title) = title {
            form = form.text("title", title);
        }
        if let Some(caption) = options.caption {
            form = form.text("caption", caption);
        }
        if let Some(mode) = options.parse_mode {
            form = form.text("parse_mode", mode.as_str());
        }
        if let Some(markup) = options.reply_markup.as_ref().and_then(ReplyMarkup::to_wire) {
            form = form.text("reply_markup", markup.to_string());
        }
        if let Some(id) = options.reply_to_message_id {
            form = form.text("reply_to_message_id", id.to_string());
        }
        let result = self
            .request
            .post_multipart(&self.method_url(method), form)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Sends a poll. Option count outside `[2, 10]` is rejected before any
    /// network call.
    pub async fn send_poll(
        &self,
        chat: impl Into<ChatTarget>,
        question: impl Into<String>,
        options: &[PollOptionSpec],
        poll: SendPollOptions,
    ) -> Result<Message> {
        if options.len() < 2 || options.len() > 10 {
            return Err(ValidationError::PollOptionCount(options.len()).into());
        }

        let wire_options: Vec<Value> = options
            .iter()
            .map(|option| {
                let mut v = json!({ "text": option.text });
                if let Some(mode) = option.text_parse_mode {
                    v["text_parse_mode"] = json!(mode);
                }
                v
            })
            .collect();

        let chat: ChatTarget = chat.into();
        let question: String = question.into();
        let mut parameters = json!({
            "chat_id": chat,
            "question": question,
            "type": poll.kind.as_str(),
            "allows_multiple_answers": poll.allows_multiple_answers,
            "is_closed": poll.is_closed,
            "is_anonymous": poll.is_anonymous,
            "options": wire_options,
        });
        if poll.kind == PollKind::Quiz {
            parameters["correct_option_id"] = json!(poll.correct_option_id);
        }
        if let Some(explanation) = poll.explanation {
            parameters["explanation"] = json!(explanation);
            if let Some(mode) = poll.explanation_parse_mode {
                parameters["explanation_parse_mode"] = json!(mode);
            }
        }
        if let Some(markup) = poll.reply_markup.as_ref().and_then(ReplyMarkup::to_wire) {
            parameters["reply_markup"] = markup;
        }
        if let Some(period) = poll.open_period {
            parameters["open_period"] = json!(period);
        }
        if let Some(id) = poll.reply_to_message_id {
            parameters["reply_to_message_id"] = json!(id);
        }
        if let Some(mode) = poll.question_parse_mode {
            parameters["question_parse_mode"] = json!(mode);
        }

        let result = self
            .request
            .post_json(&self.method_url("sendPoll"), &parameters)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn send_contact(
        &self,
        chat: impl Into<ChatTarget>,
        phone_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: Option<String>,
        reply_markup: Option<ReplyMarkup>,
        reply_to_message_id: Option<i64>,
    ) -> Result<Message> {
        let chat: ChatTarget = chat.into();
        let phone_number: String = phone_number.into();
        let first_name: String = first_name.into();
        let mut parameters = json!({
            "chat_id": chat,
            "phone_number": phone_number,
            "first_name": first_name,
        });
        if let Some(last_name) = last_name {
            parameters["last_name"] = json!(last_name);
        }
        if let Some(id) = reply_to_message_id {
            parameters["reply_to_message_id"] = json!(id);
        }
        if let Some(markup) = reply_markup.as_ref().and_then(ReplyMarkup::to_wire) {
            parameters["reply_markup"] = markup;
        }
        let result = self
            .request
            .post_json(&self.method_url("sendContact"), &parameters)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Sends an animated dice emoji. Unsupported emojis are rejected locally.
    pub async fn send_dice(
        &self,
        chat: impl Into<ChatTarget>,
        emoji: &str,
        reply_markup: Option<ReplyMarkup>,
        reply_to_message_id: Option<i64>,
    ) -> Result<Message> {
        if !DICE_EMOJI.contains(&emoji) {
            return Err(ValidationError::DiceEmoji(emoji.to_string()).into());
        }
        let chat: ChatTarget = chat.into();
        let mut parameters = json!({
            "chat_id": chat,
            "emoji": emoji,
        });
        if let Some(id) = reply_to_message_id {
            parameters["reply_to_message_id"] = json!(id);
        }
        if let Some(markup) = reply_markup.as_ref().and_then(ReplyMarkup::to_wire) {
            parameters["reply_markup"] = markup;
        }
        let result = self
            .request
            .post_json(&self.method_url("sendDice"), &parameters)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn send_chat_action(
        &self,
        chat: impl Into<ChatTarget>,
        action: ChatAction,
    ) -> Result<bool> {
        let chat: ChatTarget = chat.into();
        let parameters = json!({
            "chat_id": chat,
            "action": action,
        });
        let result = self
            .request
            .post_json(&self.method_url("sendChatAction"), &parameters)
            .await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    pub async fn answer_callback_query(
        &self,
        query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<bool> {
        let mut parameters = json!({
            "callback_query_id": query_id,
            "show_alert": show_alert,
        });
        if let Some(text) = text {
            parameters["text"] = json!(text);
        }
        let result = self
            .request
            .post_json(&self.method_url("answerCallbackQuery"), &parameters)
            .await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    pub async fn delete_message(
        &self,
        chat: impl Into<ChatTarget>,
        message_id: i64,
    ) -> Result<bool> {
        let chat: ChatTarget = chat.into();
        let parameters = json!({
            "chat_id": chat,
            "message_id": message_id,
        });
        let result = self
            .request
            .post_json(&self.method_url("deleteMessage"), &parameters)
            .await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    pub async fn edit_message_text(
        &self,
        chat: impl Into<ChatTarget>,
        message_id: i64,
        text: impl Into<String>,
        options: EditMessageOptions,
    ) -> Result<bool> {
        let chat: ChatTarget = chat.into();
        let text: String = text.into();
        let mut parameters = json!({
            "chat_id": chat,
            "message_id": message_id,
            "text": text,
            "link_preview_options": { "is_disabled": options.disable_web_page_preview },
        });
        if let Some(mode) = options.parse_mode {
            parameters["parse_mode"] = json!(mode);
        }
        if let Some(markup) = options.reply_markup.as_ref().and_then(ReplyMarkup::to_wire) {
            parameters["reply_markup"] = markup;
        }
        let result = self
            .request
            .post_json(&self.method_url("editMessageText"), &parameters)
            .await?;
        // The platform returns the edited message for bot-sent messages and
        // `true` otherwise; both count as success here.
        Ok(result.as_bool().unwrap_or(true))
    }

    pub async fn edit_message_reply_markup(
        &self,
        chat: Option<ChatTarget>,
        message_id: Option<i64>,
        inline_message_id: Option<String>,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<bool> {
        let mut parameters = json!({});
        if let Some(chat) = chat {
            parameters["chat_id"] = json!(chat);
        }
        if let Some(id) = message_id {
            parameters["message_id"] = json!(id);
        }
        if let Some(id) = inline_message_id {
            parameters["inline_message_id"] = json!(id);
        }
        if let Some(markup) = reply_markup.as_ref().and_then(ReplyMarkup::to_wire) {
            parameters["reply_markup"] = markup;
        }
        let result = self
            .request
            .post_json(&self.method_url("editMessageReplyMarkup"), &parameters)
            .await?;
        Ok(result.as_bool().unwrap_or(true))
    }

    pub async fn set_my_commands(
        &self,
        commands: &[BotCommand],
        scope: Option<BotCommandScope>,
        language_code: Option<&str>,
    ) -> Result<bool> {
        let mut parameters = json!({ "commands": commands });
        if let Some(scope) = scope {
            parameters["scope"] = serde_json::to_value(scope)?;
        }
        if let Some(code) = language_code {
            parameters["language_code"] = json!(code);
        }
        let result = self
            .request
            .post_json(&self.method_url("setMyCommands"), &parameters)
            .await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    pub async fn get_file(&self, file_id: &str) -> Result<File> {
        let params = [("file_id", file_id.to_string())];
        let result = self
            .request
            .get_json(&self.method_url("getFile"), &params)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Downloads a file by the `file_path` obtained from [`Bot::get_file`].
    pub async fn download_file(&self, file_path: &str) -> Result<Vec<u8>> {
        self.request.get_bytes(&self.file_url(file_path)).await
    }
}

#[async_trait]
impl UpdateSource for Bot {
    async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
        allowed_updates: &[AllowedUpdate],
    ) -> Result<Vec<Update>> {
        Bot::get_updates(self, offset, timeout_secs, allowed_updates).await
    }
}

fn chat_target_text(chat: &ChatTarget) -> String {
    match chat {
        ChatTarget::Id(id) => id.to_string(),
        ChatTarget::Username(username) => username.clone(),
    }
}
