//! Keyboard builders and their wire representation.

use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;

/// One button of a reply keyboard.
#[derive(Debug, Clone, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for KeyboardButton {
    fn from(text: &str) -> Self {
        KeyboardButton::new(text)
    }
}

impl From<String> for KeyboardButton {
    fn from(text: String) -> Self {
        KeyboardButton::new(text)
    }
}

/// One button of an inline keyboard. Exactly one of `url` / `callback_data`
/// must be set; the checked constructor enforces it.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineKeyboardButton {
    pub fn new(
        text: impl Into<String>,
        url: Option<String>,
        callback_data: Option<String>,
    ) -> Result<Self, ValidationError> {
        match (&url, &callback_data) {
            (None, None) | (Some(_), Some(_)) => Err(ValidationError::ButtonParameter),
            _ => Ok(Self {
                text: text.into(),
                url,
                callback_data,
            }),
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            callback_data: None,
        }
    }

    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            callback_data: Some(data.into()),
        }
    }
}

/// Reply keyboard builder. `add` chunks buttons into rows of `row_width`;
/// `row` appends the given buttons as one explicit row.
#[derive(Debug, Clone)]
pub struct ReplyKeyboardMarkup {
    pub rows: Vec<Vec<KeyboardButton>>,
    row_width: usize,
    pub resize_keyboard: bool,
}

impl ReplyKeyboardMarkup {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            row_width: 3,
            resize_keyboard: false,
        }
    }

    pub fn with_row_width(mut self, row_width: usize) -> Self {
        self.row_width = row_width.max(1);
        self
    }

    pub fn resize(mut self, resize_keyboard: bool) -> Self {
        self.resize_keyboard = resize_keyboard;
        self
    }

    pub fn add<I, B>(&mut self, buttons: I)
    where
        I: IntoIterator<Item = B>,
        B: Into<KeyboardButton>,
    {
        let mut row = Vec::new();
        for button in buttons {
            row.push(button.into());
            if row.len() == self.row_width {
                self.rows.push(std::mem::take(&mut row));
            }
        }
        if !row.is_empty() {
            self.rows.push(row);
        }
    }

    pub fn row<I, B>(&mut self, buttons: I)
    where
        I: IntoIterator<Item = B>,
        B: Into<KeyboardButton>,
    {
        let row: Vec<KeyboardButton> = buttons.into_iter().map(Into::into).collect();
        if !row.is_empty() {
            self.rows.push(row);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for ReplyKeyboardMarkup {
    fn default() -> Self {
        Self::new()
    }
}

/// Inline keyboard builder. Besides `add`/`row`, buttons can be staged one by
/// one and flushed into a single row with `flush_staged`.
#[derive(Debug, Clone)]
pub struct InlineKeyboardMarkup {
    pub rows: Vec<Vec<InlineKeyboardButton>>,
    row_width: usize,
    staged: Vec<InlineKeyboardButton>,
}

impl InlineKeyboardMarkup {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            row_width: 3,
            staged: Vec::new(),
        }
    }

    pub fn with_row_width(mut self, row_width: usize) -> Self {
        self.row_width = row_width.max(1);
        self
    }

    pub fn add<I>(&mut self, buttons: I)
    where
        I: IntoIterator<Item = InlineKeyboardButton>,
    {
        let mut row = Vec::new();
        for button in buttons {
            row.push(button);
            if row.len() == self.row_width {
                self.rows.push(std::mem::take(&mut row));
            }
        }
        if !row.is_empty() {
            self.rows.push(row);
        }
    }

    pub fn row<I>(&mut self, buttons: I)
    where
        I: IntoIterator<Item = InlineKeyboardButton>,
    {
        let row: Vec<InlineKeyboardButton> = buttons.into_iter().collect();
        if !row.is_empty() {
            self.rows.push(row);
        }
    }

    /// Buffers buttons to be emitted later as one row.
    pub fn stage<I>(&mut self, buttons: I)
    where
        I: IntoIterator<Item = InlineKeyboardButton>,
    {
        self.staged.extend(buttons);
    }

    /// Moves all staged buttons into the keyboard, chunked by `row_width`.
    pub fn flush_staged(&mut self) {
        let staged = std::mem::take(&mut self.staged);
        self.add(staged);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for InlineKeyboardMarkup {
    fn default() -> Self {
        Self::new()
    }
}

/// Either kind of keyboard, ready to attach to an outgoing request.
///
/// `From` impls cover the shorthand forms callers reach for: a single button
/// (either kind) or a bare string becomes a one-button keyboard.
#[derive(Debug, Clone)]
pub enum ReplyMarkup {
    Keyboard(ReplyKeyboardMarkup),
    Inline(InlineKeyboardMarkup),
}

impl ReplyMarkup {
    /// Wire representation, or `None` when the keyboard has no rows.
    pub fn to_wire(&self) -> Option<Value> {
        match self {
            ReplyMarkup::Keyboard(kb) => {
                if kb.is_empty() {
                    return None;
                }
                Some(serde_json::json!({
                    "keyboard": kb.rows,
                    "resize_keyboard": kb.resize_keyboard,
                }))
            }
            ReplyMarkup::Inline(kb) => {
                if kb.is_empty() {
                    return None;
                }
                Some(serde_json::json!({ "inline_keyboard": kb.rows }))
            }
        }
    }
}

impl From<ReplyKeyboardMarkup> for ReplyMarkup {
    fn from(kb: ReplyKeyboardMarkup) -> Self {
        ReplyMarkup::Keyboard(kb)
    }
}

impl From<InlineKeyboardMarkup> for ReplyMarkup {
    fn from(kb: InlineKeyboardMarkup) -> Self {
        ReplyMarkup::Inline(kb)
    }
}

impl From<KeyboardButton> for ReplyMarkup {
    fn from(button: KeyboardButton) -> Self {
        let mut kb = ReplyKeyboardMarkup::new();
        kb.add([button]);
        ReplyMarkup::Keyboard(kb)
    }
}

impl From<InlineKeyboardButton> for ReplyMarkup {
    fn from(button: InlineKeyboardButton) -> Self {
        let mut kb = InlineKeyboardMarkup::new();
        kb.add([button]);
        ReplyMarkup::Inline(kb)
    }
}

impl From<&str> for ReplyMarkup {
    fn from(text: &str) -> Self {
        ReplyMarkup::from(KeyboardButton::new(text))
    }
}
