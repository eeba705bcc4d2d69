use thiserror::Error;

/// Platform rejection, classified from the `{ ok: false, description }` envelope.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("too many requests: {description} (retry after {retry_after}s)")]
    TooManyRequests { description: String, retry_after: u64 },

    #[error("telegram error: {0}")]
    Other(String),
}

/// Malformed request detected before any network call.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("an inline button needs exactly one of url or callback_data")]
    ButtonParameter,

    #[error("a poll needs between 2 and 10 options, got {0}")]
    PollOptionCount(usize),

    #[error("poll option text exceeds 1000 characters (got {0})")]
    PollOptionTooLong(usize),

    #[error("dice emoji {0:?} is not supported")]
    DiceEmoji(String),
}

#[derive(Error, Debug)]
pub enum StateError {
    #[error("no state set for user {0}")]
    NotSet(i64),
}

#[derive(Error, Debug)]
pub enum EgramError {
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EgramError>;
