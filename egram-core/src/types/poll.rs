use serde::{Deserialize, Serialize};

use super::user::User;
use crate::error::ValidationError;
use crate::types::format::ParseMode;

/// A poll as delivered in updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Poll {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<PollOption>>,
    #[serde(default)]
    pub total_voter_count: Option<i64>,
    #[serde(default)]
    pub is_closed: Option<bool>,
    #[serde(default)]
    pub is_anonymous: Option<bool>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub allows_multiple_answers: Option<bool>,
    #[serde(default)]
    pub correct_option_id: Option<i64>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub open_period: Option<i64>,
    #[serde(default)]
    pub close_date: Option<i64>,
}

/// One answer option inside a delivered [`Poll`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollOption {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voter_count: Option<i64>,
}

/// A user's vote in a non-anonymous poll.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollAnswer {
    #[serde(default)]
    pub poll_id: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub option_ids: Option<Vec<i64>>,
}

impl PollAnswer {
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().and_then(|u| u.id)
    }
}

/// An answer option for an outgoing poll. Text length is validated at
/// construction (at most 1000 characters).
#[derive(Debug, Clone)]
pub struct PollOptionSpec {
    pub text: String,
    pub text_parse_mode: Option<ParseMode>,
}

impl PollOptionSpec {
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        let len = text.chars().count();
        if len > 1_000 {
            return Err(ValidationError::PollOptionTooLong(len));
        }
        Ok(Self {
            text,
            text_parse_mode: None,
        })
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.text_parse_mode = Some(mode);
        self
    }

    /// Builds a list of plain-text options, failing on the first over-long one.
    pub fn from_texts<I, S>(texts: I) -> Result<Vec<Self>, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts.into_iter().map(Self::new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_option_spec_rejects_long_text() {
        let long = "x".repeat(1_001);
        assert!(matches!(
            PollOptionSpec::new(long),
            Err(ValidationError::PollOptionTooLong(1_001))
        ));
    }

    #[test]
    fn test_from_texts() {
        let options = PollOptionSpec::from_texts(["yes", "no"]).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].text, "yes");
    }
}
