use serde::{Deserialize, Serialize};
use serde_json::Value;

/**
 * \brief Fixed tutoring persona injected as the system message of every upstream call.
 */
pub const TUTOR_PERSONA: &str = "You are a friendly, patient English tutor. Help the user practice English. \
Correct their mistakes gently. Explain grammar simply. Use examples. \
Keep responses under 150 words. Speak at an intermediate English level. \
Be encouraging and positive.";

pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f64 = 0.7;

/**
 * \brief Chat message, aligned with the OpenAI chat message format.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /** \brief Role: system/user/assistant */
    pub role: String,
    /** \brief Content */
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/**
 * \brief Body sent to the upstream chat-completion endpoint.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub stream: bool,
}

/**
 * \brief Success body returned to the caller.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub choices: Vec<NormalizedChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedChoice {
    pub message: Message,
}

impl NormalizedResponse {
    /** \brief Content of the first choice, if any. */
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/**
 * \brief Structured error body returned for every failure.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /** \brief Short error title. */
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /** \brief Full error chain; only filled in development. */
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            details: None,
            hint: None,
            stack: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
