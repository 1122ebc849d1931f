use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::models::{
    Message, NormalizedChoice, NormalizedResponse, UpstreamChatRequest, MAX_TOKENS, TEMPERATURE,
    TUTOR_PERSONA,
};

const UNREADABLE_BODY: &str = "Unable to read error response";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    DeepSeek,
    OpenAI,
}

/**
 * \brief Maps a provider name from configuration to a known preset.
 */
pub fn provider_kind(name: &str) -> Option<ProviderKind> {
    match name.trim().to_ascii_lowercase().as_str() {
        "deepseek" => Some(ProviderKind::DeepSeek),
        "openai" => Some(ProviderKind::OpenAI),
        _ => None,
    }
}

/**
 * \brief How an upstream non-success status is surfaced to the caller.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorClass {
    Unauthorized,
    RateLimited,
    Other,
}

/**
 * \brief Provider-specific half of the relay: request shape, response shape, error mapping.
 */
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;
    fn endpoint(&self) -> &str;
    /** \brief Configuration entry holding the credential (the name, not the value). */
    fn credential_key(&self) -> &str;
    /** \brief Where to get a new key, shown when the upstream rejects ours. */
    fn key_hint(&self) -> &str;
    fn build_request(&self, message: &str) -> UpstreamChatRequest;
    fn normalize_response(&self, raw: &Value) -> Result<NormalizedResponse, RelayError>;
    fn classify_error(&self, status: StatusCode) -> UpstreamErrorClass;
}

/**
 * \brief Adapter for providers speaking the OpenAI chat-completions wire format.
 */
#[derive(Debug, Clone)]
pub struct OpenAiCompatible {
    name: String,
    endpoint: String,
    model: String,
    credential_key: String,
    key_hint: String,
}

impl OpenAiCompatible {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        credential_key: impl Into<String>,
        key_hint: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            credential_key: credential_key.into(),
            key_hint: key_hint.into(),
        }
    }

    pub fn preset(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::DeepSeek => Self::new(
                "deepseek",
                "https://api.deepseek.com/chat/completions",
                "deepseek-chat",
                "DEEPSEEK_API_KEY",
                "Get a new API key from https://platform.deepseek.com/api_keys",
            ),
            ProviderKind::OpenAI => Self::new(
                "openai",
                "https://api.openai.com/v1/chat/completions",
                "gpt-4o-mini",
                "OPENAI_API_KEY",
                "Get a new API key from https://platform.openai.com/api-keys",
            ),
        }
    }

    /**
     * \brief Builds the adapter described by the relay configuration.
     */
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let kind = provider_kind(&config.provider).ok_or_else(|| {
            anyhow!(
                "unknown provider: {}, use deepseek or openai",
                config.provider
            )
        })?;
        let mut adapter = Self::preset(kind);
        if let Some(base) = config.api_base.as_deref() {
            adapter.endpoint = completions_endpoint(base);
        }
        if let Some(model) = config.model.as_deref() {
            adapter.model = model.to_string();
        }
        Ok(adapter)
    }
}

impl ProviderAdapter for OpenAiCompatible {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn credential_key(&self) -> &str {
        &self.credential_key
    }

    fn key_hint(&self) -> &str {
        &self.key_hint
    }

    fn build_request(&self, message: &str) -> UpstreamChatRequest {
        UpstreamChatRequest {
            model: self.model.clone(),
            messages: vec![Message::system(TUTOR_PERSONA), Message::user(message)],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            stream: false,
        }
    }

    fn normalize_response(&self, raw: &Value) -> Result<NormalizedResponse, RelayError> {
        let content = extract_openai_content(raw)?;
        Ok(NormalizedResponse {
            choices: vec![NormalizedChoice {
                message: Message::assistant(content),
            }],
            model: raw.get("model").and_then(|m| m.as_str()).map(str::to_string),
            usage: raw.get("usage").filter(|u| !u.is_null()).cloned(),
        })
    }

    fn classify_error(&self, status: StatusCode) -> UpstreamErrorClass {
        match status {
            StatusCode::UNAUTHORIZED => UpstreamErrorClass::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => UpstreamErrorClass::RateLimited,
            _ => UpstreamErrorClass::Other,
        }
    }
}

fn extract_openai_content(v: &Value) -> Result<String, RelayError> {
    let malformed = |reason: &str| RelayError::UpstreamMalformedResponse {
        reason: reason.to_string(),
    };
    let first = v
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| malformed("missing choices array"))?
        .first()
        .ok_or_else(|| malformed("empty choices array"))?;
    let message = first
        .get("message")
        .filter(|m| m.is_object())
        .ok_or_else(|| malformed("first choice has no message"))?;
    message
        .get("content")
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| malformed("message has no text content"))
}

/**
 * \brief Appends `/chat/completions` to an API base unless it already ends with it.
 */
pub fn completions_endpoint(api_base: &str) -> String {
    let trimmed = api_base.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

/**
 * \brief Raw outcome of one upstream call. `body` is None when it could not be read.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Option<String>,
}

impl UpstreamReply {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    /** \brief Body text, or a placeholder when it was unreadable. */
    pub fn text_or_placeholder(&self) -> &str {
        self.body.as_deref().unwrap_or(UNREADABLE_BODY)
    }
}

/**
 * \brief Outbound transport. Errors are transport failures; non-success statuses come back as replies.
 */
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn send(
        &self,
        endpoint: &str,
        credential: &str,
        request: &UpstreamChatRequest,
    ) -> Result<UpstreamReply>;
}

/**
 * \brief reqwest-backed upstream transport.
 */
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("build http client failed")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn send(
        &self,
        endpoint: &str,
        credential: &str,
        request: &UpstreamChatRequest,
    ) -> Result<UpstreamReply> {
        let resp = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", credential))
            .json(request)
            .send()
            .await
            .context("request to AI service failed")?;

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) => Some(text),
            Err(err) if status.is_success() => {
                return Err(err).context("read AI service response failed");
            }
            Err(_) => None,
        };
        Ok(UpstreamReply { status, body })
    }
}
