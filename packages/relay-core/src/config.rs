use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Error};

/**
 * \brief Read-only source of upstream credentials, queried once per request.
 */
pub trait CredentialSource: Send + Sync {
    /** \brief Returns the credential stored under `key`, or None when absent or blank. */
    fn credential(&self, key: &str) -> Option<String>;
}

/**
 * \brief Reads credentials from the process environment at call time.
 */
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn credential(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().and_then(non_blank)
    }
}

/**
 * \brief Fixed credential map, used by tests and by the CLI `--api-key` flag.
 */
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn credential(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned().and_then(non_blank)
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/**
 * \brief Deployment flavour; controls how much internal detail 500 responses carry.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unknown environment: {}, use development or production",
                other
            )),
        }
    }
}

/**
 * \brief Relay settings assembled at startup.
 */
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /** \brief Provider preset name, e.g. "deepseek" or "openai" */
    pub provider: String,
    /** \brief Overrides the preset API base */
    pub api_base: Option<String>,
    /** \brief Overrides the preset model */
    pub model: Option<String>,
    pub environment: Environment,
    /** \brief Timeout for the outbound call; None leaves it unbounded */
    pub request_timeout: Option<Duration>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            provider: "deepseek".to_string(),
            api_base: None,
            model: None,
            environment: Environment::Production,
            request_timeout: None,
        }
    }
}
