use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::counter::CounterError;

pub const DIRECT_REFERRER: &str = "Direct";
pub const UNKNOWN_USER_AGENT: &str = "unknown";

/// Deliberately minimal: non-empty and contains an `@`.
pub fn validate_email(input: &str) -> bool {
    !input.is_empty() && input.contains('@')
}

/// Request metadata captured alongside an address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupContext {
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
}

impl SignupContext {
    pub fn new(referrer: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            referrer: referrer.filter(|value| !value.trim().is_empty()),
            user_agent: user_agent.filter(|value| !value.trim().is_empty()),
        }
    }
}

/// One accepted waitlist submission. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRecord {
    pub email: String,
    pub waitlist_number: u64,
    pub submitted_at: DateTime<Utc>,
    pub referrer: String,
    pub user_agent: String,
}

impl SignupRecord {
    pub fn new(
        email: String,
        waitlist_number: u64,
        submitted_at: DateTime<Utc>,
        context: SignupContext,
    ) -> Self {
        Self {
            email,
            waitlist_number,
            submitted_at,
            referrer: context
                .referrer
                .unwrap_or_else(|| DIRECT_REFERRER.to_string()),
            user_agent: context
                .user_agent
                .unwrap_or_else(|| UNKNOWN_USER_AGENT.to_string()),
        }
    }

    /// ISO-8601 with millisecond precision, as the collector expects.
    pub fn timestamp(&self) -> String {
        self.submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrarError {
    #[error("please enter a valid email address")]
    InvalidEmail,
    #[error(transparent)]
    Counter(#[from] CounterError),
    #[error("unable to build webhook client: {0}")]
    Setup(String),
    #[error("signup already submitted; reset before submitting again")]
    AlreadySubmitted,
}
