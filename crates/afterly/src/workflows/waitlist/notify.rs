use std::fmt::{Debug, Write as _};

use async_trait::async_trait;
use serde::Serialize;

use super::domain::SignupRecord;

/// Outbound webhook that mirrors signups outside this service.
#[async_trait]
pub trait NotificationEndpoint: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Unconfigured endpoints are skipped, not failed.
    fn is_configured(&self) -> bool;

    async fn deliver(&self, record: &SignupRecord) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("endpoint is not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("endpoint responded with HTTP {status}")]
    Rejected { status: u16 },
}

impl From<reqwest::Error> for NotificationError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Body posted to the generic collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectorPayload {
    pub email: String,
    pub waitlist_number: u64,
    pub timestamp: String,
    pub user_agent: String,
    pub referrer: String,
}

impl From<&SignupRecord> for CollectorPayload {
    fn from(record: &SignupRecord) -> Self {
        Self {
            email: record.email.clone(),
            waitlist_number: record.waitlist_number,
            timestamp: record.timestamp(),
            user_agent: record.user_agent.clone(),
            referrer: record.referrer.clone(),
        }
    }
}

/// Body posted to the email relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailRelayPayload {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl EmailRelayPayload {
    pub fn for_signup(recipient: &str, record: &SignupRecord) -> Self {
        Self {
            to: recipient.to_string(),
            subject: format!(
                "New Afterly Waitlist Signup - #{}",
                record.waitlist_number
            ),
            html: render_signup_html(record),
        }
    }
}

/// Spreadsheet-style collector receiving the raw signup fields.
#[derive(Debug, Clone)]
pub struct CollectorEndpoint {
    client: reqwest::Client,
    url: Option<String>,
}

impl CollectorEndpoint {
    pub fn new(client: reqwest::Client, url: Option<String>) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl NotificationEndpoint for CollectorEndpoint {
    fn name(&self) -> &'static str {
        "collector"
    }

    fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    async fn deliver(&self, record: &SignupRecord) -> Result<(), NotificationError> {
        let url = self.url.as_deref().ok_or(NotificationError::NotConfigured)?;
        post_json(&self.client, url, &CollectorPayload::from(record)).await
    }
}

/// Relay that turns each signup into a notification email.
#[derive(Debug, Clone)]
pub struct EmailRelayEndpoint {
    client: reqwest::Client,
    url: Option<String>,
    recipient: String,
}

impl EmailRelayEndpoint {
    pub fn new(client: reqwest::Client, url: Option<String>, recipient: impl Into<String>) -> Self {
        Self {
            client,
            url,
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl NotificationEndpoint for EmailRelayEndpoint {
    fn name(&self) -> &'static str {
        "email_relay"
    }

    fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    async fn deliver(&self, record: &SignupRecord) -> Result<(), NotificationError> {
        let url = self.url.as_deref().ok_or(NotificationError::NotConfigured)?;
        let payload = EmailRelayPayload::for_signup(&self.recipient, record);
        post_json(&self.client, url, &payload).await
    }
}

async fn post_json<T: Serialize + Sync>(
    client: &reqwest::Client,
    url: &str,
    payload: &T,
) -> Result<(), NotificationError> {
    let response = client.post(url).json(payload).send().await?;
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(NotificationError::Rejected {
            status: status.as_u16(),
        })
    }
}

pub fn render_signup_html(record: &SignupRecord) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<h2>New Afterly Waitlist Signup</h2>");
    let _ = writeln!(
        html,
        "<p><strong>Email:</strong> {}</p>",
        escape_html(&record.email)
    );
    let _ = writeln!(
        html,
        "<p><strong>Waitlist Position:</strong> #{}</p>",
        record.waitlist_number
    );
    let _ = writeln!(
        html,
        "<p><strong>Timestamp:</strong> {}</p>",
        record.submitted_at.format("%B %d, %Y %H:%M:%S UTC")
    );
    let _ = writeln!(
        html,
        "<p><strong>Referrer:</strong> {}</p>",
        escape_html(&record.referrer)
    );
    let _ = writeln!(
        html,
        "<p><strong>User Agent:</strong> {}</p>",
        escape_html(&record.user_agent)
    );
    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
