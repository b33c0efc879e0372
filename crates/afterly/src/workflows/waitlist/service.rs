use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::counter::{CounterError, FileCounterStore, WaitlistCounter};
use super::domain::{validate_email, RegistrarError, SignupContext, SignupRecord};
use super::notify::{CollectorEndpoint, EmailRelayEndpoint, NotificationEndpoint};
use crate::config::WaitlistConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    NotConfigured,
    Failed { reason: String },
}

/// What happened to one endpoint for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub endpoint: &'static str,
    #[serde(flatten)]
    pub status: DeliveryStatus,
}

impl DeliveryOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, DeliveryStatus::Failed { .. })
    }
}

/// Local acknowledgement plus per-endpoint delivery results.
///
/// A receipt exists whenever the signup was accepted, regardless of how the
/// webhooks fared. Callers that need confirmed delivery use
/// [`SubmissionReceipt::require_delivery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub record: SignupRecord,
    pub deliveries: Vec<DeliveryOutcome>,
}

impl SubmissionReceipt {
    pub fn failures(&self) -> Vec<&DeliveryOutcome> {
        self.deliveries
            .iter()
            .filter(|outcome| outcome.is_failure())
            .collect()
    }

    pub fn fully_delivered(&self) -> bool {
        self.failures().is_empty()
    }

    pub fn require_delivery(self) -> Result<SignupRecord, NotificationDeliveryFailure> {
        if self.fully_delivered() {
            return Ok(self.record);
        }
        let failed = self
            .deliveries
            .into_iter()
            .filter(DeliveryOutcome::is_failure)
            .collect();
        Err(NotificationDeliveryFailure {
            record: self.record,
            failed,
        })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{} notification endpoint(s) failed for waitlist #{}", .failed.len(), .record.waitlist_number)]
pub struct NotificationDeliveryFailure {
    pub record: SignupRecord,
    pub failed: Vec<DeliveryOutcome>,
}

/// Accepts waitlist signups and fans them out to the configured webhooks.
#[derive(Debug)]
pub struct WaitlistRegistrar {
    counter: Arc<WaitlistCounter>,
    endpoints: Vec<Arc<dyn NotificationEndpoint>>,
}

impl WaitlistRegistrar {
    pub fn new(counter: WaitlistCounter, endpoints: Vec<Arc<dyn NotificationEndpoint>>) -> Self {
        Self {
            counter: Arc::new(counter),
            endpoints,
        }
    }

    /// Wire the counter store and both webhooks from configuration.
    pub fn from_config(config: &WaitlistConfig) -> Result<Self, RegistrarError> {
        let client = reqwest::Client::builder()
            .timeout(config.webhook_timeout)
            .build()
            .map_err(|err| RegistrarError::Setup(err.to_string()))?;

        let counter = match &config.counter_path {
            Some(path) => WaitlistCounter::new(Arc::new(FileCounterStore::new(path))),
            None => WaitlistCounter::in_memory(),
        };

        let endpoints: Vec<Arc<dyn NotificationEndpoint>> = vec![
            Arc::new(CollectorEndpoint::new(
                client.clone(),
                config.collector_url.clone(),
            )),
            Arc::new(EmailRelayEndpoint::new(
                client,
                config.email_relay_url.clone(),
                config.notify_recipient.clone(),
            )),
        ];

        Ok(Self::new(counter, endpoints))
    }

    pub fn next_position(&self) -> Result<u64, CounterError> {
        self.counter.next_position()
    }

    pub fn current_position(&self) -> Result<u64, CounterError> {
        self.counter.current_position()
    }

    /// Validate, take the next position, and notify every endpoint once.
    ///
    /// Delivery problems are logged and reported in the receipt; they never
    /// turn an accepted signup into an error.
    pub async fn submit(
        &self,
        email: &str,
        context: SignupContext,
    ) -> Result<SubmissionReceipt, RegistrarError> {
        let email = email.trim();
        if !validate_email(email) {
            return Err(RegistrarError::InvalidEmail);
        }

        let counter = Arc::clone(&self.counter);
        let position = tokio::task::spawn_blocking(move || counter.next_position())
            .await
            .map_err(|err| CounterError::Unavailable(format!("counter task failed: {err}")))??;
        let record = SignupRecord::new(email.to_string(), position, Utc::now(), context);
        info!(waitlist_number = position, referrer = %record.referrer, "waitlist signup accepted");

        let deliveries = join_all(
            self.endpoints
                .iter()
                .map(|endpoint| deliver_once(endpoint.as_ref(), &record)),
        )
        .await;

        Ok(SubmissionReceipt { record, deliveries })
    }
}

async fn deliver_once(endpoint: &dyn NotificationEndpoint, record: &SignupRecord) -> DeliveryOutcome {
    let name = endpoint.name();
    if !endpoint.is_configured() {
        info!(endpoint = name, "notification endpoint not configured; skipping");
        return DeliveryOutcome {
            endpoint: name,
            status: DeliveryStatus::NotConfigured,
        };
    }

    let status = match endpoint.deliver(record).await {
        Ok(()) => {
            info!(
                endpoint = name,
                waitlist_number = record.waitlist_number,
                "signup delivered"
            );
            DeliveryStatus::Delivered
        }
        Err(err) => {
            warn!(
                endpoint = name,
                waitlist_number = record.waitlist_number,
                error = %err,
                "signup delivery failed"
            );
            DeliveryStatus::Failed {
                reason: err.to_string(),
            }
        }
    };

    DeliveryOutcome {
        endpoint: name,
        status,
    }
}
