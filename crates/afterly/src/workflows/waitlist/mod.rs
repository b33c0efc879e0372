//! Waitlist signup: validate, number, notify.
//!
//! Every accepted address gets the next position from a persisted counter.
//! Copies go to optional webhooks (a spreadsheet-style collector and an email
//! relay); their failures are logged and reported in the receipt but never
//! reject the signup.

pub mod counter;
pub mod domain;
mod flow;
pub mod notify;
pub mod router;
mod service;

pub use counter::{
    CounterError, CounterStore, FileCounterStore, MemoryCounterStore, WaitlistCounter, COUNTER_KEY,
};
pub use domain::{validate_email, RegistrarError, SignupContext, SignupRecord};
pub use flow::{SignupFlow, SignupPhase};
pub use notify::{
    CollectorEndpoint, CollectorPayload, EmailRelayEndpoint, EmailRelayPayload,
    NotificationEndpoint, NotificationError,
};
pub use router::waitlist_router;
pub use service::{
    DeliveryOutcome, DeliveryStatus, NotificationDeliveryFailure, SubmissionReceipt,
    WaitlistRegistrar,
};
