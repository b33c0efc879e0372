use super::domain::{validate_email, RegistrarError, SignupContext};
use super::service::{SubmissionReceipt, WaitlistRegistrar};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupPhase {
    Idle,
    Submitting,
    Submitted { waitlist_number: u64 },
}

/// State of one signup modal: `Idle -> Submitting -> Submitted`, back to
/// `Idle` on reset. Invalid input keeps the modal idle with a rejection.
#[derive(Debug, Clone)]
pub struct SignupFlow {
    phase: SignupPhase,
    email: String,
    rejection: Option<String>,
}

impl Default for SignupFlow {
    fn default() -> Self {
        Self {
            phase: SignupPhase::Idle,
            email: String::new(),
            rejection: None,
        }
    }
}

impl SignupFlow {
    pub fn phase(&self) -> &SignupPhase {
        &self.phase
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        if self.phase == SignupPhase::Idle {
            self.email = email.into();
            self.rejection = None;
        }
    }

    /// Submit button state: disabled while empty or already in flight.
    pub fn can_submit(&self) -> bool {
        self.phase == SignupPhase::Idle && !self.email.trim().is_empty()
    }

    /// Run one submission through the registrar.
    pub async fn submit(
        &mut self,
        registrar: &WaitlistRegistrar,
        context: SignupContext,
    ) -> Result<SubmissionReceipt, RegistrarError> {
        if self.phase != SignupPhase::Idle {
            return Err(RegistrarError::AlreadySubmitted);
        }
        if !validate_email(self.email.trim()) {
            self.rejection = Some(RegistrarError::InvalidEmail.to_string());
            return Err(RegistrarError::InvalidEmail);
        }

        self.phase = SignupPhase::Submitting;
        match registrar.submit(&self.email, context).await {
            Ok(receipt) => {
                self.phase = SignupPhase::Submitted {
                    waitlist_number: receipt.record.waitlist_number,
                };
                Ok(receipt)
            }
            Err(err) => {
                self.phase = SignupPhase::Idle;
                self.rejection = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Close or reset the modal.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
