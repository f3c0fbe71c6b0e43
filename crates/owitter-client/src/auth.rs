//! Auth screens: thin forms in front of the identity provider.
//!
//! Federated sign-in lives on [`crate::Session`]; this module holds the
//! password-reset form.  Provider failures are surfaced as the provider's
//! own message text and nothing is retried.

use tracing::warn;

use owitter_gateway::IdentityProvider;

/// Result of a reset submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Sent,
    /// Ignored locally: empty email or a submission already in flight.
    Ignored,
    /// The provider rejected the request; its message is shown inline.
    Failed,
}

/// State of the password-reset form.
#[derive(Debug, Clone, Default)]
pub struct PasswordReset {
    email: String,
    sent: bool,
    error: Option<String>,
    busy: bool,
}

impl PasswordReset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Whether the acknowledgment ("link sent") state is showing.
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Inline error text, if the last attempt failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Request the reset email.  Error and sent flags reset at the start of
    /// every attempt; an empty email or an in-flight submission is ignored.
    pub async fn submit<I: IdentityProvider>(&mut self, identity: &I) -> ResetOutcome {
        self.error = None;
        self.sent = false;
        if self.busy || self.email.is_empty() {
            return ResetOutcome::Ignored;
        }

        self.busy = true;
        let outcome = match identity.send_password_reset(&self.email).await {
            Ok(()) => {
                self.sent = true;
                ResetOutcome::Sent
            }
            Err(e) => {
                warn!(error = %e, "Password reset request failed");
                self.error = Some(
                    e.provider_message()
                        .map(String::from)
                        .unwrap_or_else(|| e.to_string()),
                );
                ResetOutcome::Failed
            }
        };
        self.busy = false;
        outcome
    }
}
