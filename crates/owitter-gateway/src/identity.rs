//! Identity-provider capability: federated sign-in, profile updates and
//! password-reset mail.  Session issuance and verification are entirely the
//! provider's business; this side only holds the resulting [`AuthUser`].

use serde::{Deserialize, Serialize};

use crate::Result;
use owitter_shared::AuthUser;

/// Supported federated sign-in providers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FederatedProvider {
    Github,
}

impl FederatedProvider {
    /// Provider id string as the backend expects it.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Github => "github.com",
        }
    }
}

/// Partial profile mutation.  `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    pub fn display_name(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn photo_url(url: impl Into<String>) -> Self {
        Self {
            photo_url: Some(url.into()),
            ..Self::default()
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Delegate sign-in to a federated provider; returns the account on
    /// success.  Failures carry the provider's own message text.
    async fn sign_in(&self, provider: FederatedProvider) -> Result<AuthUser>;

    /// Apply a partial profile update and return the refreshed account.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<AuthUser>;

    /// Ask the provider to send a password-reset email.
    async fn send_password_reset(&self, email: &str) -> Result<()>;
}
