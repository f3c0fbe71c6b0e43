//! Session state: which account, if any, the client is acting as.
//!
//! A [`Session`] is constructed by the shell and handed to the components
//! that need it.  It is the only place the signed-in [`AuthUser`] lives.

use tracing::{info, warn};

use owitter_gateway::{FederatedProvider, IdentityProvider};
use owitter_shared::{AuthUser, UserId};

/// The client's view of the current account.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<AuthUser>,
}

impl Session {
    /// A session with nobody signed in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session acting as `user` (e.g. restored by the shell).
    pub fn signed_in(user: AuthUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn uid(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.uid)
    }

    /// Delegate sign-in to a federated provider.  On success the session
    /// holds the account and the shell navigates home; on failure the
    /// provider's message is returned for display and nothing else happens.
    pub async fn sign_in<I: IdentityProvider>(
        &mut self,
        identity: &I,
        provider: FederatedProvider,
    ) -> Result<&AuthUser, String> {
        match identity.sign_in(provider).await {
            Ok(user) => {
                info!(uid = %user.uid, "Signed in");
                Ok(&*self.user.insert(user))
            }
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                Err(e
                    .provider_message()
                    .map(String::from)
                    .unwrap_or_else(|| e.to_string()))
            }
        }
    }

    pub fn sign_out(&mut self) {
        self.user = None;
    }

    /// Mirror a profile change the identity provider has confirmed.
    pub fn replace_user(&mut self, user: AuthUser) {
        self.user = Some(user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owitter_gateway::MemoryGateway;

    fn account() -> AuthUser {
        AuthUser {
            uid: UserId::new("u1"),
            display_name: Some("ada".into()),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn sign_in_stores_account() {
        let gw = MemoryGateway::with_user(account());
        let mut session = Session::anonymous();

        let user = session
            .sign_in(&gw, FederatedProvider::Github)
            .await
            .unwrap();
        assert_eq!(user.uid.as_str(), "u1");
        assert_eq!(session.uid().unwrap().as_str(), "u1");
    }

    #[tokio::test]
    async fn failed_sign_in_surfaces_provider_message() {
        let gw = MemoryGateway::new();
        gw.deny_sign_in("auth/popup-closed-by-user");
        let mut session = Session::anonymous();

        let err = session
            .sign_in(&gw, FederatedProvider::Github)
            .await
            .unwrap_err();
        assert_eq!(err, "auth/popup-closed-by-user");
        assert!(session.user().is_none());
    }
}
