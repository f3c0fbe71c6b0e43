//! The profile screen: avatar, display name and the user's own tweets.
//!
//! Avatar replacement writes to a fixed per-user blob path (overwriting any
//! prior upload) and then propagates the resulting URL into the identity
//! provider's profile record.  Renames are confirm-gated and reject a no-op
//! rename with a user-visible message.  Structurally this is the tweet
//! mutation pattern again: replace a field, optionally replace a blob.

use tracing::{error, info};

use crate::feed::Feed;
use crate::prompt::Prompt;
use owitter_gateway::{BlobStore, DocumentStore, GatewayError, IdentityProvider, ProfileUpdate};
use owitter_shared::AuthUser;

pub const CONFIRM_RENAME: &str = "Are you sure update name?";
pub const SAME_NAME: &str = "Same as previous name.";

/// Result of a rename attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// Rejected locally without any dialog (empty input, not editing, busy).
    Ignored,
    /// The new name equals the current one; alerted, no remote call.
    SameAsPrevious,
    Declined,
    Failed,
}

/// Result of an avatar replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarOutcome {
    Updated,
    Ignored,
    Failed,
}

/// Local state of the profile screen for the signed-in user.
#[derive(Debug, Clone)]
pub struct ProfilePage {
    user: AuthUser,
    name_input: Option<String>,
    busy: bool,
    feed: Feed,
}

impl ProfilePage {
    pub fn new(user: AuthUser) -> Self {
        Self {
            user,
            name_input: None,
            busy: false,
            feed: Feed::new(),
        }
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.user.photo_url.as_deref()
    }

    pub fn display_name(&self) -> &str {
        self.user.display_name_or_anonymous()
    }

    pub fn is_editing_name(&self) -> bool {
        self.name_input.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The user's own recent tweets (bounded snapshot, newest first).
    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut Feed {
        &mut self.feed
    }

    /// Fetch this user's tweets into the page's own list.
    pub async fn load_tweets<D: DocumentStore>(&mut self, docs: &D) -> Result<(), GatewayError> {
        let uid = self.user.uid.clone();
        self.feed.load_for_author(docs, &uid).await
    }

    /// Replace the avatar: upload to the fixed per-user path, then write the
    /// resulting URL into the profile record.  Not transactional; an
    /// overwritten blob with a failed profile patch is accepted.
    pub async fn change_avatar<B, I>(&mut self, blobs: &B, identity: &I, bytes: &[u8]) -> AvatarOutcome
    where
        B: BlobStore,
        I: IdentityProvider,
    {
        if self.busy {
            return AvatarOutcome::Ignored;
        }
        self.busy = true;
        let outcome = self.write_avatar(blobs, identity, bytes).await;
        self.busy = false;
        outcome
    }

    async fn write_avatar<B, I>(&mut self, blobs: &B, identity: &I, bytes: &[u8]) -> AvatarOutcome
    where
        B: BlobStore,
        I: IdentityProvider,
    {
        let path = self.user.uid.avatar_path();

        if let Err(e) = blobs.upload(&path, bytes).await {
            error!(error = %e, "Failed to upload avatar");
            return AvatarOutcome::Failed;
        }
        let url = match blobs.download_url(&path).await {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, "Failed to resolve avatar URL");
                return AvatarOutcome::Failed;
            }
        };
        match identity.update_profile(&ProfileUpdate::photo_url(url)).await {
            Ok(user) => {
                self.user = user;
                info!(uid = %self.user.uid, "Avatar updated");
                AvatarOutcome::Updated
            }
            Err(e) => {
                error!(error = %e, "Failed to update profile photo");
                AvatarOutcome::Failed
            }
        }
    }

    /// Enter name-edit mode, snapshotting the current display name.
    pub fn begin_edit_name(&mut self) {
        if self.busy {
            return;
        }
        self.name_input = Some(self.user.display_name.clone().unwrap_or_default());
    }

    pub fn set_name_input(&mut self, name: impl Into<String>) {
        if let Some(input) = &mut self.name_input {
            *input = name.into();
        }
    }

    pub fn cancel_edit_name(&mut self) {
        if !self.busy {
            self.name_input = None;
        }
    }

    /// Submit the rename.  Empty input is a silent no-op; an unchanged name
    /// alerts and issues no call; otherwise the update is confirm-gated.
    /// Edit mode is left in every completed path, success or failure.
    pub async fn submit_name<I: IdentityProvider>(
        &mut self,
        identity: &I,
        prompt: &impl Prompt,
    ) -> RenameOutcome {
        if self.busy {
            return RenameOutcome::Ignored;
        }
        let Some(name) = self.name_input.clone() else {
            return RenameOutcome::Ignored;
        };
        if name.is_empty() {
            return RenameOutcome::Ignored;
        }
        if Some(name.as_str()) == self.user.display_name.as_deref() {
            prompt.alert(SAME_NAME);
            return RenameOutcome::SameAsPrevious;
        }
        if !prompt.confirm(CONFIRM_RENAME) {
            return RenameOutcome::Declined;
        }

        self.busy = true;
        let outcome = match identity.update_profile(&ProfileUpdate::display_name(name)).await {
            Ok(user) => {
                self.user = user;
                info!(uid = %self.user.uid, "Display name updated");
                RenameOutcome::Renamed
            }
            Err(e) => {
                error!(error = %e, "Failed to update display name");
                RenameOutcome::Failed
            }
        };
        self.name_input = None;
        self.busy = false;
        outcome
    }
}
