//! One rendered tweet and its mutation workflow.
//!
//! A [`TweetCard`] moves through `Viewing -> Editing -> Saving -> Viewing`
//! (cancel short-circuits back to `Viewing`), and independently
//! `Viewing -> Deleting -> Deleted`.  Saving performs up to three remote
//! writes in sequence -- text patch, staged photo upload + URL patch, or
//! staged removal patch + blob delete -- and these are **not** a
//! transaction: a failure partway leaves the earlier writes in place.  The
//! component logs the failure, clears its loading flag and goes back to
//! interactive.
//!
//! Ownership checks here gate the UI only.  The backend's access rules are
//! the actual authorization boundary.

use tracing::{error, info};

use crate::prompt::Prompt;
use owitter_gateway::{BlobStore, DocumentStore, UpdatePatch};
use owitter_shared::constants::{FIELD_PHOTO, FIELD_TEXT, MAX_PHOTO_BYTES, TWEETS_COLLECTION};
use owitter_shared::types::tweet_photo_path;
use owitter_shared::{Tweet, UserId};

pub const CONFIRM_SAVE: &str = "Are you sure you want to save this tweet?";
pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this tweet?";
pub const OVERSIZE_PHOTO: &str = "Please choose a photo smaller than 1MB.";

/// A photo file staged locally, awaiting confirmation before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPhoto {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// What should happen to the tweet's photo on save.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum PhotoAction {
    #[default]
    Keep,
    Replace(StagedPhoto),
    Remove,
}

#[derive(Debug, Clone)]
enum Mode {
    Viewing,
    Editing { draft: String, photo: PhotoAction },
}

/// Result of a save attempt.  Local rejections (empty text, non-author,
/// nothing being edited) are silent no-ops by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Rejected locally; no dialog, no remote call.
    Ignored,
    /// The user answered "no" to the confirmation.
    Declined,
    /// A remote call failed; earlier completed steps are not rolled back.
    Failed,
}

/// Result of a delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The document is gone.  A failed follow-up blob delete still counts
    /// as deleted; it is logged and left behind.
    Deleted,
    Ignored,
    Declined,
    Failed,
}

/// A tweet plus the edit/delete state the owning view holds for it.
#[derive(Debug, Clone)]
pub struct TweetCard {
    tweet: Tweet,
    viewer: Option<UserId>,
    mode: Mode,
    busy: bool,
}

impl TweetCard {
    /// `viewer` is the acting identity, if anyone is signed in.
    pub fn new(tweet: Tweet, viewer: Option<UserId>) -> Self {
        Self {
            tweet,
            viewer,
            mode: Mode::Viewing,
            busy: false,
        }
    }

    pub fn tweet(&self) -> &Tweet {
        &self.tweet
    }

    /// Whether edit/delete controls are offered at all.  True only when the
    /// acting identity matches the author.
    pub fn can_modify(&self) -> bool {
        self.viewer.as_ref() == Some(&self.tweet.user_id)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing { .. })
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The editable text, when in edit mode.
    pub fn draft(&self) -> Option<&str> {
        match &self.mode {
            Mode::Editing { draft, .. } => Some(draft),
            Mode::Viewing => None,
        }
    }

    /// The staged replacement photo, when one is pending.
    pub fn pending_photo(&self) -> Option<&StagedPhoto> {
        match &self.mode {
            Mode::Editing {
                photo: PhotoAction::Replace(staged),
                ..
            } => Some(staged),
            _ => None,
        }
    }

    /// Enter edit mode, snapshotting the current text as the draft.
    pub fn begin_edit(&mut self) {
        if !self.can_modify() || self.busy || self.is_editing() {
            return;
        }
        self.mode = Mode::Editing {
            draft: self.tweet.text.clone(),
            photo: PhotoAction::Keep,
        };
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Mode::Editing { draft, .. } = &mut self.mode {
            *draft = text.into();
        }
    }

    /// Stage a replacement photo.  Files at or above the size limit are
    /// rejected with an alert and never reach pending state.
    pub fn stage_photo(
        &mut self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        prompt: &impl Prompt,
    ) -> bool {
        let Mode::Editing { photo, .. } = &mut self.mode else {
            return false;
        };
        if bytes.len() >= MAX_PHOTO_BYTES {
            prompt.alert(OVERSIZE_PHOTO);
            return false;
        }
        *photo = PhotoAction::Replace(StagedPhoto {
            file_name: file_name.into(),
            bytes,
        });
        true
    }

    /// Stage removal of the existing photo.
    pub fn stage_photo_removal(&mut self) {
        if let Mode::Editing { photo, .. } = &mut self.mode {
            *photo = PhotoAction::Remove;
        }
    }

    /// Leave edit mode, discarding the draft and any staged photo action.
    pub fn cancel_edit(&mut self) {
        if self.busy {
            return;
        }
        self.mode = Mode::Viewing;
    }

    /// Commit the edit.  Up to three independent remote writes, in order:
    /// the text patch, then either the staged photo upload and URL patch or
    /// the URL removal and blob delete.  Partial failure is accepted: the
    /// card returns to `Viewing` reflecting whichever steps completed.
    pub async fn save<D, B>(
        &mut self,
        docs: &D,
        blobs: &B,
        prompt: &impl Prompt,
    ) -> SaveOutcome
    where
        D: DocumentStore,
        B: BlobStore,
    {
        if self.busy {
            return SaveOutcome::Ignored;
        }
        let (draft, photo) = match &self.mode {
            Mode::Editing { draft, photo } => (draft.clone(), photo.clone()),
            Mode::Viewing => return SaveOutcome::Ignored,
        };
        if draft.is_empty() || !self.can_modify() {
            return SaveOutcome::Ignored;
        }
        if !prompt.confirm(CONFIRM_SAVE) {
            return SaveOutcome::Declined;
        }

        self.busy = true;
        let outcome = self.write_edit(docs, blobs, draft, photo).await;
        self.busy = false;
        self.mode = Mode::Viewing;
        outcome
    }

    async fn write_edit<D, B>(
        &mut self,
        docs: &D,
        blobs: &B,
        draft: String,
        photo: PhotoAction,
    ) -> SaveOutcome
    where
        D: DocumentStore,
        B: BlobStore,
    {
        let id = self.tweet.id.clone();

        let text_patch = UpdatePatch::new().set(FIELD_TEXT, draft.clone());
        if let Err(e) = docs.update(TWEETS_COLLECTION, id.as_str(), &text_patch).await {
            error!(tweet = %id, error = %e, "Failed to update tweet text");
            return SaveOutcome::Failed;
        }
        self.tweet.text = draft;

        match photo {
            PhotoAction::Keep => {}
            PhotoAction::Replace(staged) => {
                let path = tweet_photo_path(&self.tweet.user_id, &id);
                if let Err(e) = blobs.upload(&path, &staged.bytes).await {
                    error!(tweet = %id, error = %e, "Failed to upload photo");
                    return SaveOutcome::Failed;
                }
                let url = match blobs.download_url(&path).await {
                    Ok(url) => url,
                    Err(e) => {
                        error!(tweet = %id, error = %e, "Failed to resolve photo URL");
                        return SaveOutcome::Failed;
                    }
                };
                let photo_patch = UpdatePatch::new().set(FIELD_PHOTO, url.clone());
                if let Err(e) = docs.update(TWEETS_COLLECTION, id.as_str(), &photo_patch).await {
                    error!(tweet = %id, error = %e, "Failed to attach photo URL");
                    return SaveOutcome::Failed;
                }
                self.tweet.photo_url = Some(url);
            }
            PhotoAction::Remove => {
                let clear_patch = UpdatePatch::new().delete_field(FIELD_PHOTO);
                if let Err(e) = docs.update(TWEETS_COLLECTION, id.as_str(), &clear_patch).await {
                    error!(tweet = %id, error = %e, "Failed to clear photo field");
                    return SaveOutcome::Failed;
                }
                self.tweet.photo_url = None;
                let path = tweet_photo_path(&self.tweet.user_id, &id);
                if let Err(e) = blobs.delete(&path).await {
                    error!(tweet = %id, error = %e, "Failed to delete photo blob");
                    return SaveOutcome::Failed;
                }
            }
        }

        info!(tweet = %id, "Tweet saved");
        SaveOutcome::Saved
    }

    /// Delete the tweet: the document first, then (only if a photo exists)
    /// its blob.  A blob-delete failure after the document is gone is
    /// logged, not rolled back.
    pub async fn delete<D, B>(
        &mut self,
        docs: &D,
        blobs: &B,
        prompt: &impl Prompt,
    ) -> DeleteOutcome
    where
        D: DocumentStore,
        B: BlobStore,
    {
        if self.busy || !self.can_modify() {
            return DeleteOutcome::Ignored;
        }
        if !prompt.confirm(CONFIRM_DELETE) {
            return DeleteOutcome::Declined;
        }

        self.busy = true;
        let id = self.tweet.id.clone();

        if let Err(e) = docs.delete(TWEETS_COLLECTION, id.as_str()).await {
            error!(tweet = %id, error = %e, "Failed to delete tweet");
            self.busy = false;
            return DeleteOutcome::Failed;
        }

        if self.tweet.photo_url.is_some() {
            let path = tweet_photo_path(&self.tweet.user_id, &id);
            if let Err(e) = blobs.delete(&path).await {
                error!(tweet = %id, error = %e, "Orphaned photo blob left behind");
            }
        }

        self.busy = false;
        info!(tweet = %id, "Tweet deleted");
        DeleteOutcome::Deleted
    }
}
