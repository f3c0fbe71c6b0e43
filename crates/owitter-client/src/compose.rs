//! Posting a new tweet.
//!
//! The composer holds a draft and an optional staged photo.  Posting
//! creates the document first and, if a photo is staged, follows up with
//! the blob upload and a URL patch -- the same non-transactional sequencing
//! the edit workflow uses.  The draft is only cleared once every step
//! succeeded, so the user can retry after a failure.

use chrono::Utc;
use tracing::{error, info};

use crate::prompt::Prompt;
use crate::tweet::{OVERSIZE_PHOTO, StagedPhoto};
use owitter_gateway::{BlobStore, DocumentStore, UpdatePatch};
use owitter_shared::constants::{FIELD_PHOTO, MAX_PHOTO_BYTES, TWEETS_COLLECTION};
use owitter_shared::types::tweet_photo_path;
use owitter_shared::{AuthUser, Tweet, TweetFields, TweetId};

/// Result of a post attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// The new tweet, for the caller's local list.
    Posted(Tweet),
    /// Rejected locally (empty draft, nobody signed in, already posting).
    Ignored,
    /// A remote call failed.  The document may exist without its photo;
    /// the draft is kept so the user can retry.
    Failed,
}

/// Draft state for a new tweet.
#[derive(Debug, Clone, Default)]
pub struct TweetComposer {
    draft: String,
    photo: Option<StagedPhoto>,
    busy: bool,
}

impl TweetComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn pending_photo(&self) -> Option<&StagedPhoto> {
        self.photo.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Stage a photo for the new tweet; the same size gate as editing.
    pub fn stage_photo(
        &mut self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        prompt: &impl Prompt,
    ) -> bool {
        if bytes.len() >= MAX_PHOTO_BYTES {
            prompt.alert(OVERSIZE_PHOTO);
            return false;
        }
        self.photo = Some(StagedPhoto {
            file_name: file_name.into(),
            bytes,
        });
        true
    }

    pub fn clear_photo(&mut self) {
        self.photo = None;
    }

    /// Create the tweet as `user`.  Author fields are denormalised from the
    /// session at post time.
    pub async fn post<D, B>(
        &mut self,
        docs: &D,
        blobs: &B,
        user: Option<&AuthUser>,
    ) -> PostOutcome
    where
        D: DocumentStore,
        B: BlobStore,
    {
        let Some(user) = user else {
            return PostOutcome::Ignored;
        };
        if self.busy || self.draft.is_empty() {
            return PostOutcome::Ignored;
        }

        self.busy = true;
        let outcome = self.write_post(docs, blobs, user).await;
        self.busy = false;
        if let PostOutcome::Posted(_) = &outcome {
            self.draft.clear();
            self.photo = None;
        }
        outcome
    }

    async fn write_post<D, B>(&mut self, docs: &D, blobs: &B, user: &AuthUser) -> PostOutcome
    where
        D: DocumentStore,
        B: BlobStore,
    {
        let fields = TweetFields {
            tweet: self.draft.clone(),
            user_id: user.uid.clone(),
            username: user.display_name_or_anonymous().to_string(),
            photo: None,
            created_at: Utc::now(),
        };
        let value = match serde_json::to_value(&fields) {
            Ok(value) => value,
            Err(e) => {
                error!(error = %e, "Failed to encode tweet");
                return PostOutcome::Failed;
            }
        };

        let id = match docs.create(TWEETS_COLLECTION, value).await {
            Ok(id) => TweetId::new(id),
            Err(e) => {
                error!(error = %e, "Failed to create tweet");
                return PostOutcome::Failed;
            }
        };

        let mut tweet = Tweet::from_fields(id.clone(), fields);

        if let Some(staged) = &self.photo {
            let path = tweet_photo_path(&user.uid, &id);
            if let Err(e) = blobs.upload(&path, &staged.bytes).await {
                error!(tweet = %id, error = %e, "Failed to upload photo");
                return PostOutcome::Failed;
            }
            let url = match blobs.download_url(&path).await {
                Ok(url) => url,
                Err(e) => {
                    error!(tweet = %id, error = %e, "Failed to resolve photo URL");
                    return PostOutcome::Failed;
                }
            };
            let patch = UpdatePatch::new().set(FIELD_PHOTO, url.clone());
            if let Err(e) = docs.update(TWEETS_COLLECTION, id.as_str(), &patch).await {
                error!(tweet = %id, error = %e, "Failed to attach photo URL");
                return PostOutcome::Failed;
            }
            tweet.photo_url = Some(url);
        }

        info!(tweet = %id, "Tweet posted");
        PostOutcome::Posted(tweet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::RecordingPrompt;
    use owitter_gateway::{Call, FailPoint, MemoryGateway};
    use owitter_shared::UserId;

    fn account() -> AuthUser {
        AuthUser {
            uid: UserId::new("u1"),
            display_name: Some("ada".into()),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn empty_draft_posts_nothing() {
        let gw = MemoryGateway::new();
        let mut composer = TweetComposer::new();
        let user = account();

        assert_eq!(composer.post(&gw, &gw, Some(&user)).await, PostOutcome::Ignored);
        assert!(gw.calls().is_empty());
    }

    #[tokio::test]
    async fn signed_out_posts_nothing() {
        let gw = MemoryGateway::new();
        let mut composer = TweetComposer::new();
        composer.set_draft("hello");

        assert_eq!(composer.post(&gw, &gw, None).await, PostOutcome::Ignored);
        assert!(gw.calls().is_empty());
    }

    #[tokio::test]
    async fn plain_post_creates_one_document() {
        let gw = MemoryGateway::new();
        let mut composer = TweetComposer::new();
        composer.set_draft("hello world");

        let outcome = composer.post(&gw, &gw, Some(&account())).await;
        let PostOutcome::Posted(tweet) = outcome else {
            panic!("expected Posted, got {outcome:?}");
        };
        assert_eq!(tweet.text, "hello world");
        assert_eq!(tweet.username, "ada");
        assert_eq!(composer.draft(), "");

        let calls = gw.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            Call::DocCreate {
                collection: TWEETS_COLLECTION.into()
            }
        );
        let stored = gw.document(TWEETS_COLLECTION, tweet.id.as_str()).unwrap();
        assert_eq!(stored["username"], "ada");
        assert!(stored.get("photo").is_none());
    }

    #[tokio::test]
    async fn post_with_photo_patches_url_into_document() {
        let gw = MemoryGateway::new();
        let prompt = RecordingPrompt::accepting();
        let mut composer = TweetComposer::new();
        composer.set_draft("with photo");
        assert!(composer.stage_photo("p.png", vec![5; 8], &prompt));

        let PostOutcome::Posted(tweet) = composer.post(&gw, &gw, Some(&account())).await else {
            panic!("expected Posted");
        };
        let stored = gw.document(TWEETS_COLLECTION, tweet.id.as_str()).unwrap();
        assert_eq!(
            stored["photo"],
            format!("https://blobs.invalid/tweets/u1/{}", tweet.id)
        );
        assert!(composer.pending_photo().is_none());
    }

    #[test]
    fn oversize_photo_is_rejected_at_staging() {
        let prompt = RecordingPrompt::accepting();
        let mut composer = TweetComposer::new();

        assert!(!composer.stage_photo("big.png", vec![0; MAX_PHOTO_BYTES], &prompt));
        assert!(composer.pending_photo().is_none());
        assert_eq!(prompt.alerts().len(), 1);
    }

    #[tokio::test]
    async fn upload_failure_keeps_draft_for_retry() {
        let gw = MemoryGateway::new();
        gw.fail_next(FailPoint::BlobUpload);
        let prompt = RecordingPrompt::accepting();
        let mut composer = TweetComposer::new();
        composer.set_draft("hello");
        assert!(composer.stage_photo("p.png", vec![1], &prompt));

        assert_eq!(
            composer.post(&gw, &gw, Some(&account())).await,
            PostOutcome::Failed
        );
        // the document exists without a photo; accepted partial state
        assert_eq!(gw.calls().iter().filter(|c| c.is_doc_write()).count(), 1);
        assert_eq!(composer.draft(), "hello");
        assert!(composer.pending_photo().is_some());
        assert!(!composer.is_busy());
    }
}
