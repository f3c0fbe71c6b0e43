//! Domain model structs mirroring the documents the hosted backend stores.
//!
//! Every struct derives `Serialize` and `Deserialize` with camelCase field
//! names so it maps 1:1 onto the JSON the document store holds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{TweetId, UserId};

// ---------------------------------------------------------------------------
// Tweet
// ---------------------------------------------------------------------------

/// The stored fields of a tweet document.  The document id lives outside the
/// field map (the store assigns it), so creates and reads go through this
/// struct while [`Tweet`] carries the id alongside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TweetFields {
    /// Text payload.  Empty strings are rejected before any write.
    pub tweet: String,
    /// Uid of the author.  A client-side affordance only; the backend's
    /// access rules are the real authorization boundary.
    pub user_id: UserId,
    /// Author display name, denormalised at post time.
    pub username: String,
    /// Download URL of the attached photo, if any.  Absent on freshly
    /// created documents; patched in after the blob upload completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Creation time in epoch milliseconds, used only for feed ordering.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// A tweet as the client sees it: stored fields plus the document id.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Tweet {
    pub id: TweetId,
    pub user_id: UserId,
    pub username: String,
    pub text: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Tweet {
    pub fn from_fields(id: TweetId, fields: TweetFields) -> Self {
        Self {
            id,
            user_id: fields.user_id,
            username: fields.username,
            text: fields.tweet,
            photo_url: fields.photo,
            created_at: fields.created_at,
        }
    }

    pub fn fields(&self) -> TweetFields {
        TweetFields {
            tweet: self.text.clone(),
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            photo: self.photo_url.clone(),
            created_at: self.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// AuthUser
// ---------------------------------------------------------------------------

/// The identity provider's view of the signed-in account.  Display name and
/// avatar URL are mutated via profile-update calls, never stored directly
/// by this application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: UserId,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl AuthUser {
    /// Name shown in the UI when no display name has been set.
    pub fn display_name_or_anonymous(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Anonymous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_fields() -> TweetFields {
        TweetFields {
            tweet: "hello".to_string(),
            user_id: UserId::new("u1"),
            username: "ada".to_string(),
            photo: None,
            created_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        }
    }

    #[test]
    fn fields_serialize_with_wire_names() {
        let json = serde_json::to_value(sample_fields()).unwrap();
        assert_eq!(json["tweet"], "hello");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["createdAt"], 1_700_000_000_000i64);
        // photo is omitted entirely when not set
        assert!(json.get("photo").is_none());
    }

    #[test]
    fn fields_deserialize_without_photo() {
        let json = serde_json::json!({
            "tweet": "hi",
            "userId": "u2",
            "username": "bob",
            "createdAt": 1_700_000_000_000i64,
        });
        let fields: TweetFields = serde_json::from_value(json).unwrap();
        assert_eq!(fields.photo, None);
    }

    #[test]
    fn tweet_round_trips_through_fields() {
        let tweet = Tweet::from_fields(TweetId::new("t1"), sample_fields());
        assert_eq!(tweet.text, "hello");
        assert_eq!(tweet.fields(), sample_fields());
    }

    #[test]
    fn anonymous_fallback() {
        let user = AuthUser {
            uid: UserId::new("u1"),
            display_name: None,
            photo_url: None,
        };
        assert_eq!(user.display_name_or_anonymous(), "Anonymous");
    }
}
