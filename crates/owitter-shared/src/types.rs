use serde::{Deserialize, Serialize};

// User identity = opaque uid assigned by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fixed blob path for this user's avatar.  Re-uploads overwrite it.
    pub fn avatar_path(&self) -> String {
        format!("avatars/{}", self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Tweet identity = opaque document id assigned by the document store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TweetId(pub String);

impl TweetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TweetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Blob path for a tweet's attached photo, namespaced by author.
pub fn tweet_photo_path(user: &UserId, tweet: &TweetId) -> String {
    format!("tweets/{}/{}", user.0, tweet.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_path_is_per_user() {
        let uid = UserId::new("abc123");
        assert_eq!(uid.avatar_path(), "avatars/abc123");
    }

    #[test]
    fn tweet_photo_path_namespaces_by_author() {
        let uid = UserId::new("u1");
        let tid = TweetId::new("t9");
        assert_eq!(tweet_photo_path(&uid, &tid), "tweets/u1/t9");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let uid = UserId::new("u1");
        assert_eq!(serde_json::to_string(&uid).unwrap(), "\"u1\"");
    }
}
