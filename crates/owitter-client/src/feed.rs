//! One-shot feed snapshot.
//!
//! A fetch pulls at most [`FEED_PAGE_SIZE`] tweets, newest first, optionally
//! filtered to one author.  There is no live subscription and no automatic
//! re-fetch: local `remove`/`replace` keep this component's own list in step
//! with mutations it performed, and nothing else.  Refreshing means issuing
//! the fetch again.

use tracing::debug;

use owitter_gateway::{Direction, DocumentStore, GatewayError, Query};
use owitter_shared::constants::{
    FEED_PAGE_SIZE, FIELD_AUTHOR_ID, FIELD_CREATED_AT, TWEETS_COLLECTION,
};
use owitter_shared::{Tweet, TweetId, UserId};

/// An in-memory list of fetched tweets, owned by one view.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    tweets: Vec<Tweet>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tweets(&self) -> &[Tweet] {
        &self.tweets
    }

    /// Fetch the newest tweets across all authors.
    pub async fn load_timeline<D: DocumentStore>(&mut self, docs: &D) -> Result<(), GatewayError> {
        self.load(docs, None).await
    }

    /// Fetch the newest tweets by one author.
    pub async fn load_for_author<D: DocumentStore>(
        &mut self,
        docs: &D,
        author: &UserId,
    ) -> Result<(), GatewayError> {
        self.load(docs, Some(author)).await
    }

    async fn load<D: DocumentStore>(
        &mut self,
        docs: &D,
        author: Option<&UserId>,
    ) -> Result<(), GatewayError> {
        let mut query = Query::collection(TWEETS_COLLECTION)
            .order_by(FIELD_CREATED_AT, Direction::Desc)
            .limit(FEED_PAGE_SIZE);
        if let Some(author) = author {
            query = query.where_eq(FIELD_AUTHOR_ID, author.as_str());
        }

        let documents = docs.query(&query).await?;
        let mut tweets = Vec::with_capacity(documents.len());
        for doc in documents {
            let fields = doc.parse()?;
            tweets.push(Tweet::from_fields(TweetId::new(doc.id), fields));
        }
        debug!(count = tweets.len(), "Feed loaded");
        self.tweets = tweets;
        Ok(())
    }

    /// Drop a tweet this view deleted.  Sibling views are not told.
    pub fn remove(&mut self, id: &TweetId) {
        self.tweets.retain(|t| &t.id != id);
    }

    /// Mirror an edit this view performed.
    pub fn replace(&mut self, tweet: Tweet) {
        if let Some(slot) = self.tweets.iter_mut().find(|t| t.id == tweet.id) {
            *slot = tweet;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owitter_gateway::MemoryGateway;
    use serde_json::json;

    fn seed(gw: &MemoryGateway, id: &str, uid: &str, at: i64) {
        gw.seed_document(
            TWEETS_COLLECTION,
            id,
            json!({
                "tweet": format!("tweet {id}"),
                "userId": uid,
                "username": "ada",
                "createdAt": at,
            }),
        );
    }

    #[tokio::test]
    async fn timeline_is_newest_first_and_bounded() {
        let gw = MemoryGateway::new();
        for i in 0..30i64 {
            seed(&gw, &format!("t{i}"), "u1", 1_000 + i);
        }

        let mut feed = Feed::new();
        feed.load_timeline(&gw).await.unwrap();

        assert_eq!(feed.tweets().len(), FEED_PAGE_SIZE);
        assert_eq!(feed.tweets()[0].id.as_str(), "t29");
        assert_eq!(feed.tweets()[1].id.as_str(), "t28");
    }

    #[tokio::test]
    async fn author_filter_excludes_other_users() {
        let gw = MemoryGateway::new();
        seed(&gw, "a", "u1", 1);
        seed(&gw, "b", "u2", 2);
        seed(&gw, "c", "u1", 3);

        let mut feed = Feed::new();
        feed.load_for_author(&gw, &UserId::new("u1")).await.unwrap();

        let ids: Vec<&str> = feed.tweets().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn local_remove_and_replace_touch_only_this_list() {
        let gw = MemoryGateway::new();
        seed(&gw, "a", "u1", 1);
        seed(&gw, "b", "u1", 2);

        let mut feed = Feed::new();
        feed.load_timeline(&gw).await.unwrap();
        let mut sibling = Feed::new();
        sibling.load_timeline(&gw).await.unwrap();

        feed.remove(&TweetId::new("a"));
        let mut edited = feed.tweets()[0].clone();
        edited.text = "edited".into();
        feed.replace(edited);

        assert_eq!(feed.tweets().len(), 1);
        assert_eq!(feed.tweets()[0].text, "edited");
        // the sibling view still holds the stale snapshot
        assert_eq!(sibling.tweets().len(), 2);
        assert_eq!(sibling.tweets()[0].text, "tweet b");
    }
}
