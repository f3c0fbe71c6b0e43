/// Application name
pub const APP_NAME: &str = "Owitter";

/// Document-store collection holding all tweets
pub const TWEETS_COLLECTION: &str = "tweets";

/// Wire field names inside a tweet document
pub const FIELD_TEXT: &str = "tweet";
pub const FIELD_PHOTO: &str = "photo";
pub const FIELD_AUTHOR_ID: &str = "userId";
pub const FIELD_USERNAME: &str = "username";
pub const FIELD_CREATED_AT: &str = "createdAt";

/// Maximum accepted photo size in bytes.  Files at or above this size are
/// rejected at staging time, before any upload.
pub const MAX_PHOTO_BYTES: usize = 1_000_000;

/// Number of tweets fetched per feed snapshot
pub const FEED_PAGE_SIZE: usize = 25;

/// Default base URL for the hosted backend's REST surface
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
