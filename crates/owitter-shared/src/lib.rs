//! # owitter-shared
//!
//! Domain models and constants shared between the gateway bindings and the
//! client workflows.  Everything here is plain data: the structs mirror the
//! JSON field layout the hosted backend stores, and the constants pin down
//! the conventions (collection names, blob paths, size limits) both sides
//! rely on.

pub mod constants;
pub mod models;
pub mod types;

pub use models::{AuthUser, Tweet, TweetFields};
pub use types::{TweetId, UserId};
