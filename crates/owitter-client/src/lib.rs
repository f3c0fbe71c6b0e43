//! # owitter-client
//!
//! Workflow layer of the Owitter client.  Each screen of the UI maps onto a
//! small state-holding component here: the feed, a tweet card with its
//! edit/save/delete workflow, the composer, the profile page and the auth
//! flows.  Components own only their local state and talk to the backend
//! through gateway handles passed into every call; there is no process-wide
//! session or client singleton.
//!
//! Remote failures are caught, logged and absorbed: every workflow returns
//! the component to an interactive state, possibly out of sync with the
//! backend.  That is deliberate; the multi-step mutations are not
//! transactional and earlier completed steps are never rolled back.

pub mod auth;
pub mod compose;
pub mod feed;
pub mod profile;
pub mod prompt;
pub mod state;
pub mod tweet;

use tracing_subscriber::{fmt, EnvFilter};

pub use auth::{PasswordReset, ResetOutcome};
pub use compose::{PostOutcome, TweetComposer};
pub use feed::Feed;
pub use profile::{AvatarOutcome, ProfilePage, RenameOutcome};
pub use prompt::{AutoConfirm, Prompt, RecordingPrompt};
pub use state::Session;
pub use tweet::{DeleteOutcome, SaveOutcome, StagedPhoto, TweetCard};

/// Initialise structured logging for an embedding shell.  Call once at
/// startup; `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("owitter_client=debug,owitter_gateway=debug,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::info!("Owitter client starting");
}
