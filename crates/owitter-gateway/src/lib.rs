//! # owitter-gateway
//!
//! The remote data gateway: everything the client knows about the hosted
//! backend.  Three narrow capabilities are modelled as traits -- a document
//! store, a blob store and an identity provider -- so the workflow layer
//! never touches a process-wide singleton; handles are constructed once and
//! passed in.
//!
//! Two implementations ship with the crate: [`RestGateway`] binds the traits
//! to the backend's JSON REST surface over `reqwest`, and [`MemoryGateway`]
//! is an in-process double with call recording and scripted failures for
//! tests and local development.

pub mod blobs;
pub mod config;
pub mod docs;
pub mod identity;
pub mod memory;
pub mod rest;

mod error;

pub use blobs::BlobStore;
pub use config::GatewayConfig;
pub use docs::{Direction, Document, DocumentStore, FieldPatch, Query, UpdatePatch};
pub use error::GatewayError;
pub use identity::{FederatedProvider, IdentityProvider, ProfileUpdate};
pub use memory::{Call, FailPoint, MemoryGateway};
pub use rest::RestGateway;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GatewayError>;
