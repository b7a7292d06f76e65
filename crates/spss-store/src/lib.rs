//! SPSS Connect backend boundary
//!
//! The application keeps no server of its own: documents live in a managed
//! document database and accounts in a managed identity provider. This crate
//! is the only place that talks to either.
//!
//! # Architecture
//!
//! ```text
//! services ──► DocumentStore ──► MemoryStore (in-process, snapshot file)
//!          └─► IdentityProvider ──► MemoryIdentityProvider
//! ```
//!
//! The in-process backends stand in for the managed services in the CLI and
//! in tests; they keep the same observable contract (merge updates, dotted
//! field paths, 500-document write batches, provider error codes).

#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod identity;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use document::{apply_patch, get_path, set_path, Document};
pub use error::{friendly_auth_message, AuthError, AuthErrorCode, StoreError, AUTH_GENERIC_MESSAGE};
pub use identity::{Account, MemoryIdentityProvider, MIN_PASSWORD_LEN};
pub use memory::{Collections, MemoryStore};
pub use snapshot::Snapshot;
pub use traits::{AuthUser, DocumentStore, IdentityProvider, BATCH_LIMIT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
