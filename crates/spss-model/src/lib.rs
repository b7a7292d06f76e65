//! SPSS Connect data model
//!
//! Typed view of the documents kept in the backend:
//! - `member_details` household census records
//! - `users` account profiles and their roles
//! - Option catalogs used by the entry form and reports
//!
//! Field names serialize in camelCase so documents written by older clients
//! and by bulk import decode into the same types.

#![warn(unreachable_pub)]

pub mod catalog;
pub mod contact;
pub mod format;
pub mod ids;
pub mod lenient;
pub mod record;
pub mod role;
pub mod user;

pub use catalog::{Catalog, CatalogEntry};
pub use ids::{RecordId, UserId};
pub use record::{
    Address, Member, NonMember, Person, PersonalDetails, Record, RecordData, RecordMetadata,
};
pub use role::Role;
pub use user::UserProfile;

/// Collection holding household census records
pub const MEMBER_DETAILS: &str = "member_details";

/// Collection holding user profiles
pub const USERS: &str = "users";

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
