//! Backend traits
//!
//! Services hold these as `Arc<dyn _>` so the managed backends and the
//! in-process ones are interchangeable.

use crate::document::Document;
use crate::error::{AuthError, StoreError};
use serde_json::{Map, Value};
use spss_model::UserId;

/// Maximum documents committed in one backend write batch
pub const BATCH_LIMIT: usize = 500;

/// Document database boundary
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Add a document with a generated id
    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    /// Fetch a document, `None` when absent
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create or overwrite a document
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Merge `patch` into an existing document
    ///
    /// Keys containing dots address nested fields.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if the document does not exist
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Delete a document; deleting a missing document is not an error
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// All documents of a collection
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Documents whose field at `field_path` equals `value`
    async fn query_eq(
        &self,
        collection: &str,
        field_path: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    /// Add many documents, committed in batches of at most [`BATCH_LIMIT`]
    ///
    /// Returns the number of documents written.
    async fn batch_write(&self, collection: &str, docs: Vec<Value>) -> Result<usize, StoreError>;
}

/// Signed-in account as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthUser {
    /// Provider-assigned id
    pub uid: UserId,
    /// Account email
    pub email: String,
}

/// Identity provider boundary
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account
    ///
    /// Does not change who is signed in.
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Sign in and become the current user
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Sign out the current user
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Currently signed-in user
    fn current_user(&self) -> Option<AuthUser>;
}
