//! Household record CRUD over the `member_details` collection

use crate::auth::Session;
use crate::error::ConnectError;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use spss_access::Action;
use spss_model::{Record, RecordData, RecordId, RecordMetadata, MEMBER_DETAILS};
use spss_store::{Document, DocumentStore, StoreError};
use std::sync::Arc;
use tracing::{info, warn};

/// `createdBy` for records created while signed out
pub const ANONYMOUS: &str = "anonymous";

/// Record service
#[derive(Clone)]
pub struct MemberService {
    store: Arc<dyn DocumentStore>,
}

impl MemberService {
    /// Create service over a document store
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store a new record with fresh metadata
    ///
    /// # Errors
    /// `ConnectError::Access` unless the role may create
    pub async fn create(&self, session: &Session, data: RecordData) -> Result<RecordId, ConnectError> {
        session.require(Action::Create)?;

        let metadata = RecordMetadata::stamped(session.uid_or(ANONYMOUS), Utc::now());
        let body = serde_json::to_value(data.into_record(metadata)).map_err(StoreError::from)?;
        let id = RecordId::from(self.store.add(MEMBER_DETAILS, body).await?);

        info!(record_id = %id, role = %session.role(), "record created");
        Ok(id)
    }

    /// Fetch one record
    ///
    /// # Errors
    /// `ConnectError::Store` on backend failure
    pub async fn get(&self, id: &RecordId) -> Result<Option<Record>, ConnectError> {
        self.store
            .get(MEMBER_DETAILS, id.as_str())
            .await?
            .map(decode_record)
            .transpose()
    }

    /// Every record, in backend order
    ///
    /// Documents that no longer decode are skipped with a warning.
    ///
    /// # Errors
    /// `ConnectError::Store` on backend failure
    pub async fn list_all(&self) -> Result<Vec<Record>, ConnectError> {
        let docs = self.store.list(MEMBER_DETAILS).await?;
        Ok(decode_all(docs))
    }

    /// Records whose owner belongs to `sabha`
    ///
    /// # Errors
    /// `ConnectError::Store` on backend failure
    pub async fn list_by_sabha(&self, sabha: &str) -> Result<Vec<Record>, ConnectError> {
        let docs = self
            .store
            .query_eq(
                MEMBER_DETAILS,
                "personalDetails.pradeshikaSabha",
                &Value::String(sabha.to_string()),
            )
            .await?;
        Ok(decode_all(docs))
    }

    /// Replace the editable body of a record
    ///
    /// `shared` marks an edit arriving through a share link, which any role
    /// may submit. Only `metadata.updatedAt` is refreshed.
    ///
    /// # Errors
    /// - `ConnectError::Access` unless the role may update (or `shared`)
    /// - `ConnectError::Store` with `NotFound` for a missing record
    pub async fn update(
        &self,
        session: &Session,
        id: &RecordId,
        data: RecordData,
        shared: bool,
    ) -> Result<(), ConnectError> {
        if !shared {
            session.require(Action::Update)?;
        }

        let patch = update_patch(&data, Utc::now())?;
        self.store.update(MEMBER_DETAILS, id.as_str(), patch).await?;
        info!(record_id = %id, shared, "record updated");
        Ok(())
    }

    /// Delete a record
    ///
    /// # Errors
    /// `ConnectError::Access` unless the role may delete
    pub async fn delete(&self, session: &Session, id: &RecordId) -> Result<(), ConnectError> {
        session.require(Action::Delete)?;
        self.store.delete(MEMBER_DETAILS, id.as_str()).await?;
        info!(record_id = %id, "record deleted");
        Ok(())
    }

    /// Write prepared record bodies in batches
    pub(crate) async fn write_batch(&self, bodies: Vec<Value>) -> Result<usize, ConnectError> {
        Ok(self.store.batch_write(MEMBER_DETAILS, bodies).await?)
    }
}

impl std::fmt::Debug for MemberService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberService").finish_non_exhaustive()
    }
}

fn decode_record(doc: Document) -> Result<Record, ConnectError> {
    let record: Record = doc.decode().map_err(StoreError::from)?;
    Ok(record.with_id(RecordId::from(doc.id)))
}

fn decode_all(docs: Vec<Document>) -> Vec<Record> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            decode_record(doc)
                .map_err(|e| warn!(record_id = %id, error = %e, "skipping undecodable record"))
                .ok()
        })
        .collect()
}

/// Editable body plus the `metadata.updatedAt` stamp, as a merge patch
fn update_patch(data: &RecordData, at: DateTime<Utc>) -> Result<Map<String, Value>, StoreError> {
    let mut patch = match serde_json::to_value(data)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    patch.insert("metadata.updatedAt".to_string(), serde_json::to_value(at)?);
    Ok(patch)
}
