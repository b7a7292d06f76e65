//! Bulk JSON import
//!
//! Accepts one record object or an array of them. Records that fail the
//! shape check, or whose fields cannot be read as a record, are skipped and reported; the rest are stamped and written
//! in batches.

use crate::auth::Session;
use crate::error::{ConnectError, ImportError};
use crate::members::MemberService;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spss_access::Action;
use spss_model::{RecordData, RecordMetadata};
use spss_store::StoreError;
use tracing::{info, warn};

/// `createdBy` for imports without a signed-in user
pub const IMPORTER: &str = "import";

/// Raw import text from the two input sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportInput {
    /// Pasted text; wins when non-blank
    pub paste: Option<String>,
    /// Contents of a chosen file
    pub file: Option<String>,
}

impl ImportInput {
    /// From pasted text
    #[must_use]
    pub fn pasted(text: impl Into<String>) -> Self {
        Self { paste: Some(text.into()), file: None }
    }

    /// From file contents
    #[must_use]
    pub fn from_file(contents: impl Into<String>) -> Self {
        Self { paste: None, file: Some(contents.into()) }
    }

    /// The text to parse, if any source has some
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        fn non_blank(source: &Option<String>) -> Option<&str> {
            source.as_deref().map(str::trim).filter(|t| !t.is_empty())
        }
        non_blank(&self.paste).or_else(|| non_blank(&self.file))
    }
}

/// A record left out of the import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// 0-based position in the input
    pub index: usize,
    pub reason: &'static str,
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl ImportReport {
    /// `Imported N record(s).` plus the skipped count when there is one
    #[must_use]
    pub fn summary(&self) -> String {
        if self.skipped.is_empty() {
            format!("Imported {} record(s).", self.imported)
        } else {
            format!(
                "Imported {} record(s). {} record(s) skipped (invalid).",
                self.imported,
                self.skipped.len()
            )
        }
    }
}

/// Why a value cannot be imported as a record, if it cannot
#[must_use]
pub fn check_shape(record: &Value) -> Option<&'static str> {
    let Some(obj) = record.as_object() else {
        return Some("Not an object");
    };
    let Some(pd) = obj.get("personalDetails").and_then(Value::as_object) else {
        return Some("Missing personalDetails");
    };
    match pd.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => {}
        _ => return Some("Missing personalDetails.name"),
    }
    if is_present(obj.get("members")) && !obj["members"].is_array() {
        return Some("members must be an array");
    }
    if is_present(obj.get("nonMembers")) && !obj["nonMembers"].is_array() {
        return Some("nonMembers must be an array");
    }
    // Metadata is replaced on import, so only the editable part must decode
    if RecordData::deserialize(record).is_err() {
        return Some("Unreadable field values");
    }
    None
}

fn is_present(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

/// Parse import text into candidate records
///
/// # Errors
/// `ImportError::InvalidJson` when the text is not JSON
pub fn parse(text: &str) -> Result<Vec<Value>, ImportError> {
    match serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))? {
        Value::Array(items) => Ok(items),
        single => Ok(vec![single]),
    }
}

/// Split candidates into valid records and skipped entries
#[must_use]
pub fn partition(records: Vec<Value>) -> (Vec<Value>, Vec<SkippedRecord>) {
    let mut valid = Vec::new();
    let mut skipped = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        match check_shape(&record) {
            Some(reason) => skipped.push(SkippedRecord { index, reason }),
            None => valid.push(record),
        }
    }
    (valid, skipped)
}

/// Fill missing lists and attach metadata
fn normalize(mut record: Value, created_by: &str, at: DateTime<Utc>) -> Result<Value, StoreError> {
    if let Some(obj) = record.as_object_mut() {
        for list in ["members", "nonMembers"] {
            let entry = obj.entry(list).or_insert(Value::Null);
            if entry.is_null() {
                *entry = Value::Array(Vec::new());
            }
        }
        obj.insert(
            "metadata".to_string(),
            serde_json::to_value(RecordMetadata::stamped(created_by, at))?,
        );
    }
    Ok(record)
}

/// Import service
#[derive(Debug, Clone)]
pub struct ImportService {
    members: MemberService,
    batch_limit: usize,
}

impl ImportService {
    /// Create service writing at most `batch_limit` records per batch
    #[must_use]
    pub fn new(members: MemberService, batch_limit: usize) -> Self {
        Self {
            members,
            batch_limit: batch_limit.max(1),
        }
    }

    /// Validate, stamp and write the records in `input`
    ///
    /// # Errors
    /// - `ConnectError::Access` unless the role may import
    /// - `ConnectError::Import` for missing or malformed input, or when no
    ///   record passes the shape check
    /// - `ConnectError::Store` when a batch fails
    pub async fn import(&self, session: &Session, input: &ImportInput) -> Result<ImportReport, ConnectError> {
        session.require(Action::Import)?;

        let text = input.text().ok_or(ImportError::NoData)?;
        let (valid, skipped) = partition(parse(text)?);
        if valid.is_empty() {
            return Err(ImportError::NoValidRecords { invalid: skipped.len() }.into());
        }
        if !skipped.is_empty() {
            warn!(skipped = skipped.len(), valid = valid.len(), "import skipping invalid records");
        }

        let created_by = session.uid_or(IMPORTER);
        let now = Utc::now();
        let bodies = valid
            .into_iter()
            .map(|r| normalize(r, &created_by, now))
            .collect::<Result<Vec<_>, _>>()?;

        let mut imported = 0;
        let mut rest = bodies;
        while !rest.is_empty() {
            let tail = rest.split_off(rest.len().min(self.batch_limit));
            imported += self.members.write_batch(rest).await?;
            rest = tail;
        }

        info!(count = imported, skipped = skipped.len(), "import complete");
        Ok(ImportReport { imported, skipped })
    }
}
