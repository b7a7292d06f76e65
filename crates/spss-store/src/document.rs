//! Stored documents and field-path patching

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document with its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id within its collection
    pub id: String,
    /// Document body
    pub data: Value,
}

impl Document {
    /// Create new document
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Decode the body into a typed value
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }
}

/// Get value at path (dot notation)
#[must_use]
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Set value at path (dot notation)
///
/// Creates intermediate objects as needed; a non-object in the way is
/// replaced by an object.
pub fn set_path(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        match current {
            Value::Object(map) => {
                current = map
                    .entry((*segment).to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
            }
            _ => return,
        }
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        map.insert((*last).to_string(), value);
    }
}

/// Merge `patch` into `target`
///
/// Each top-level key of the patch replaces the field it names; keys with
/// dots address nested fields, so `{"metadata.updatedAt": ..}` touches only
/// that one timestamp.
pub fn apply_patch(target: &mut Value, patch: &Map<String, Value>) {
    for (key, value) in patch {
        set_path(target, key, value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn get_nested() {
        let doc = json!({ "personalDetails": { "address": { "pin": "682001" } } });
        assert_eq!(
            get_path(&doc, "personalDetails.address.pin"),
            Some(&json!("682001"))
        );
        assert_eq!(get_path(&doc, "personalDetails.name"), None);
        assert_eq!(get_path(&doc, "personalDetails.address.pin.x"), None);
    }

    #[test]
    fn set_creates_intermediates() {
        let mut doc = json!({});
        set_path(&mut doc, "metadata.updatedAt", json!("t1"));
        assert_eq!(doc, json!({ "metadata": { "updatedAt": "t1" } }));

        let mut scalar = json!({ "metadata": 5 });
        set_path(&mut scalar, "metadata.createdBy", json!("u"));
        assert_eq!(scalar, json!({ "metadata": { "createdBy": "u" } }));
    }

    #[test]
    fn patch_merges_top_level_and_dotted_keys() {
        let mut doc = json!({
            "personalDetails": { "name": "Old", "phone": "1" },
            "members": [],
            "metadata": { "createdAt": "t0", "createdBy": "u1", "updatedAt": "t0" }
        });
        let patch = json!({
            "personalDetails": { "name": "New" },
            "metadata.updatedAt": "t1"
        });

        apply_patch(&mut doc, patch.as_object().unwrap());

        assert_eq!(doc["personalDetails"], json!({ "name": "New" }));
        assert_eq!(doc["metadata"]["createdAt"], "t0");
        assert_eq!(doc["metadata"]["createdBy"], "u1");
        assert_eq!(doc["metadata"]["updatedAt"], "t1");
        assert_eq!(doc["members"], json!([]));
    }

    #[test]
    fn decode_typed() {
        #[derive(Deserialize)]
        struct Named {
            name: String,
        }
        let doc = Document::new("a", json!({ "name": "x" }));
        let named: Named = doc.decode().unwrap();
        assert_eq!(named.name, "x");
    }
}
