//! Tolerant field decoders for free-form documents
//!
//! Bulk imports and older clients write `null`, numbers and `"yes"` where the
//! model expects text or flags. These decoders accept those values so every
//! stored record stays readable.

use serde::de::{Deserialize, Deserializer, Error};
use serde_json::Value;

/// Text field: `null` is empty, numbers and booleans become their text
///
/// # Errors
/// Arrays and objects are rejected
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected text, found {other}"))),
    }
}

/// Yes/no field: accepts booleans, `null`, `"yes"`/`"true"`/`"1"` and numbers
///
/// # Errors
/// Arrays, objects and unrecognised strings are rejected
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|x| x.abs() > 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "1" => Ok(true),
            "" | "no" | "n" | "false" | "0" => Ok(false),
            other => Err(D::Error::custom(format!("expected yes or no, found {other:?}"))),
        },
        other => Err(D::Error::custom(format!("expected yes or no, found {other}"))),
    }
}

/// Nested value: `null` decodes as the default
///
/// # Errors
/// Whatever `T` rejects
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Loose {
        #[serde(deserialize_with = "text")]
        t: String,
        #[serde(deserialize_with = "flag")]
        f: bool,
        #[serde(deserialize_with = "or_default")]
        items: Vec<String>,
    }

    fn decode(value: serde_json::Value) -> Result<Loose, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn text_accepts_scalars() {
        assert_eq!(decode(json!({"t": null})).unwrap().t, "");
        assert_eq!(decode(json!({"t": 9_847_012_345_u64})).unwrap().t, "9847012345");
        assert_eq!(decode(json!({"t": true})).unwrap().t, "true");
        assert!(decode(json!({"t": ["a"]})).is_err());
    }

    #[test]
    fn flag_accepts_words() {
        assert!(decode(json!({"f": "Yes"})).unwrap().f);
        assert!(decode(json!({"f": "true"})).unwrap().f);
        assert!(decode(json!({"f": 1})).unwrap().f);
        assert!(!decode(json!({"f": null})).unwrap().f);
        assert!(!decode(json!({"f": "no"})).unwrap().f);
        assert!(decode(json!({"f": "maybe"})).is_err());
    }

    #[test]
    fn null_nested_is_default() {
        assert!(decode(json!({"items": null})).unwrap().items.is_empty());
        assert!(decode(json!({})).unwrap().items.is_empty());
    }
}
