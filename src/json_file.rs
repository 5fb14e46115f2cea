//! File-backed store holding one JSON document per store.
//!
//! [`JsonFileStore`] persists all entries as a single JSON object on disk.
//! Every operation performs a whole-document read (and, for mutations, a
//! whole-document write), so it suits small data sets — configuration,
//! fixtures, local state — rather than high-volume workloads.
//!
//! # Medium limits
//!
//! JSON cannot hold every [`Value`]. Values the medium cannot represent are
//! rejected with [`StoreError::UnsupportedValue`] instead of being silently
//! corrupted:
//!
//! - raw binary ([`Value::Bytes`]), anywhere in the value tree
//! - non-finite floats (`NaN`, `±inf`)
//! - floats whose magnitude exceeds [`MAX_JSON_FLOAT`]
//!
//! The float ceiling is a limitation of this one adapter's encoding, not a
//! contract rule.
//!
//! # Key encoding
//!
//! JSON object properties are strings, which would collide the integer key
//! `1` with the string key `"1"`. The document therefore prefixes each
//! property with the key's kind (`i:` or `s:`), preserving the contract's
//! distinct-identity policy.
//!
//! # Concurrency
//!
//! Operations are read-modify-write on the whole file with no file locking.
//! Concurrent writers through different `JsonFileStore` instances (or
//! processes) can lose updates; serialize access externally if that
//! matters.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::debug;

use crate::{
    error::{StoreError, StoreResult},
    key::Key,
    store::{Countable, Store},
    value::Value,
};

/// The largest float magnitude the JSON document will accept.
///
/// Beyond this, the round trip through the JSON number grammar is no longer
/// faithful for this store's encoding.
pub const MAX_JSON_FLOAT: f64 = 1.0e14;

/// A key-value store backed by a JSON file.
///
/// The file is created on the first write; a missing file reads as an empty
/// store.
///
/// # Example
///
/// ```no_run
/// use polystore::{JsonFileStore, Key, Store, Value};
///
/// let store = JsonFileStore::new("/var/lib/app/state.json");
/// store.set(Key::from("retries"), Value::from(3))?;
/// assert_eq!(store.get_or_fail(&Key::from("retries"))?, Value::from(3));
/// # Ok::<(), polystore::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store persisting to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<JsonMap<String, JsonValue>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(JsonMap::new()),
            Err(e) => {
                return Err(StoreError::read_with_source(
                    format!("could not read store file {}", self.path.display()),
                    e,
                ));
            },
        };

        let document: JsonValue = serde_json::from_str(&contents).map_err(|e| {
            StoreError::deserialization(format!(
                "store file {} holds invalid JSON: {e}",
                self.path.display()
            ))
        })?;

        match document {
            JsonValue::Object(map) => Ok(map),
            other => Err(StoreError::deserialization(format!(
                "store file {} must hold a JSON object, found {}",
                self.path.display(),
                json_type_name(&other)
            ))),
        }
    }

    fn save(&self, document: &JsonMap<String, JsonValue>) -> StoreResult<()> {
        let contents = serde_json::to_string(document)
            .map_err(|e| StoreError::serialization_with_source("document encoding failed", e))?;
        fs::write(&self.path, contents).map_err(|e| {
            StoreError::write_with_source(
                format!("could not write store file {}", self.path.display()),
                e,
            )
        })?;
        debug!(path = %self.path.display(), entries = document.len(), "store file saved");
        Ok(())
    }
}

fn encode_key(key: &Key) -> String {
    match key {
        Key::Int(i) => format!("i:{i}"),
        Key::Str(s) => format!("s:{s}"),
    }
}

fn decode_key(property: &str) -> StoreResult<Key> {
    if let Some(rest) = property.strip_prefix("i:") {
        let i = rest.parse::<i64>().map_err(|e| {
            StoreError::deserialization(format!("malformed integer key property {property:?}: {e}"))
        })?;
        Ok(Key::Int(i))
    } else if let Some(rest) = property.strip_prefix("s:") {
        Ok(Key::Str(rest.to_owned()))
    } else {
        Err(StoreError::deserialization(format!(
            "store document property {property:?} lacks a key-kind prefix"
        )))
    }
}

fn value_to_json(value: &Value) -> StoreResult<JsonValue> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Int(i) => Ok(JsonValue::from(*i)),
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(StoreError::unsupported_value(
                    "the JSON file store cannot hold non-finite floats",
                ));
            }
            if f.abs() > MAX_JSON_FLOAT {
                return Err(StoreError::unsupported_value(format!(
                    "the JSON file store cannot hold floats larger than {MAX_JSON_FLOAT:e}"
                )));
            }
            Ok(JsonValue::from(*f))
        },
        Value::String(s) => Ok(JsonValue::String(s.clone())),
        Value::Bytes(_) => Err(StoreError::unsupported_value(
            "the JSON file store cannot hold raw binary data",
        )),
        Value::Array(items) => {
            items.iter().map(value_to_json).collect::<StoreResult<Vec<_>>>().map(JsonValue::Array)
        },
        Value::Map(map) => {
            let mut object = JsonMap::with_capacity(map.len());
            for (k, v) in map {
                object.insert(k.clone(), value_to_json(v)?);
            }
            Ok(JsonValue::Object(object))
        },
    }
}

fn json_to_value(json: &JsonValue) -> StoreResult<Value> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(StoreError::deserialization(format!(
                    "stored number {n} fits neither i64 nor f64"
                )))
            }
        },
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Array(items) => {
            items.iter().map(json_to_value).collect::<StoreResult<Vec<_>>>().map(Value::Array)
        },
        JsonValue::Object(object) => {
            let mut map = std::collections::BTreeMap::new();
            for (k, v) in object {
                map.insert(k.clone(), json_to_value(v)?);
            }
            Ok(Value::Map(map))
        },
    }
}

fn json_type_name(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

impl Store for JsonFileStore {
    fn set(&self, key: Key, value: Value) -> StoreResult<()> {
        // Reject unsupported values before touching the file.
        let encoded = value_to_json(&value)?;
        let mut document = self.load()?;
        document.insert(encode_key(&key), encoded);
        self.save(&document)
    }

    fn get_or_fail(&self, key: &Key) -> StoreResult<Value> {
        let document = self.load()?;
        match document.get(&encode_key(key)) {
            Some(json) => json_to_value(json),
            None => Err(StoreError::no_such_key(key.clone())),
        }
    }

    fn remove(&self, key: &Key) -> StoreResult<bool> {
        let mut document = self.load()?;
        if document.remove(&encode_key(key)).is_none() {
            return Ok(false);
        }
        self.save(&document)?;
        Ok(true)
    }

    fn exists(&self, key: &Key) -> StoreResult<bool> {
        Ok(self.load()?.contains_key(&encode_key(key)))
    }

    fn clear(&self) -> StoreResult<()> {
        self.save(&JsonMap::new())
    }

    fn keys(&self) -> StoreResult<Vec<Key>> {
        self.load()?.keys().map(|property| decode_key(property)).collect()
    }
}

impl Countable for JsonFileStore {
    fn count(&self) -> StoreResult<usize> {
        Ok(self.load()?.len())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::*;

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("store.json"))
    }

    #[test]
    fn missing_file_reads_as_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.keys().unwrap().is_empty());
        assert!(!store.exists(&Key::from("k")).unwrap());
    }

    #[test]
    fn entries_survive_reopening() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        {
            let store = JsonFileStore::new(&path);
            store.set(Key::from("k"), Value::from("persisted")).unwrap();
        }
        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get_or_fail(&Key::from("k")).unwrap(), Value::from("persisted"));
    }

    #[test]
    fn integer_and_string_keys_stay_distinct_on_disk() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(Key::from(1), Value::from("int")).unwrap();
        store.set(Key::from("1"), Value::from("str")).unwrap();
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.get_or_fail(&Key::from(1)).unwrap(), Value::from("int"));
        assert_eq!(store.get_or_fail(&Key::from("1")).unwrap(), Value::from("str"));
    }

    #[test]
    fn binary_values_are_rejected_without_corrupting_the_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(Key::from("ok"), Value::from(1)).unwrap();

        let err = store.set(Key::from("bin"), Value::Bytes(vec![0u8, 1])).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedValue { .. }), "got: {err:?}");

        // Nested binary is caught too.
        let nested = Value::Array(vec![Value::from(1), Value::Bytes(vec![2])]);
        let err = store.set(Key::from("nested"), nested).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedValue { .. }));

        // Prior entry untouched.
        assert_eq!(store.get_or_fail(&Key::from("ok")).unwrap(), Value::from(1));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn oversized_and_non_finite_floats_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        for bad in [MAX_JSON_FLOAT * 10.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = store.set(Key::from("f"), Value::Float(bad)).unwrap_err();
            assert!(matches!(err, StoreError::UnsupportedValue { .. }), "{bad} accepted");
        }
        // At the limit is fine.
        store.set(Key::from("f"), Value::Float(MAX_JSON_FLOAT)).unwrap();
        store.set(Key::from("neg"), Value::Float(-MAX_JSON_FLOAT)).unwrap();
    }

    #[test]
    fn structured_values_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let value = Value::Map(BTreeMap::from([
            ("ints".to_owned(), Value::Array(vec![Value::from(1), Value::from(i64::MAX)])),
            ("null".to_owned(), Value::Null),
            ("pi".to_owned(), Value::Float(3.25)),
        ]));
        store.set(Key::from("doc"), value.clone()).unwrap();
        assert_eq!(store.get_or_fail(&Key::from("doc")).unwrap(), value);
    }

    #[test]
    fn corrupt_file_reports_parser_diagnostic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        let err = store.keys().unwrap_err();
        assert!(matches!(err, StoreError::Deserialization { .. }), "got: {err:?}");
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn non_object_document_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"[1, 2]").unwrap();
        let store = JsonFileStore::new(&path);
        let err = store.keys().unwrap_err();
        assert!(err.to_string().contains("must hold a JSON object"));
    }

    #[test]
    fn remove_of_absent_key_does_not_rewrite_the_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(!store.remove(&Key::from("ghost")).unwrap());
        // No file was created by the no-op remove.
        assert!(!store.path().exists());
    }
}
