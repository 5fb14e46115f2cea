//! Value serialization for byte-oriented backends.
//!
//! Backends that can only store byte sequences (files, remote caches,
//! byte-level key-value servers) run every value through [`serialize`] on
//! write and [`deserialize`] on read. The encoding is CBOR via [`ciborium`]:
//! self-describing, binary-safe (embedded NUL bytes and arbitrary byte
//! ranges round-trip exactly), and able to carry the full [`Value`] range
//! including 64-bit integers and floats at native precision.
//!
//! Both functions are pure — no I/O, no shared state — and safe for
//! concurrent invocation. Decode failures carry the decoder's own
//! diagnostic (kind and byte offset) in the error message instead of
//! discarding it.
//!
//! The serialized form is opaque to the store contract; its only external
//! guarantee is round-trip fidelity: `deserialize(serialize(v)) == v` with
//! deep equality for structured values.

use crate::{
    error::{StoreError, StoreResult},
    value::Value,
};

/// Serializes a value into its storable byte form.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] when the encoder refuses the
/// value. The message names the offending value's runtime type.
pub fn serialize(value: &Value) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| {
        StoreError::serialization(format!(
            "value of type {} refused encoding: {e}",
            value.type_name()
        ))
    })?;
    Ok(buf)
}

/// Deserializes a value from its storable byte form.
///
/// # Errors
///
/// Returns [`StoreError::Deserialization`] when the bytes are not a valid
/// encoding. The decoder's diagnostic is attached to the message.
pub fn deserialize(bytes: &[u8]) -> StoreResult<Value> {
    ciborium::from_reader(bytes)
        .map_err(|e| StoreError::deserialization(format!("invalid serialized form: {e}")))
}
