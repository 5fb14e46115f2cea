//! Conformance test suite run against every backend and decorator.
//!
//! The per-backend `run_all` tests verify that each implementation — and
//! decorators wrapped around each implementation — satisfy the store
//! contract identically. Fine-grained tests for `MemoryStore` give precise
//! failure reporting when the contract itself regresses.

#![allow(clippy::expect_used, clippy::panic)]

use polystore::{
    CachedStore, CountableDecorator, JsonFileStore, MemoryCache, MemoryStore, SortableDecorator,
    conformance,
};

fn json_store(dir: &tempfile::TempDir) -> JsonFileStore {
    JsonFileStore::new(dir.path().join("store.json"))
}

// ============================================================================
// Backends
// ============================================================================

#[test]
fn memory_store_conforms() {
    conformance::run_all(&MemoryStore::new());
}

#[test]
fn serializing_memory_store_conforms() {
    conformance::run_all(&MemoryStore::serializing());
}

#[test]
fn json_file_store_conforms() {
    let dir = tempfile::tempdir().expect("tempdir");
    conformance::run_all(&json_store(&dir));
}

#[test]
fn memory_store_holds_binary_values() {
    conformance::binary_values_roundtrip(&MemoryStore::new());
    conformance::binary_values_roundtrip(&MemoryStore::serializing());
}

// ============================================================================
// Decorators — each must preserve the wrapped store's contract
// ============================================================================

#[test]
fn countable_decorator_conforms() {
    conformance::run_all(&CountableDecorator::new(MemoryStore::new()));
}

#[test]
fn sortable_decorator_conforms() {
    conformance::run_all(&SortableDecorator::new(MemoryStore::new()));
}

#[test]
fn cached_store_conforms() {
    let store = CachedStore::new(MemoryStore::new(), MemoryCache::new(), None)
        .expect("MemoryCache supports delete-all");
    conformance::run_all(&store);
}

#[test]
fn cached_json_file_store_conforms() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CachedStore::new(json_store(&dir), MemoryCache::new(), None)
        .expect("MemoryCache supports delete-all");
    conformance::run_all(&store);
}

#[test]
fn fully_stacked_store_conforms() {
    let store = CachedStore::new(MemoryStore::new(), MemoryCache::new(), None)
        .expect("MemoryCache supports delete-all");
    let store = SortableDecorator::new(CountableDecorator::new(store));
    conformance::run_all(&store);
}

// ============================================================================
// Fine-grained checks against MemoryStore
// ============================================================================

#[test]
fn crud_set_then_get_returns_value() {
    conformance::crud_set_then_get_returns_value(&MemoryStore::new());
}

#[test]
fn crud_get_returns_default_for_missing_key() {
    conformance::crud_get_returns_default_for_missing_key(&MemoryStore::new());
}

#[test]
fn crud_get_or_fail_missing_is_no_such_key() {
    conformance::crud_get_or_fail_missing_is_no_such_key(&MemoryStore::new());
}

#[test]
fn crud_set_overwrites_existing() {
    conformance::crud_set_overwrites_existing(&MemoryStore::new());
}

#[test]
fn crud_null_value_is_distinct_from_absence() {
    conformance::crud_null_value_is_distinct_from_absence(&MemoryStore::new());
}

#[test]
fn crud_remove_reports_prior_existence() {
    conformance::crud_remove_reports_prior_existence(&MemoryStore::new());
}

#[test]
fn crud_exists_tracks_lifecycle() {
    conformance::crud_exists_tracks_lifecycle(&MemoryStore::new());
}

#[test]
fn crud_clear_empties_the_store() {
    conformance::crud_clear_empties_the_store(&MemoryStore::new());
}

#[test]
fn keys_empty_string_key_is_valid() {
    conformance::keys_empty_string_key_is_valid(&MemoryStore::new());
}

#[test]
fn keys_integer_and_string_identities_are_distinct() {
    conformance::keys_integer_and_string_identities_are_distinct(&MemoryStore::new());
}

#[test]
fn keys_lists_every_entry() {
    conformance::keys_lists_every_entry(&MemoryStore::new());
}

#[test]
fn batch_get_multiple_substitutes_default() {
    conformance::batch_get_multiple_substitutes_default(&MemoryStore::new());
}

#[test]
fn batch_duplicate_keys_collapse() {
    conformance::batch_duplicate_keys_collapse(&MemoryStore::new());
}

#[test]
fn batch_get_multiple_or_fail_names_all_missing() {
    conformance::batch_get_multiple_or_fail_names_all_missing(&MemoryStore::new());
}

#[test]
fn batch_mixed_key_scenario() {
    conformance::batch_mixed_key_scenario(&MemoryStore::new());
}

#[test]
fn roundtrip_scalar_fidelity() {
    conformance::roundtrip_scalar_fidelity(&MemoryStore::new());
}

#[test]
fn roundtrip_structured_values() {
    conformance::roundtrip_structured_values(&MemoryStore::new());
}
