//! Uniform key-value storage contract with interchangeable backends and
//! composable decorators.
//!
//! This crate provides the [`Store`] trait and related types that make
//! heterogeneous key-value backends interchangeable: one contract for
//! reads, writes, batch reads, and enumeration, implemented identically by
//! every backend, with cross-cutting features added by wrapping rather than
//! by subclassing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      Decorators                             │
//! │   CachedStore │ CountableDecorator │ SortableDecorator      │
//! │          (each wraps any Store, freely stackable)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      Store trait                            │
//! │   (set, get, get_multiple, remove, exists, clear, keys)     │
//! ├──────────────┬──────────────┬────────────────────────────────┤
//! │ MemoryStore  │ JsonFileStore│           NullStore            │
//! │  (testing)   │ (persistent) │          (discarding)          │
//! └──────────────┴──────────────┴────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use polystore::{Key, MemoryStore, Store, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!
//!     // Integer and string keys are distinct identities.
//!     store.set(Key::from("user:123"), Value::from("Alice"))?;
//!     store.set(Key::from(123), Value::from("not Alice"))?;
//!
//!     assert_eq!(store.get_or_fail(&Key::from("user:123"))?, Value::from("Alice"));
//!
//!     // Reads choose their failure posture: default or error.
//!     let missing = store.get(&Key::from("gone"), Value::Null)?;
//!     assert_eq!(missing, Value::Null);
//!     assert!(store.get_or_fail(&Key::from("gone")).is_err());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Available Backends
//!
//! | Backend | Use Case | Persistence |
//! |---------|----------|-------------|
//! | [`MemoryStore`] | Testing, development | No |
//! | [`JsonFileStore`] | Small persistent datasets | Yes |
//! | [`NullStore`] | Disabling storage, baselines | No |
//!
//! # Implementing a Backend
//!
//! 1. Implement the [`Store`] trait (the batch and default-read methods
//!    come for free; override them when the backend can batch natively)
//! 2. Map backend-native errors to [`StoreError`]
//! 3. Run the conformance suite (feature `testutil`) against it
//!
//! See the [`memory`] module source for a reference implementation.
//!
//! # Error Handling
//!
//! All operations return [`StoreResult<T>`], which wraps potential
//! [`StoreError`] variants. Backends map their internal errors to these
//! standardized kinds; see [`error`] for the propagation policy.
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables the [`conformance`] suite and the `testutil` module with shared
//!   test helpers (key/value generators, store factories, assertion macros). Enable this in
//!   `[dev-dependencies]` for integration tests.

#![deny(unsafe_code)]

pub mod cache;
pub mod cached;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod conformance;
pub mod countable;
pub mod error;
pub mod json_file;
pub mod key;
pub mod memory;
pub mod null;
pub mod serializer;
pub mod sortable;
pub mod store;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;
pub mod value;

// Re-export primary types at crate root for convenience
pub use cache::{ClearCapability, MemoryCache, SecondaryCache};
pub use cached::CachedStore;
pub use countable::CountableDecorator;
pub use error::{BoxError, ConfigError, StoreError, StoreResult};
pub use json_file::{JsonFileStore, MAX_JSON_FLOAT};
pub use key::Key;
pub use memory::MemoryStore;
pub use null::NullStore;
pub use sortable::{SortFlags, SortableDecorator};
pub use store::{Countable, Sortable, Store};
pub use value::Value;
