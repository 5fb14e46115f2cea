//! Sorting decorator for any store.
//!
//! [`SortableDecorator`] adds client-side key ordering to any [`Store`].
//! [`sort`](crate::Sortable::sort) records [`SortFlags`] without touching
//! storage; the next [`keys`](Store::keys) call applies them. The request
//! is one-shot: any [`set`](Store::set) clears the pending flags, so
//! ordering is a per-read hint, not a standing index.
//!
//! # Orderings
//!
//! - [`SortFlags::Regular`] — by coerced numeric value (strings contribute
//!   their leading numeric prefix, or zero), ties broken integer-first and
//!   then bytewise on the string form.
//! - [`SortFlags::Numeric`] — both operands coerced to numbers; strings
//!   contribute their leading numeric prefix (or zero).
//! - [`SortFlags::Lexicographic`] — bytewise on the key's string form,
//!   optionally ASCII case-folded.
//! - [`SortFlags::Natural`] — like lexicographic, but embedded digit runs
//!   compare as magnitudes (`"item2"` before `"item10"`), optionally
//!   case-folded.

use std::{borrow::Cow, cmp::Ordering, collections::BTreeMap};

use parking_lot::Mutex;

use crate::{
    error::StoreResult,
    key::Key,
    store::{Sortable, Store},
    value::Value,
};

/// Key ordering applied by [`SortableDecorator::keys`](Store::keys).
///
/// Case folding combines with the string-based orders; it has no effect on
/// `Regular` and `Numeric`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortFlags {
    /// Standard comparison: by coerced numeric value, ties broken
    /// integer-first and then bytewise on the string form.
    #[default]
    Regular,
    /// Numeric comparison; operands are coerced to numbers.
    Numeric,
    /// Bytewise string comparison of the key's string form.
    Lexicographic {
        /// Fold ASCII case before comparing.
        fold_case: bool,
    },
    /// Natural-order comparison: digit runs compare as magnitudes.
    Natural {
        /// Fold ASCII case before comparing.
        fold_case: bool,
    },
}

impl SortFlags {
    /// Compares two keys under this ordering.
    #[must_use]
    pub fn compare(&self, a: &Key, b: &Key) -> Ordering {
        match *self {
            Self::Regular => regular_cmp(a, b),
            Self::Numeric => numeric_coercion(a).total_cmp(&numeric_coercion(b)),
            Self::Lexicographic { fold_case } => {
                string_cmp(a, b, fold_case, |a, b| a.as_bytes().cmp(b.as_bytes()))
            },
            Self::Natural { fold_case } => string_cmp(a, b, fold_case, natural_cmp),
        }
    }
}

// Lexicographic on (coerced number, type tag, string form). Comparing
// through one key function keeps the order total even when integer and
// string keys mix; pairwise special cases would not.
fn regular_cmp(a: &Key, b: &Key) -> Ordering {
    numeric_coercion(a)
        .total_cmp(&numeric_coercion(b))
        .then_with(|| type_rank(a).cmp(&type_rank(b)))
        .then_with(|| string_form(a).as_bytes().cmp(string_form(b).as_bytes()))
}

fn type_rank(key: &Key) -> u8 {
    match key {
        Key::Int(_) => 0,
        Key::Str(_) => 1,
    }
}

fn numeric_coercion(key: &Key) -> f64 {
    match key {
        Key::Int(i) => *i as f64,
        Key::Str(s) => leading_number(s),
    }
}

/// Numeric coercion of a string: its leading number, or zero.
///
/// Accepts an optional sign, decimal digits with an optional fraction, and
/// an optional exponent; anything past the leading number is ignored.
fn leading_number(s: &str) -> f64 {
    let t = s.trim_start();
    let b = t.as_bytes();
    let mut i = 0usize;
    if matches!(b.first(), Some(b'+') | Some(b'-')) {
        i = 1;
    }
    let mut digits = 0usize;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < b.len() && b[i] == b'.' {
        let mut j = i + 1;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > i + 1 {
            digits += j - i - 1;
            i = j;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    let mut end = i;
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }
    t[..end].parse().unwrap_or(0.0)
}

fn string_cmp(a: &Key, b: &Key, fold_case: bool, cmp: fn(&str, &str) -> Ordering) -> Ordering {
    let a = string_form(a);
    let b = string_form(b);
    if fold_case {
        cmp(&a.to_ascii_lowercase(), &b.to_ascii_lowercase())
    } else {
        cmp(&a, &b)
    }
}

fn string_form(key: &Key) -> Cow<'_, str> {
    match key {
        Key::Int(i) => Cow::Owned(i.to_string()),
        Key::Str(s) => Cow::Borrowed(s),
    }
}

/// Natural-order comparison: digit runs compare as magnitudes, everything
/// else bytewise.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ab = a.as_bytes();
    let bb = b.as_bytes();
    let (mut i, mut j) = (0usize, 0usize);
    while i < ab.len() && j < bb.len() {
        if ab[i].is_ascii_digit() && bb[j].is_ascii_digit() {
            let run_a = digit_run(ab, &mut i);
            let run_b = digit_run(bb, &mut j);
            let ta = trim_leading_zeros(run_a);
            let tb = trim_leading_zeros(run_b);
            let ord = ta.len().cmp(&tb.len()).then_with(|| ta.cmp(tb));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = ab[i].cmp(&bb[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }
    (ab.len() - i).cmp(&(bb.len() - j))
}

fn digit_run<'a>(bytes: &'a [u8], pos: &mut usize) -> &'a [u8] {
    let start = *pos;
    while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
        *pos += 1;
    }
    &bytes[start..*pos]
}

fn trim_leading_zeros(run: &[u8]) -> &[u8] {
    let zeros = run.iter().take_while(|&&c| c == b'0').count();
    // Keep a single zero for all-zero runs.
    &run[zeros.min(run.len().saturating_sub(1))..]
}

/// A decorator adding one-shot key ordering to any store.
///
/// # Example
///
/// ```
/// use polystore::{Key, MemoryStore, Sortable, SortableDecorator, SortFlags, Store, Value};
///
/// let store = SortableDecorator::new(MemoryStore::new());
/// for key in ["c", "a", "b"] {
///     store.set(Key::from(key), Value::Null)?;
/// }
/// store.sort(SortFlags::default());
/// assert_eq!(store.keys()?, vec![Key::from("a"), Key::from("b"), Key::from("c")]);
/// # Ok::<(), polystore::StoreError>(())
/// ```
#[derive(Debug)]
pub struct SortableDecorator<S> {
    store: S,
    pending: Mutex<Option<SortFlags>>,
}

impl<S: Store> SortableDecorator<S> {
    /// Wraps a store.
    pub fn new(store: S) -> Self {
        Self { store, pending: Mutex::new(None) }
    }

    /// Returns a reference to the wrapped store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Unwraps the decorator, returning the wrapped store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: Store> Store for SortableDecorator<S> {
    fn set(&self, key: Key, value: Value) -> StoreResult<()> {
        // Mutation voids the pending sort request.
        *self.pending.lock() = None;
        self.store.set(key, value)
    }

    fn get_or_fail(&self, key: &Key) -> StoreResult<Value> {
        self.store.get_or_fail(key)
    }

    fn get(&self, key: &Key, default: Value) -> StoreResult<Value> {
        self.store.get(key, default)
    }

    fn get_multiple(&self, keys: &[Key], default: Value) -> StoreResult<BTreeMap<Key, Value>> {
        self.store.get_multiple(keys, default)
    }

    fn get_multiple_or_fail(&self, keys: &[Key]) -> StoreResult<BTreeMap<Key, Value>> {
        self.store.get_multiple_or_fail(keys)
    }

    fn remove(&self, key: &Key) -> StoreResult<bool> {
        self.store.remove(key)
    }

    fn exists(&self, key: &Key) -> StoreResult<bool> {
        self.store.exists(key)
    }

    fn clear(&self) -> StoreResult<()> {
        self.store.clear()
    }

    fn keys(&self) -> StoreResult<Vec<Key>> {
        let pending = *self.pending.lock();
        let mut keys = self.store.keys()?;
        if let Some(flags) = pending {
            keys.sort_by(|a, b| flags.compare(a, b));
        }
        Ok(keys)
    }
}

impl<S: Store> Sortable for SortableDecorator<S> {
    fn sort(&self, flags: SortFlags) {
        *self.pending.lock() = Some(flags);
    }
}
