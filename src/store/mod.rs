//! Allow-list store abstraction.
//!
//! # Overview
//!
//! The validity of a scanned code is decided by membership in a remote
//! allow-list. This module defines:
//! - [`Snapshot`]: a normalized, point-in-time set of valid codes
//! - [`AllowListStore`]: the read interface the scan session is driven
//!   against
//! - [`StoreError`]: the failure taxonomy for lookups
//!
//! The concrete HTTP-backed store lives in [`http`]. Tests drive the
//! session with in-process fakes implementing [`AllowListStore`].
//!
//! # Normalization
//!
//! Remote stores are loose about shape. The snapshot endpoint may return a
//! JSON array of codes, an object whose *values* are the codes (sparse
//! mapping, as key/value stores tend to produce), or `null` when the node
//! has never been written. All of these normalize into a plain string set;
//! an absent or empty node is an empty set, not an error. Only transport
//! problems and unparseable payloads are reported as [`StoreError`].

pub mod http;

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

pub use http::HttpStore;

/// Failure to complete an allow-list lookup.
///
/// Carries a message rather than the underlying error value so that the
/// scan session can hold and expose it as plain observable state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached (DNS, connect, timeout, HTTP error status).
    #[error("allow-list store unreachable: {0}")]
    Transport(String),

    /// The store responded, but the payload could not be parsed.
    #[error("allow-list store returned a malformed response: {0}")]
    Malformed(String),
}

/// A point-in-time set of valid codes fetched from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    codes: HashSet<String>,
}

impl Snapshot {
    /// An empty snapshot. Membership tests against it are always negative.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize a raw JSON value into a snapshot.
    ///
    /// Accepted shapes:
    /// - `null` (node absent) and empty collections normalize to the empty set
    /// - an array: its string elements become the set
    /// - an object: its string *values* become the set
    ///
    /// Non-string elements and any other top-level shape are skipped with a
    /// warning rather than failing the lookup, so a half-written node still
    /// yields a usable (if partial) snapshot.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let codes: HashSet<String> = match value {
            Value::Null => HashSet::new(),
            Value::Array(items) => items.into_iter().filter_map(into_code).collect(),
            Value::Object(map) => map.into_iter().map(|(_, v)| v).filter_map(into_code).collect(),
            other => {
                log::warn!(
                    "allow-list node has unexpected shape ({}), treating as empty",
                    json_type_name(&other)
                );
                HashSet::new()
            }
        };

        log::debug!("normalized allow-list snapshot: {} codes", codes.len());
        Self { codes }
    }

    /// Test whether a code is present in the allow-list.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Number of codes in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the snapshot holds no codes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Snapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

fn into_code(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        skipped => {
            log::warn!(
                "skipping non-string allow-list entry of type {}",
                json_type_name(&skipped)
            );
            None
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read access to the remote allow-list.
///
/// One operation only: fetch the full snapshot. There is no per-key lookup
/// and no incremental sync; each validation is an independent, idempotent
/// read. Implementations must be safe to call from a worker thread.
pub trait AllowListStore: Send + Sync {
    /// Fetch the complete allow-list snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unreachable or its response
    /// cannot be parsed. An empty or absent allow-list is *not* an error.
    fn fetch(&self) -> Result<Snapshot, StoreError>;
}
