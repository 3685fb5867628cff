//! The store abstraction consumed by session-management frameworks.
//!
//! A framework generates tokens, serializes session state and decides expiry
//! times; it hands the resulting opaque bytes to a [`SessionStore`] for
//! persistence. Implementations only move bytes in and out of storage.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Trait for session persistence backends.
///
/// Expired sessions must be treated as absent by [`find`](Self::find) and
/// [`all`](Self::all), whether or not they have been physically removed yet.
pub trait SessionStore: Send + Sync {
    /// Look up the payload for an unexpired session.
    ///
    /// Returns `Ok(None)` if the token is unknown or its session has expired.
    fn find(&self, token: &str) -> Result<Option<Vec<u8>>>;

    /// Insert a session, or replace the payload and expiry of an existing one.
    fn commit(&self, token: &str, data: &[u8], expiry: DateTime<Utc>) -> Result<()>;

    /// Remove a session. Deleting an unknown token is not an error.
    fn delete(&self, token: &str) -> Result<()>;

    /// Return every unexpired session as a map of token to payload.
    fn all(&self) -> Result<HashMap<String, Vec<u8>>>;
}
