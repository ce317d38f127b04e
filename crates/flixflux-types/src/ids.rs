//! Document identifier for stored movies.
//!
//! Movie ids are opaque strings. Freshly generated ids are random UUID v4
//! strings, but any string a client sends is accepted as a lookup key and
//! handed to the store as-is -- an empty or malformed id simply matches
//! nothing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for a movie document.
///
/// Serializes transparently as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct MovieId(pub String);

impl MovieId {
    /// Generate a fresh identifier from a random UUID v4.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for MovieId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MovieId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<MovieId> for String {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_uuid_strings() {
        let id = MovieId::generate();
        assert!(id.as_str().parse::<Uuid>().is_ok());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(MovieId::generate(), MovieId::generate());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&MovieId::from("id1")).ok();
        assert_eq!(json.as_deref(), Some("\"id1\""));
    }
}
