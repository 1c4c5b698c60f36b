//! Newtype identifiers.
//!
//! Identity-bearing values are wrapped in distinct newtypes so they cannot be
//! confused with other UUIDs or strings flowing through the client.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a single `annotate` call.
///
/// Generated fresh for every call and recorded on the call's tracing span so
/// the request dispatch, response status and decode outcome of one exchange
/// can be correlated in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a new random request identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a [`RequestId`] from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_are_distinct() {
        assert_ne!(RequestId::new_random(), RequestId::new_random());
    }

    #[test]
    fn display_matches_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(RequestId::from_uuid(uuid).to_string(), uuid.to_string());
        assert_eq!(RequestId::from_uuid(uuid).as_uuid(), uuid);
    }
}
