//! Entity handles.
//!
//! An [`Entity`] carries no data and no liveness of its own. Whether a handle
//! still refers to something is a question only the owning store can answer,
//! which is why schedulers re-check handles at execution time.

use serde::{Deserialize, Serialize};

/// An opaque entity handle, minted by an entity store.
///
/// Serialises as its bare `u64` so handles can appear in event payloads and
/// logs without a wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(pub u64);

impl Entity {
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_display() {
        assert_eq!(Entity::from_raw(12).to_string(), "Entity(12)");
    }

    #[test]
    fn test_entity_serializes_as_plain_number() {
        let json = serde_json::to_string(&Entity::from_raw(5)).unwrap();
        assert_eq!(json, "5");
        let back: Entity = serde_json::from_str("5").unwrap();
        assert_eq!(back, Entity(5));
    }
}
