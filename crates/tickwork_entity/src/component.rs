//! The [`Component`] trait and component identity.
//!
//! Stores key their per-kind storage by [`ComponentTypeId`], which is the
//! FNV-1a 64-bit hash of the component's declared name. Two components that
//! declare the same name share storage, so names must be unique per program.

use std::any::Any;

/// Identity of a component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Hash a component name into its identity.
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Identity of the component type `C`.
    #[must_use]
    pub fn of<C: Component>() -> Self {
        Self::from_name(C::type_name())
    }
}

/// Data that can be attached to an entity.
///
/// # Examples
///
/// ```rust
/// use tickwork_entity::Component;
///
/// struct Health {
///     current: i32,
///     max: i32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: Any {
    /// Human-readable, program-unique name of this component kind.
    fn type_name() -> &'static str;

    /// Returns the [`ComponentTypeId`] for this component.
    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health;
    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    struct Armor;
    impl Component for Armor {
        fn type_name() -> &'static str {
            "Armor"
        }
    }

    #[test]
    fn test_type_id_matches_name_hash() {
        assert_eq!(Health::component_type_id(), ComponentTypeId::from_name("Health"));
        assert_eq!(ComponentTypeId::of::<Health>(), Health::component_type_id());
    }

    #[test]
    fn test_distinct_components_distinct_ids() {
        assert_ne!(ComponentTypeId::of::<Health>(), ComponentTypeId::of::<Armor>());
    }

    #[test]
    fn test_empty_name_is_offset_basis() {
        assert_eq!(
            ComponentTypeId::from_name(""),
            ComponentTypeId(0xcbf2_9ce4_8422_2325)
        );
    }
}
