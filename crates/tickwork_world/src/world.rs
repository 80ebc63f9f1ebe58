//! Entity and component storage.
//!
//! Components live in one map per [`ComponentTypeId`], each keyed by entity.
//! Despawning removes the entity from every map, so a stale handle never
//! resolves to data again.

use std::any::Any;
use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tickwork_core::EntityStore;
use tickwork_entity::{Component, ComponentTypeId, Entity};
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("{0} not found")]
    EntityNotFound(Entity),
    #[error("component '{component}' not found on {entity}")]
    ComponentNotFound {
        component: &'static str,
        entity: Entity,
    },
}

/// The entity/component store.
#[derive(Debug, Default)]
pub struct World {
    /// Handles minted so far. Handles start at 1 and are never recycled.
    spawned: u64,
    alive: HashSet<Entity>,
    components: HashMap<ComponentTypeId, HashMap<Entity, Box<dyn Any>>>,
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Entity lifecycle --

    /// Create a new entity with no components.
    pub fn spawn(&mut self) -> Entity {
        self.spawned += 1;
        let entity = Entity::from_raw(self.spawned);
        self.alive.insert(entity);
        debug!(entity = %entity, "spawned");
        entity
    }

    /// Destroy an entity and all its components.
    ///
    /// Returns `true` if the entity was alive.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.alive.remove(&entity) {
            return false;
        }
        for storage in self.components.values_mut() {
            storage.remove(&entity);
        }
        debug!(entity = %entity, "despawned");
        true
    }

    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.alive.len()
    }

    // -- Component operations --

    /// Attach `component` to `entity`, returning the value it replaced.
    pub fn insert<C: Component>(
        &mut self,
        entity: Entity,
        component: C,
    ) -> Result<Option<C>, WorldError> {
        if !self.contains(entity) {
            return Err(WorldError::EntityNotFound(entity));
        }
        let previous = self
            .components
            .entry(C::component_type_id())
            .or_default()
            .insert(entity, Box::new(component));
        Ok(previous.and_then(|old| old.downcast::<C>().ok()).map(|old| *old))
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Result<&C, WorldError> {
        if !self.contains(entity) {
            return Err(WorldError::EntityNotFound(entity));
        }
        self.components
            .get(&C::component_type_id())
            .and_then(|storage| storage.get(&entity))
            .and_then(|boxed| boxed.downcast_ref::<C>())
            .ok_or(WorldError::ComponentNotFound {
                component: C::type_name(),
                entity,
            })
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C, WorldError> {
        if !self.contains(entity) {
            return Err(WorldError::EntityNotFound(entity));
        }
        self.components
            .get_mut(&C::component_type_id())
            .and_then(|storage| storage.get_mut(&entity))
            .and_then(|boxed| boxed.downcast_mut::<C>())
            .ok_or(WorldError::ComponentNotFound {
                component: C::type_name(),
                entity,
            })
    }

    /// Detach and return component `C`.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Result<C, WorldError> {
        if !self.contains(entity) {
            return Err(WorldError::EntityNotFound(entity));
        }
        self.components
            .get_mut(&C::component_type_id())
            .and_then(|storage| storage.remove(&entity))
            .and_then(|boxed| boxed.downcast::<C>().ok())
            .map(|component| *component)
            .ok_or(WorldError::ComponentNotFound {
                component: C::type_name(),
                entity,
            })
    }

    #[must_use]
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.get::<C>(entity).is_ok()
    }
}

impl EntityStore for World {
    fn is_alive(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn component<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.get(entity).ok()
    }

    fn component_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.get_mut(entity).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(i32);
    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[derive(Debug, PartialEq)]
    struct Name(&'static str);
    impl Component for Name {
        fn type_name() -> &'static str {
            "Name"
        }
    }

    #[test]
    fn test_spawn_and_get() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Health(10)).unwrap();
        assert_eq!(world.get::<Health>(e), Ok(&Health(10)));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_insert_replaces() {
        let mut world = World::new();
        let e = world.spawn();
        assert_eq!(world.insert(e, Health(10)).unwrap(), None);
        assert_eq!(world.insert(e, Health(4)).unwrap(), Some(Health(10)));
    }

    #[test]
    fn test_missing_component() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Name("orc")).unwrap();
        assert_eq!(
            world.get::<Health>(e),
            Err(WorldError::ComponentNotFound {
                component: "Health",
                entity: e
            })
        );
        assert!(!world.has::<Health>(e));
        assert!(world.has::<Name>(e));
    }

    #[test]
    fn test_get_mut_and_remove() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Health(10)).unwrap();
        world.get_mut::<Health>(e).unwrap().0 -= 3;
        assert_eq!(world.remove::<Health>(e), Ok(Health(7)));
        assert!(!world.has::<Health>(e));
    }

    #[test]
    fn test_despawn_drops_components() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Health(1)).unwrap();

        assert!(world.despawn(e));
        assert!(!world.despawn(e));
        assert!(!world.is_alive(e));
        assert_eq!(world.get::<Health>(e), Err(WorldError::EntityNotFound(e)));
        assert!(world.component::<Health>(e).is_none());
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut world = World::new();
        let first = world.spawn();
        world.despawn(first);
        let second = world.spawn();
        assert_eq!(first, Entity::from_raw(1));
        assert_eq!(second, Entity::from_raw(2));
        assert!(!world.is_alive(first));
    }
}
