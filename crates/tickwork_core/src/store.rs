//! Capabilities the schedulers consume from their collaborators.

use tickwork_entity::{Component, Entity};

/// Entity/component storage as seen by entity-targeted actions.
pub trait EntityStore {
    /// Whether `entity` still refers to something. Must be a pure query.
    fn is_alive(&self, entity: Entity) -> bool;

    /// Component `C` of `entity`, if the entity is alive and has one.
    fn component<C: Component>(&self, entity: Entity) -> Option<&C>;

    /// Mutable component `C` of `entity`, if the entity is alive and has one.
    fn component_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C>;
}

/// Fire-and-forget event publication.
///
/// Implementations queue the event for a later broadcast; nothing is
/// delivered while the scheduler is draining.
pub trait EventSink {
    fn publish<T: 'static>(&mut self, event: T);
}
