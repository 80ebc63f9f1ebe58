//! Game events published from scheduled actions.

use tickwork_entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Physical,
    Poison,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDamaged {
    pub entity: Entity,
    pub amount: i32,
    pub source: Option<Entity>,
    pub kind: DamageKind,
}

/// Published once, when an entity's health first drops to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatEnded {
    pub winner: Option<Entity>,
    pub fled: bool,
}
