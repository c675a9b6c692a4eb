//! Entity identifiers, allocation, and the per-entity component record.
//!
//! An [`EntityId`] is a lightweight `u64` handle. The [`Entity`] record owned
//! by the store pairs that id with the entity's components and remembers which
//! tags and groups refer to it, so the store can unlink it in one pass.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentKind, ComponentValue};

/// A unique entity identifier.
///
/// Ids are allocated by the [`EntityStore`](crate::EntityStore) in strictly
/// increasing order and are never reused, so comparing two ids also compares
/// their creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Create an entity id from a raw `u64`.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity ids, starting at zero.
#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next_id: u64,
}

impl EntityIdAllocator {
    /// Creates a new allocator.
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Allocates a fresh id.
    pub fn allocate(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }
}

/// A live entity: its id plus the components attached to it.
///
/// Components are keyed by [`ComponentKind`]; at most one value of each kind
/// is attached. Tags and groups are maintained by the store and are read-only
/// here.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    components: BTreeMap<ComponentKind, ComponentValue>,
    pub(crate) tags: BTreeSet<String>,
    pub(crate) groups: BTreeSet<String>,
}

impl Entity {
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            id,
            components: BTreeMap::new(),
            tags: BTreeSet::new(),
            groups: BTreeSet::new(),
        }
    }

    /// Returns this entity's id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the component of type `C`, if attached.
    #[must_use]
    pub fn get<C: Component>(&self) -> Option<&C> {
        self.components.get(&C::KIND).and_then(C::from_value)
    }

    /// Returns a mutable reference to the component of type `C`, if attached.
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut(&C::KIND).and_then(C::from_value_mut)
    }

    /// Attach a component, returning the previous value of the same kind.
    pub fn insert<C: Component>(&mut self, component: C) -> Option<C> {
        self.components
            .insert(C::KIND, component.into())
            .and_then(C::from_owned)
    }

    /// Detach the component of type `C`, returning it.
    pub fn remove<C: Component>(&mut self) -> Option<C> {
        self.components.remove(&C::KIND).and_then(C::from_owned)
    }

    /// Attach an already-wrapped component value, returning the previous
    /// value of the same kind.
    pub fn insert_value(&mut self, value: ComponentValue) -> Option<ComponentValue> {
        self.components.insert(value.kind(), value)
    }

    /// Returns the raw component slot for `kind`.
    #[must_use]
    pub fn value(&self, kind: ComponentKind) -> Option<&ComponentValue> {
        self.components.get(&kind)
    }

    /// Detach the component of the given kind.
    pub fn remove_kind(&mut self, kind: ComponentKind) -> Option<ComponentValue> {
        self.components.remove(&kind)
    }

    /// Returns `true` if a component of `kind` is attached.
    #[must_use]
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    /// Iterate over the kinds of all attached components.
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.keys().copied()
    }

    /// Iterate over the tags currently pointing at this entity.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Iterate over the groups this entity belongs to.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use engine_math::Vec2;

    use super::*;
    use crate::component::{Position, Velocity};

    #[test]
    fn test_allocator_produces_increasing_ids() {
        let mut alloc = EntityIdAllocator::new();
        let e0 = alloc.allocate();
        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        assert_eq!(e0.raw(), 0);
        assert_eq!(e1.raw(), 1);
        assert_eq!(e2.raw(), 2);
        assert!(e0 < e1 && e1 < e2);
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityId::from_raw(7).to_string(), "Entity(7)");
    }

    #[test]
    fn test_insert_and_get_component() {
        let mut e = Entity::new(EntityId(0));
        assert!(e.get::<Position>().is_none());

        assert!(e.insert(Position::new(1.0, 2.0)).is_none());
        assert_eq!(e.get::<Position>(), Some(&Position::new(1.0, 2.0)));
        assert!(e.has(ComponentKind::Position));
        assert!(!e.has(ComponentKind::Velocity));
    }

    #[test]
    fn test_insert_replaces_previous_value() {
        let mut e = Entity::new(EntityId(0));
        e.insert(Position::new(1.0, 1.0));
        let old = e.insert(Position::new(2.0, 2.0));
        assert_eq!(old, Some(Position::new(1.0, 1.0)));
        assert_eq!(e.kinds().count(), 1);
    }

    #[test]
    fn test_get_mut_and_remove() {
        let mut e = Entity::new(EntityId(3));
        e.insert(Velocity(Vec2::new(1.0, 0.0)));
        if let Some(v) = e.get_mut::<Velocity>() {
            v.0.y = 5.0;
        }
        assert_eq!(e.remove::<Velocity>(), Some(Velocity(Vec2::new(1.0, 5.0))));
        assert!(e.remove::<Velocity>().is_none());
    }

    #[test]
    fn test_raw_value_access() {
        let mut e = Entity::new(EntityId(1));
        e.insert_value(ComponentValue::Position(Position::new(0.0, 3.0)));
        assert_eq!(
            e.value(ComponentKind::Position).map(ComponentValue::kind),
            Some(ComponentKind::Position)
        );
        assert!(e.remove_kind(ComponentKind::Position).is_some());
        assert!(e.kinds().next().is_none());
    }
}
