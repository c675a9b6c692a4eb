//! The entity store.
//!
//! [`EntityStore`] is the single owner of every live entity. Alongside the
//! canonical records it keeps three indices that are updated eagerly on every
//! mutation:
//!
//! - **id index**: id → entity, every live entity exactly once.
//! - **tag index**: tag → at most one entity. Setting a tag moves it; the
//!   previous holder silently loses it.
//! - **group index**: group → set of entities. Membership only; an entity may
//!   be in any number of groups, independently of its tags.
//!
//! Insertion order is recovered from the ids themselves: ids are allocated in
//! increasing order and never reused, so an ordered set of live ids is the
//! live sequence in creation order.
//!
//! The store does no locking. It is owned by the runtime loop, which hands
//! out borrows for the duration of one subsystem call.

use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::component::ComponentValue;
use crate::entity::{Entity, EntityId, EntityIdAllocator};

/// Owns all live entities and their tag and group indices.
#[derive(Debug, Default)]
pub struct EntityStore {
    /// Entity id allocator.
    allocator: EntityIdAllocator,
    /// Canonical entity records, keyed by id.
    entities: HashMap<EntityId, Entity>,
    /// Live ids in creation order.
    order: BTreeSet<EntityId>,
    /// Tag name to the entity currently holding it.
    tags: HashMap<String, EntityId>,
    /// Group name to member ids.
    groups: HashMap<String, BTreeSet<EntityId>>,
}

impl EntityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity with no components and return its id.
    pub fn spawn(&mut self) -> EntityId {
        let id = self.allocator.allocate();
        self.entities.insert(id, Entity::new(id));
        self.order.insert(id);
        trace!(%id, "spawned entity");
        id
    }

    /// Create a new entity with the given components attached.
    pub fn spawn_with(&mut self, components: impl IntoIterator<Item = ComponentValue>) -> EntityId {
        let id = self.spawn();
        if let Some(entity) = self.entities.get_mut(&id) {
            for value in components {
                entity.insert_value(value);
            }
        }
        id
    }

    /// Snapshot of all live entity ids in creation order.
    ///
    /// The returned vector is a copy; the store may be freely mutated while
    /// it is iterated. Ids deleted in the meantime simply resolve to `None`
    /// through [`EntityStore::get`].
    #[must_use]
    pub fn all(&self) -> Vec<EntityId> {
        self.order.iter().copied().collect()
    }

    /// Iterate over live entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Returns the entity with the given id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns the entity with the given id, mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns `true` if `id` refers to a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the entity currently holding `tag`.
    #[must_use]
    pub fn tag_lookup(&self, tag: &str) -> Option<EntityId> {
        self.tags.get(tag).copied()
    }

    /// Point `tag` at `id`, taking it from any previous holder.
    ///
    /// Does nothing and returns `false` if `id` is not live.
    pub fn set_tag(&mut self, id: EntityId, tag: impl Into<String>) -> bool {
        if !self.entities.contains_key(&id) {
            return false;
        }
        let tag = tag.into();
        if let Some(previous) = self.tags.insert(tag.clone(), id)
            && previous != id
            && let Some(holder) = self.entities.get_mut(&previous)
        {
            holder.tags.remove(&tag);
        }
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.tags.insert(tag);
        }
        true
    }

    /// Remove `tag`, returning the entity that held it.
    pub fn clear_tag(&mut self, tag: &str) -> Option<EntityId> {
        let holder = self.tags.remove(tag)?;
        if let Some(entity) = self.entities.get_mut(&holder) {
            entity.tags.remove(tag);
        }
        Some(holder)
    }

    /// Members of `group`, ordered by creation. Empty for unknown groups.
    #[must_use]
    pub fn group_lookup(&self, group: &str) -> Vec<EntityId> {
        self.groups
            .get(group)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns `true` if `id` is a member of `group`.
    #[must_use]
    pub fn in_group(&self, id: EntityId, group: &str) -> bool {
        self.groups
            .get(group)
            .is_some_and(|members| members.contains(&id))
    }

    /// Add `id` to each of `groups`, creating groups on first use.
    ///
    /// Membership is a set: adding an entity twice has no further effect.
    /// Does nothing if `id` is not live.
    pub fn set_group<I>(&mut self, id: EntityId, groups: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        for group in groups {
            let group = group.as_ref();
            self.groups.entry(group.to_string()).or_default().insert(id);
            entity.groups.insert(group.to_string());
        }
    }

    /// Remove `id` from each of `groups`. Unknown groups and non-members are
    /// ignored.
    pub fn clear_group<I>(&mut self, id: EntityId, groups: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for group in groups {
            let group = group.as_ref();
            if let Some(members) = self.groups.get_mut(group) {
                members.remove(&id);
            }
            if let Some(entity) = self.entities.get_mut(&id) {
                entity.groups.remove(group);
            }
        }
    }

    /// Names of every group that has been used, including empty ones.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Destroy an entity, unlinking it from every index.
    ///
    /// Returns `true` if the entity existed. Deleting an unknown or already
    /// deleted id is a no-op.
    pub fn delete(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entities.remove(&id) else {
            return false;
        };
        self.order.remove(&id);
        for tag in &entity.tags {
            if self.tags.get(tag) == Some(&id) {
                self.tags.remove(tag);
            }
        }
        for group in &entity.groups {
            if let Some(members) = self.groups.get_mut(group) {
                members.remove(&id);
            }
        }
        trace!(
            %id,
            tags = entity.tags.len(),
            groups = entity.groups.len(),
            "deleted entity"
        );
        true
    }
}
