use std::fmt::Debug;
use std::hash::Hash;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

/// Type key for a pool partition (enemy type, bullet type, item type).
pub trait PoolKey: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every key, in a stable order. Used to pre-allocate partitions.
    fn all() -> &'static [Self];
}

#[derive(Debug, Default)]
struct Slots {
    free: Vec<Entity>,
    active: Vec<Entity>,
}

/// Fixed-capacity entity pool, partitioned by type key.
///
/// Entities are registered once at startup and never despawned during a
/// session. `acquire` moves an entity from the free list to the active list,
/// `release` moves it back. Capacity never grows after registration.
#[derive(Resource, Debug)]
pub struct EntityPool<K: PoolKey> {
    slots: HashMap<K, Slots>,
    owner: HashMap<Entity, K>,
}

impl<K: PoolKey> Default for EntityPool<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::default(),
            owner: HashMap::default(),
        }
    }
}

impl<K: PoolKey> EntityPool<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly spawned, inactive entity to the `kind` partition.
    pub fn register(&mut self, kind: K, entity: Entity) {
        if self.owner.insert(entity, kind).is_some() {
            warn!("entity {entity:?} registered twice in {kind:?} pool");
            return;
        }
        self.slots.entry(kind).or_default().free.push(entity);
    }

    /// Take an inactive entity of `kind`. `None` when the partition is exhausted.
    pub fn acquire(&mut self, kind: K) -> Option<Entity> {
        let slots = self.slots.get_mut(&kind)?;
        let entity = slots.free.pop()?;
        slots.active.push(entity);
        Some(entity)
    }

    /// Return an active entity to its free list.
    ///
    /// Releasing an entity that is already free (or not pooled here) is a no-op
    /// and returns false.
    pub fn release(&mut self, entity: Entity) -> bool {
        let Some(kind) = self.owner.get(&entity).copied() else {
            return false;
        };
        let Some(slots) = self.slots.get_mut(&kind) else {
            return false;
        };
        let Some(index) = slots.active.iter().position(|e| *e == entity) else {
            return false;
        };
        slots.active.remove(index);
        slots.free.push(entity);
        true
    }

    /// Release every active entity. Returns the entities that were released.
    pub fn release_all(&mut self) -> Vec<Entity> {
        let mut released = Vec::new();
        for slots in self.slots.values_mut() {
            released.extend(slots.active.iter().copied());
            let active = std::mem::take(&mut slots.active);
            slots.free.extend(active);
        }
        released
    }

    pub fn kind_of(&self, entity: Entity) -> Option<K> {
        self.owner.get(&entity).copied()
    }

    pub fn is_active(&self, entity: Entity) -> bool {
        self.kind_of(entity)
            .and_then(|kind| self.slots.get(&kind))
            .is_some_and(|slots| slots.active.contains(&entity))
    }

    /// Active entities of `kind`, in acquisition order.
    pub fn active(&self, kind: K) -> &[Entity] {
        self.slots.get(&kind).map_or(&[], |slots| slots.active.as_slice())
    }

    pub fn active_count(&self) -> usize {
        self.slots.values().map(|slots| slots.active.len()).sum()
    }

    pub fn active_count_of(&self, kind: K) -> usize {
        self.active(kind).len()
    }

    pub fn free_count(&self, kind: K) -> usize {
        self.slots.get(&kind).map_or(0, |slots| slots.free.len())
    }

    pub fn capacity(&self, kind: K) -> usize {
        self.slots
            .get(&kind)
            .map_or(0, |slots| slots.free.len() + slots.active.len())
    }

    pub fn total_capacity(&self) -> usize {
        self.owner.len()
    }

    /// `active + free == capacity` per partition, and no entity is listed twice.
    pub fn invariant_holds(&self) -> bool {
        let listed: usize = self
            .slots
            .values()
            .map(|slots| slots.free.len() + slots.active.len())
            .sum();
        if listed != self.owner.len() {
            return false;
        }
        self.slots.iter().all(|(kind, slots)| {
            slots
                .free
                .iter()
                .chain(slots.active.iter())
                .all(|e| self.owner.get(e) == Some(kind))
        })
    }
}
