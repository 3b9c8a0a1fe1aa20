use indexmap::IndexMap;

use emberfall_common::{EntityId, EntityKind};

use crate::context::WorldContext;
use crate::entity::Entity;
use crate::visual::VisualBackend;

/// Owns every live entity, keyed by id, in insertion order.
///
/// Update order is registration order. Removing an entity keeps the relative
/// order of the rest.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: IndexMap<EntityId, Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity. An id already present is left untouched and the new
    /// entity is handed back to the caller.
    pub fn register(&mut self, entity: Entity) -> Option<Entity> {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            tracing::debug!(%id, "already registered");
            return Some(entity);
        }
        tracing::debug!(%id, kind = %entity.kind(), "registered");
        self.entities.insert(id, entity);
        None
    }

    /// Remove an entity without disposing it.
    pub fn unregister(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.shift_remove(&id);
        if let Some(entity) = &removed {
            tracing::debug!(%id, kind = %entity.kind(), "unregistered");
        }
        removed
    }

    pub fn has(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.values().find(|e| e.name() == name)
    }

    pub fn first_of_kind(&self, kind: EntityKind) -> Option<&Entity> {
        self.entities.values().find(|e| e.kind() == kind)
    }

    /// Tick every active entity once, in registration order.
    pub fn update(&mut self, dt: f32, ctx: &mut WorldContext, visuals: &mut dyn VisualBackend) {
        for entity in self.entities.values_mut().filter(|e| e.active) {
            entity.update(dt, ctx, visuals);
        }
    }

    /// Dispose and drop every entity. The registry stays usable afterwards.
    pub fn dispose_all(&mut self, visuals: &mut dyn VisualBackend) -> usize {
        let count = self.entities.len();
        for (_, mut entity) in self.entities.drain(..) {
            entity.dispose(visuals);
        }
        tracing::debug!(count, "registry cleared");
        count
    }
}
