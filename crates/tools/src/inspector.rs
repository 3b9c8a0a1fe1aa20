use glam::Vec3;

use emberfall_common::{EntityId, EntityKind, EntityTag};
use emberfall_kernel::{Entity, Role, World};

/// World inspector for developer tooling.
///
/// Read-only queries against a world for debugging and the CLI.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        WorldSummary {
            frames: world.frames(),
            entity_count: world.entity_count(),
            active_count: world.registry().iter().filter(|e| e.active).count(),
            pending_events: world.events().len(),
            pending_loads: world.loader().pending_count(),
            has_target: world.move_target().is_some_and(|t| t.has_target),
        }
    }

    pub fn inspect_entity(world: &World, id: EntityId) -> Option<EntityInfo> {
        world.entity(id).map(EntityInfo::from)
    }

    /// All entity ids in update order.
    pub fn list_entities(world: &World) -> Vec<EntityId> {
        world.registry().ids().collect()
    }

    pub fn list_kind(world: &World, kind: EntityKind) -> Vec<EntityId> {
        world
            .registry()
            .iter()
            .filter(|e| e.kind() == kind)
            .map(Entity::id)
            .collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone)]
pub struct WorldSummary {
    pub frames: u64,
    pub entity_count: usize,
    pub active_count: usize,
    pub pending_events: usize,
    pub pending_loads: usize,
    pub has_target: bool,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: frames={} entities={} active={} pending_events={} pending_loads={} target={}",
            self.frames,
            self.entity_count,
            self.active_count,
            self.pending_events,
            self.pending_loads,
            if self.has_target { "set" } else { "none" },
        )
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub tags: Vec<EntityTag>,
    pub position: Vec3,
    pub yaw: f32,
    pub animation: Option<String>,
    /// Current and max health, for entities that have any.
    pub health: Option<(f32, f32)>,
    /// Extra role detail such as a monster's state.
    pub detail: Option<String>,
}

impl From<&Entity> for EntityInfo {
    fn from(entity: &Entity) -> Self {
        let (health, detail) = match entity.role() {
            Role::Player(p) => (
                Some((p.vitals.current(), p.vitals.max())),
                Some(format!("level {}", p.stats.level)),
            ),
            Role::Monster(m) => (
                Some((m.vitals.current(), m.vitals.max())),
                Some(format!("{} {:?}", m.data.name, m.state())),
            ),
            Role::Npc(n) => (
                None,
                Some(format!(
                    "{}{}",
                    n.data.name,
                    if n.in_range { " in range" } else { "" }
                )),
            ),
            Role::Item | Role::Trigger => (None, None),
        };
        Self {
            id: entity.id(),
            name: entity.name().to_owned(),
            kind: entity.kind(),
            tags: entity.tags().iter().collect(),
            position: entity.position(),
            yaw: entity.transform().yaw,
            animation: entity.animation().map(str::to_owned),
            health,
            detail,
        }
    }
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entity [{}] {} ({}) pos=({:.2}, {:.2}, {:.2}) yaw={:.2}",
            self.id,
            self.name,
            self.kind,
            self.position.x,
            self.position.y,
            self.position.z,
            self.yaw,
        )?;
        if let Some((current, max)) = self.health {
            write!(f, " hp={current:.0}/{max:.0}")?;
        }
        if let Some(anim) = &self.animation {
            write!(f, " anim={anim}")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " [{detail}]")?;
        }
        Ok(())
    }
}
