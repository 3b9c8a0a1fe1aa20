use glam::Vec3;
use serde::{Deserialize, Serialize};

use emberfall_common::{EntityId, EntityKind, WorldId};

use crate::entity::MonsterState;
use crate::movement::MoveTarget;

/// Gameplay events recorded while the world runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    Spawned { id: EntityId, kind: EntityKind },
    Disposed { id: EntityId, kind: EntityKind },
    TargetSet { x: f32, z: f32 },
    Arrived { id: EntityId, x: f32, z: f32 },
    MonsterStateChanged {
        id: EntityId,
        from: MonsterState,
        to: MonsterState,
    },
    Died { id: EntityId },
}

/// Per-world state every entity can see during its tick.
///
/// The player position is captured once at the start of each tick, so every
/// entity in that tick reads the same value regardless of iteration order.
#[derive(Debug, Clone)]
pub struct WorldContext {
    world: WorldId,
    frame_time: f32,
    elapsed: f64,
    player_position: Option<Vec3>,
    move_target: Option<MoveTarget>,
    events: Vec<WorldEvent>,
}

impl WorldContext {
    pub fn new(world: WorldId) -> Self {
        Self {
            world,
            frame_time: 0.0,
            elapsed: 0.0,
            player_position: None,
            move_target: None,
            events: Vec::new(),
        }
    }

    pub fn world_id(&self) -> WorldId {
        self.world
    }

    /// Seconds covered by the current tick.
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Seconds accumulated over every tick so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn player_position(&self) -> Option<Vec3> {
        self.player_position
    }

    /// Shared click destination, if the world has exposed one yet.
    pub fn move_target(&self) -> Option<&MoveTarget> {
        self.move_target.as_ref()
    }

    pub fn move_target_mut(&mut self) -> Option<&mut MoveTarget> {
        self.move_target.as_mut()
    }

    /// Expose the click destination. Calling it again keeps the existing record.
    pub fn install_move_target(&mut self) -> &mut MoveTarget {
        self.move_target.get_or_insert_with(MoveTarget::default)
    }

    pub fn emit(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn begin_frame(&mut self, dt: f32, player_position: Option<Vec3>) {
        self.frame_time = dt;
        self.elapsed += f64::from(dt);
        self.player_position = player_position;
    }
}
