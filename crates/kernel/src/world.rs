use glam::Vec3;

use emberfall_assets::{AssetError, AssetLoader, LoadOutcome, LoadTicket, ModelAsset};
use emberfall_common::{EntityId, EntityKind, WorldId};

use crate::config::GameConfig;
use crate::context::{WorldContext, WorldEvent};
use crate::entity::{Entity, Role};
use crate::movement::{MoveTarget, sanitize_dt};
use crate::registry::EntityRegistry;
use crate::visual::VisualBackend;

/// One playable world instance.
///
/// Owns the registry, the shared click target and the pending model loads.
/// All mutations go through explicit operations and are recorded as
/// [`WorldEvent`]s.
#[derive(Debug)]
pub struct World {
    id: WorldId,
    config: GameConfig,
    registry: EntityRegistry,
    context: WorldContext,
    loader: AssetLoader,
    frames: u64,
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        let id = WorldId::new();
        tracing::debug!(world = %id, "world created");
        Self {
            id,
            config,
            registry: EntityRegistry::new(),
            context: WorldContext::new(id),
            loader: AssetLoader::new(),
            frames: 0,
        }
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of ticks run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn context(&self) -> &WorldContext {
        &self.context
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.registry.get_mut(id)
    }

    pub fn events(&self) -> &[WorldEvent] {
        self.context.events()
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.context.drain_events()
    }

    /// Create the entity's visual and register it. A duplicate id is
    /// disposed instead and the existing entity keeps its slot.
    pub fn spawn(&mut self, mut entity: Entity, visuals: &mut dyn VisualBackend) -> EntityId {
        let id = entity.id();
        if let Some(monster) = entity.as_monster_mut() {
            monster.set_despawn_delay(self.config.world.monster_despawn_delay);
        }
        entity.spawn(visuals);
        let kind = entity.kind();
        if let Some(mut rejected) = self.registry.register(entity) {
            tracing::warn!(%id, "spawn of an id already in the world");
            rejected.dispose(visuals);
            return id;
        }
        self.context.emit(WorldEvent::Spawned { id, kind });
        id
    }

    /// Unregister and dispose an entity. Returns false if it wasn't here.
    pub fn despawn(&mut self, id: EntityId, visuals: &mut dyn VisualBackend) -> bool {
        let Some(mut entity) = self.registry.unregister(id) else {
            return false;
        };
        let kind = entity.kind();
        entity.dispose(visuals);
        self.loader.cancel_for(id);
        self.context.emit(WorldEvent::Disposed { id, kind });
        true
    }

    /// Expose the click target to entities. Idempotent.
    pub fn install_move_target(&mut self) -> &mut MoveTarget {
        self.context.install_move_target()
    }

    pub fn move_target(&self) -> Option<&MoveTarget> {
        self.context.move_target()
    }

    /// Overwrite the click target. Returns false if none is installed yet.
    pub fn set_move_target(&mut self, x: f32, z: f32) -> bool {
        let Some(target) = self.context.move_target_mut() else {
            tracing::debug!(x, z, "click ignored, no move target installed");
            return false;
        };
        target.set(x, z);
        self.context.emit(WorldEvent::TargetSet { x, z });
        true
    }

    pub fn player(&self) -> Option<&Entity> {
        self.registry.first_of_kind(EntityKind::Player)
    }

    pub fn player_position(&self) -> Option<Vec3> {
        self.player().map(Entity::position)
    }

    /// Advance every active entity by `dt` seconds, then reap the ones that
    /// asked to leave.
    pub fn tick(&mut self, dt: f32, visuals: &mut dyn VisualBackend) {
        let _span = tracing::trace_span!("world_tick", frame = self.frames).entered();
        let dt = sanitize_dt(dt);
        self.frames += 1;

        let player = self.player_position();
        self.context.begin_frame(dt, player);
        self.registry.update(dt, &mut self.context, visuals);

        let doomed: Vec<EntityId> = self
            .registry
            .iter()
            .filter(|e| e.wants_despawn())
            .map(Entity::id)
            .collect();
        for id in doomed {
            tracing::debug!(%id, "reaping");
            self.despawn(id, visuals);
        }
    }

    /// Damage a player or monster. Returns whether it is still alive, or
    /// `None` if the entity can't take damage.
    pub fn damage(&mut self, id: EntityId, amount: f32) -> Option<bool> {
        let entity = self.registry.get_mut(id)?;
        let (was_alive, alive) = match entity.role_mut() {
            Role::Player(player) => (player.vitals.is_alive(), player.take_damage(amount)),
            Role::Monster(monster) => (monster.is_alive(), monster.take_damage(amount)),
            _ => return None,
        };
        if was_alive && !alive {
            tracing::info!(%id, "died");
            self.context.emit(WorldEvent::Died { id });
        }
        Some(alive)
    }

    /// Heal a player or monster. Returns false if the entity has no vitals.
    pub fn heal(&mut self, id: EntityId, amount: f32) -> bool {
        match self.registry.get_mut(id).map(Entity::role_mut) {
            Some(Role::Player(player)) => player.heal(amount),
            Some(Role::Monster(monster)) => monster.vitals.heal(amount),
            _ => return false,
        }
        true
    }

    /// Start loading a model for an entity in this world.
    pub fn request_model(&mut self, id: EntityId, source: impl Into<String>) -> Option<LoadTicket> {
        let alive = self.registry.get(id)?.alive_flag();
        Some(self.loader.begin(id, alive, source))
    }

    /// Hand a finished load back to the world. Returns true if something was
    /// attached to a live entity.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ModelAsset, AssetError>,
        visuals: &mut dyn VisualBackend,
    ) -> bool {
        match self.loader.finish(ticket, result) {
            Some(outcome) => self.apply_load(outcome, visuals),
            None => false,
        }
    }

    /// Import every pending model from disk. Returns how many were attached.
    pub fn resolve_loads_from_disk(&mut self, visuals: &mut dyn VisualBackend) -> usize {
        let mut attached = 0;
        for outcome in self.loader.resolve_all_from_disk() {
            if self.apply_load(outcome, visuals) {
                attached += 1;
            }
        }
        attached
    }

    pub fn apply_load(&mut self, outcome: LoadOutcome, visuals: &mut dyn VisualBackend) -> bool {
        match outcome {
            LoadOutcome::Attach { owner, model } => match self.registry.get_mut(owner) {
                Some(entity) => {
                    entity.attach_model(&model, visuals);
                    true
                }
                None => false,
            },
            LoadOutcome::Fallback { owner, .. } => match self.registry.get_mut(owner) {
                Some(entity) => {
                    entity.attach_fallback(visuals);
                    true
                }
                None => false,
            },
            LoadOutcome::Dropped { .. } => false,
        }
    }

    /// Dispose every entity. The world can be repopulated afterwards.
    pub fn teardown(&mut self, visuals: &mut dyn VisualBackend) -> usize {
        let gone: Vec<(EntityId, EntityKind)> =
            self.registry.iter().map(|e| (e.id(), e.kind())).collect();
        let count = self.registry.dispose_all(visuals);
        for (id, kind) in gone {
            self.loader.cancel_for(id);
            self.context.emit(WorldEvent::Disposed { id, kind });
        }
        tracing::info!(world = %self.id, count, "world torn down");
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{IDLE, WALK};
    use crate::character::PlayerStats;
    use crate::entity::{Monster, MonsterData, MonsterState};
    use crate::visual::testing::RecordingVisuals;

    fn world_with_player(visuals: &mut RecordingVisuals) -> (World, EntityId) {
        let mut world = World::new(GameConfig::default());
        let config = world.config().movement;
        let id = world.spawn(Entity::player(PlayerStats::default(), &config), visuals);
        let handle = world.entity(id).unwrap().visual().unwrap();
        visuals.grant_clips(handle, &[IDLE, WALK]);
        world.install_move_target();
        (world, id)
    }

    #[test]
    fn click_walk_arrive() {
        let mut visuals = RecordingVisuals::default();
        let (mut world, player) = world_with_player(&mut visuals);
        assert!(world.set_move_target(10.0, 0.0));

        world.tick(1.0, &mut visuals);
        assert_eq!(world.player_position(), Some(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(world.entity(player).unwrap().animation(), Some(WALK));

        world.tick(1.0, &mut visuals);
        assert_eq!(world.player_position(), Some(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(world.entity(player).unwrap().animation(), Some(IDLE));
        assert!(!world.move_target().unwrap().has_target);
        assert_eq!(world.frames(), 2);
    }

    #[test]
    fn new_click_overwrites_old() {
        let mut visuals = RecordingVisuals::default();
        let (mut world, _) = world_with_player(&mut visuals);
        world.set_move_target(10.0, 0.0);
        world.set_move_target(0.0, -10.0);
        world.tick(1.0, &mut visuals);
        assert_eq!(world.player_position(), Some(Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn click_before_install_is_ignored() {
        let mut visuals = RecordingVisuals::default();
        let mut world = World::new(GameConfig::default());
        world.spawn(Entity::player(PlayerStats::default(), &Default::default()), &mut visuals);
        assert!(!world.set_move_target(3.0, 3.0));
        world.tick(1.0, &mut visuals);
        assert_eq!(world.player_position(), Some(Vec3::ZERO));

        world.install_move_target();
        assert!(world.set_move_target(3.0, 0.0));
        world.tick(0.2, &mut visuals);
        assert_eq!(world.player_position(), Some(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn duplicate_spawn_is_disposed() {
        let mut visuals = RecordingVisuals::default();
        let mut world = World::new(GameConfig::default());
        let id = EntityId::next();
        let make = || Entity::with_id(id, "crate", Default::default(), Role::Item);
        world.spawn(make(), &mut visuals);
        world.spawn(make(), &mut visuals);
        assert_eq!(world.entity_count(), 1);
        assert_eq!(visuals.created, 2);
        assert_eq!(visuals.destroyed, 1);
        let spawned = world
            .events()
            .iter()
            .filter(|e| matches!(e, WorldEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn dead_monster_is_reaped_after_delay() {
        let mut visuals = RecordingVisuals::default();
        let (mut world, _) = world_with_player(&mut visuals);
        let goblin = world.spawn(
            Entity::monster(Monster::new(MonsterData::default())).at(Vec3::new(4.0, 0.0, 0.0)),
            &mut visuals,
        );

        world.tick(0.1, &mut visuals);
        assert_eq!(
            world.entity(goblin).unwrap().as_monster().unwrap().state(),
            MonsterState::Chase
        );

        assert_eq!(world.damage(goblin, 10.0), Some(true));
        assert_eq!(world.damage(goblin, 50.0), Some(false));
        assert_eq!(world.damage(goblin, 50.0), Some(false));
        let deaths = world
            .events()
            .iter()
            .filter(|e| matches!(e, WorldEvent::Died { .. }))
            .count();
        assert_eq!(deaths, 1);

        world.tick(0.3, &mut visuals);
        assert!(world.entity(goblin).is_some());
        world.tick(0.3, &mut visuals);
        assert!(world.entity(goblin).is_none());
        assert!(matches!(
            world.events().last(),
            Some(WorldEvent::Disposed { kind: EntityKind::Monster, .. })
        ));
    }

    #[test]
    fn items_have_no_vitals() {
        let mut visuals = RecordingVisuals::default();
        let mut world = World::new(GameConfig::default());
        let potion = world.spawn(Entity::item("potion"), &mut visuals);
        assert_eq!(world.damage(potion, 5.0), None);
        assert!(!world.heal(potion, 5.0));
    }

    #[test]
    fn late_load_for_disposed_entity_is_dropped() {
        let mut visuals = RecordingVisuals::default();
        let (mut world, player) = world_with_player(&mut visuals);
        let ticket = world.request_model(player, "hero.gltf").unwrap();
        assert!(world.despawn(player, &mut visuals));
        assert_eq!(world.loader().pending_count(), 0);

        let model = ModelAsset::from_gltf_json("hero", r#"{"meshes": [{}]}"#).unwrap();
        assert!(!world.complete_load(ticket, Ok(model), &mut visuals));
        assert_eq!(visuals.destroyed, 1);
        assert_eq!(world.loader().pending_count(), 0);
    }

    #[test]
    fn failed_load_attaches_fallback_and_movement_continues() {
        let mut visuals = RecordingVisuals::default();
        let (mut world, player) = world_with_player(&mut visuals);
        let ticket = world.request_model(player, "missing.gltf").unwrap();
        let err = AssetError::Empty("missing.gltf".into());
        assert!(world.complete_load(ticket, Err(err), &mut visuals));
        assert_eq!(visuals.fallbacks, 1);

        world.set_move_target(0.0, 1.0);
        world.tick(0.1, &mut visuals);
        assert!((world.player_position().unwrap().z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn teardown_disposes_everything() {
        let mut visuals = RecordingVisuals::default();
        let (mut world, _) = world_with_player(&mut visuals);
        world.spawn(Entity::monster(Monster::new(MonsterData::default())), &mut visuals);
        world.spawn(Entity::trigger("gate"), &mut visuals);
        assert_eq!(world.teardown(&mut visuals), 3);
        assert_eq!(world.entity_count(), 0);
        // the trigger never had a visual
        assert_eq!(visuals.destroyed, 2);
        assert!(world.player().is_none());
    }

    #[test]
    fn disposal_cancels_pending_loads() {
        let mut visuals = RecordingVisuals::default();
        let (mut world, player) = world_with_player(&mut visuals);
        world.request_model(player, "hero.gltf").unwrap();
        assert!(world.despawn(player, &mut visuals));
        assert_eq!(world.loader().pending_count(), 0);

        let potion = world.spawn(Entity::item("potion"), &mut visuals);
        world.request_model(potion, "potion.gltf").unwrap();
        assert_eq!(world.loader().pending_count(), 1);
        world.teardown(&mut visuals);
        assert_eq!(world.loader().pending_count(), 0);
    }
}
