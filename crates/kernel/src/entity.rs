//! Entities: one struct with a common update/dispose contract and a
//! kind-specific role payload.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use emberfall_assets::ModelAsset;
use emberfall_common::{AliveFlag, EntityId, EntityKind, EntityTag, TagSet, Transform};

use crate::animation::{Animator, IDLE, WALK};
use crate::character::PlayerStats;
use crate::combat::Vitals;
use crate::config::MovementConfig;
use crate::context::{WorldContext, WorldEvent};
use crate::movement::{ClickToMove, Stride, sanitize_dt};
use crate::visual::{Placeholder, VisualBackend, VisualHandle, VisualSpec};

/// Name of the player's visual; other entities find the player by it.
pub const PLAYER_NAME: &str = "player";

/// How close the player must be before an NPC offers interaction.
pub const INTERACTION_RADIUS: f32 = 3.0;

/// The player-controlled character.
#[derive(Debug, Clone)]
pub struct Player {
    pub stats: PlayerStats,
    pub vitals: Vitals,
    controller: ClickToMove,
}

impl Player {
    pub fn new(stats: PlayerStats, movement: &MovementConfig) -> Self {
        Self {
            vitals: Vitals::new(stats.max_hp, 0.0),
            stats,
            controller: ClickToMove::new(movement),
        }
    }

    pub fn controller(&self) -> &ClickToMove {
        &self.controller
    }

    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.vitals.take_damage(amount)
    }

    pub fn heal(&mut self, amount: f32) {
        self.vitals.heal(amount);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcData {
    pub name: String,
    /// Dialogue to open when the player interacts.
    pub dialogue_id: String,
    pub quest_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Npc {
    pub data: NpcData,
    /// Whether the player is close enough to interact.
    pub in_range: bool,
}

impl Npc {
    pub fn new(data: NpcData) -> Self {
        Self {
            data,
            in_range: false,
        }
    }

    fn update(&mut self, transform: &Transform, ctx: &WorldContext) {
        let Some(player) = ctx.player_position() else {
            return;
        };
        self.in_range = transform.planar_distance(player) <= INTERACTION_RADIUS;
    }

    pub fn interact(&self) -> &NpcData {
        tracing::info!(npc = %self.data.name, dialogue = %self.data.dialogue_id, "interacting");
        &self.data
    }
}

/// Template data for a monster type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterData {
    pub name: String,
    pub max_hp: f32,
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    /// Experience granted to the player on death.
    pub xp_reward: u32,
    /// Player distance that starts a chase.
    pub detection_radius: f32,
    /// Player distance that allows an attack.
    pub attack_range: f32,
}

impl Default for MonsterData {
    fn default() -> Self {
        Self {
            name: "Goblin".into(),
            max_hp: 30.0,
            attack: 5.0,
            defense: 2.0,
            speed: 3.0,
            xp_reward: 20,
            detection_radius: 8.0,
            attack_range: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterState {
    Idle,
    Chase,
    Attack,
    Dead,
}

#[derive(Debug, Clone)]
pub struct Monster {
    pub data: MonsterData,
    pub vitals: Vitals,
    state: MonsterState,
    despawn_delay: f32,
    despawn_timer: Option<f32>,
}

impl Monster {
    pub fn new(data: MonsterData) -> Self {
        Self {
            vitals: Vitals::new(data.max_hp, data.defense),
            data,
            state: MonsterState::Idle,
            despawn_delay: 0.5,
            despawn_timer: None,
        }
    }

    /// Seconds a corpse lingers before the world reaps it.
    pub fn set_despawn_delay(&mut self, seconds: f32) {
        self.despawn_delay = seconds.max(0.0);
    }

    pub fn despawn_delay(&self) -> f32 {
        self.despawn_delay
    }

    pub fn state(&self) -> MonsterState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state != MonsterState::Dead
    }

    /// Apply damage. Returns whether the monster is still alive.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        let alive = self.vitals.take_damage(amount);
        if !alive {
            self.state = MonsterState::Dead;
            self.despawn_timer = Some(self.despawn_delay);
            tracing::info!(monster = %self.data.name, "defeated");
        }
        alive
    }

    fn update(&mut self, id: EntityId, transform: &Transform, dt: f32, ctx: &mut WorldContext) {
        if let Some(timer) = self.despawn_timer.as_mut() {
            *timer -= dt;
            return;
        }
        if !self.is_alive() {
            return;
        }
        let Some(player) = ctx.player_position() else {
            return;
        };

        let dist = transform.planar_distance(player);
        let next = if dist <= self.data.attack_range {
            MonsterState::Attack
        } else if dist <= self.data.detection_radius {
            MonsterState::Chase
        } else {
            MonsterState::Idle
        };
        if next != self.state {
            tracing::info!(%id, from = ?self.state, to = ?next, "monster state");
            ctx.emit(WorldEvent::MonsterStateChanged {
                id,
                from: self.state,
                to: next,
            });
            self.state = next;
        }
    }

    fn wants_despawn(&self) -> bool {
        self.despawn_timer.is_some_and(|t| t <= 0.0)
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone)]
pub enum Role {
    Player(Player),
    Npc(Npc),
    Monster(Monster),
    Item,
    Trigger,
}

impl Role {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Player(_) => EntityKind::Player,
            Self::Npc(_) => EntityKind::Npc,
            Self::Monster(_) => EntityKind::Monster,
            Self::Item => EntityKind::Item,
            Self::Trigger => EntityKind::Trigger,
        }
    }
}

/// An independently identified, independently ticked simulation object.
///
/// The transform is always present and is what movement mutates; the visual
/// only mirrors it. Lifecycle: constructed, spawned (visual created),
/// ticked while active, disposed exactly once.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    name: String,
    tags: TagSet,
    pub active: bool,
    transform: Transform,
    visual: Option<VisualHandle>,
    animator: Animator,
    alive: AliveFlag,
    disposed: bool,
    role: Role,
}

impl Entity {
    pub fn with_id(id: EntityId, name: impl Into<String>, tags: TagSet, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            tags,
            active: true,
            transform: Transform::default(),
            visual: None,
            animator: Animator::new(),
            alive: AliveFlag::new(),
            disposed: false,
            role,
        }
    }

    pub fn player(stats: PlayerStats, movement: &MovementConfig) -> Self {
        Self::with_id(
            EntityId::next(),
            PLAYER_NAME,
            TagSet::from([EntityTag::Collidable]),
            Role::Player(Player::new(stats, movement)),
        )
    }

    pub fn npc(data: NpcData) -> Self {
        let name = format!("npc_{}", data.name);
        Self::with_id(
            EntityId::next(),
            name,
            TagSet::from([
                EntityTag::Interactable,
                EntityTag::Friendly,
                EntityTag::Collidable,
            ]),
            Role::Npc(Npc::new(data)),
        )
    }

    pub fn monster(monster: Monster) -> Self {
        let id = EntityId::next();
        Self::with_id(
            id,
            format!("monster_{id}"),
            TagSet::from([EntityTag::Hostile, EntityTag::Collidable]),
            Role::Monster(monster),
        )
    }

    pub fn item(name: impl Into<String>) -> Self {
        Self::with_id(
            EntityId::next(),
            name,
            TagSet::from([EntityTag::Lootable, EntityTag::Interactable]),
            Role::Item,
        )
    }

    /// Invisible area entity. Triggers never get a visual.
    pub fn trigger(name: impl Into<String>) -> Self {
        Self::with_id(EntityId::next(), name, TagSet::new(), Role::Trigger)
    }

    /// Place the entity on the ground at `position`'s XZ.
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = Vec3::new(position.x, 0.0, position.z);
        self
    }

    /// Stable id, unique for the life of the process.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Kind derived from the role payload.
    pub fn kind(&self) -> EntityKind {
        self.role.kind()
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags set at construction.
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut TagSet {
        &mut self.tags
    }

    /// Whether the entity carries `tag`.
    pub fn has_tag(&self, tag: EntityTag) -> bool {
        self.tags.has(tag)
    }

    /// Position and yaw in world space.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Ground position. `y` is always 0.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Move straight to `position` on the ground, dragging the visual along.
    pub fn teleport(&mut self, position: Vec3, visuals: &mut dyn VisualBackend) {
        self.transform.position = Vec3::new(position.x, 0.0, position.z);
        if let Some(handle) = self.visual {
            visuals.set_transform(handle, &self.transform);
        }
    }

    /// Handle of the visual, if `spawn` created one and `dispose` hasn't
    /// released it.
    pub fn visual(&self) -> Option<VisualHandle> {
        self.visual
    }

    /// Name of the clip currently looping, if any.
    pub fn animation(&self) -> Option<&str> {
        self.animator.current()
    }

    /// Token that pending loads check before touching this entity.
    pub fn alive_flag(&self) -> AliveFlag {
        self.alive.clone()
    }

    /// True once `dispose` has run. Disposed entities never update again.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Per-kind state.
    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn role_mut(&mut self) -> &mut Role {
        &mut self.role
    }

    /// The player payload, if this is the player.
    pub fn as_player(&self) -> Option<&Player> {
        match &self.role {
            Role::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.role {
            Role::Player(p) => Some(p),
            _ => None,
        }
    }

    /// The NPC payload, if this is an NPC.
    pub fn as_npc(&self) -> Option<&Npc> {
        match &self.role {
            Role::Npc(n) => Some(n),
            _ => None,
        }
    }

    /// The monster payload, if this is a monster.
    pub fn as_monster(&self) -> Option<&Monster> {
        match &self.role {
            Role::Monster(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_monster_mut(&mut self) -> Option<&mut Monster> {
        match &mut self.role {
            Role::Monster(m) => Some(m),
            _ => None,
        }
    }

    /// Placeholder look for this entity's kind. Triggers have none.
    pub fn placeholder(&self) -> Option<VisualSpec> {
        let (shape, color, pickable) = match self.role {
            Role::Player(_) => (
                Placeholder::Capsule {
                    radius: 0.4,
                    height: 1.8,
                },
                [0.3, 0.6, 1.0],
                // clicks pass through the player to the ground
                false,
            ),
            Role::Npc(_) => (
                Placeholder::Capsule {
                    radius: 0.35,
                    height: 1.7,
                },
                [1.0, 0.8, 0.3],
                true,
            ),
            Role::Monster(_) => (
                Placeholder::Box {
                    width: 0.8,
                    height: 1.4,
                    depth: 0.8,
                },
                [0.7, 0.1, 0.1],
                true,
            ),
            Role::Item => (
                Placeholder::Box {
                    width: 0.4,
                    height: 0.4,
                    depth: 0.4,
                },
                [0.9, 0.8, 0.2],
                true,
            ),
            Role::Trigger => return None,
        };
        Some(VisualSpec {
            name: self.name.clone(),
            shape,
            color,
            pickable,
        })
    }

    /// Create the visual, if this entity has one and doesn't already.
    pub fn spawn(&mut self, visuals: &mut dyn VisualBackend) -> Option<VisualHandle> {
        if self.disposed {
            return None;
        }
        if self.visual.is_none() {
            self.visual = self
                .placeholder()
                .map(|spec| visuals.create(&spec, &self.transform));
        }
        self.visual
    }

    /// Advance one tick. `dt` below zero counts as zero.
    pub fn update(&mut self, dt: f32, ctx: &mut WorldContext, visuals: &mut dyn VisualBackend) {
        if self.disposed {
            return;
        }
        let dt = sanitize_dt(dt);
        match &mut self.role {
            Role::Player(player) => {
                let stride = player.controller.tick(
                    &mut self.transform,
                    ctx.move_target_mut(),
                    player.stats.speed,
                    dt,
                );
                match stride {
                    Stride::Idle => return,
                    Stride::Moved { .. } => {
                        self.animator.switch_to(WALK, self.visual, visuals);
                    }
                    Stride::Arrived => {
                        let p = self.transform.position;
                        tracing::info!(id = %self.id, x = p.x, z = p.z, "arrived");
                        ctx.emit(WorldEvent::Arrived {
                            id: self.id,
                            x: p.x,
                            z: p.z,
                        });
                        self.animator.switch_to(IDLE, self.visual, visuals);
                    }
                }
                if let Some(handle) = self.visual {
                    visuals.set_transform(handle, &self.transform);
                }
            }
            Role::Npc(npc) => npc.update(&self.transform, ctx),
            Role::Monster(monster) => monster.update(self.id, &self.transform, dt, ctx),
            Role::Item | Role::Trigger => {}
        }
    }

    /// Whether the world should remove and dispose this entity after the tick.
    pub fn wants_despawn(&self) -> bool {
        match &self.role {
            Role::Monster(m) => m.wants_despawn(),
            _ => false,
        }
    }

    /// Swap in an imported model and start idling on it.
    pub fn attach_model(&mut self, model: &ModelAsset, visuals: &mut dyn VisualBackend) {
        let Some(handle) = self.visual else {
            return;
        };
        if self.disposed {
            return;
        }
        visuals.attach_model(handle, model);
        self.animator.reset();
        self.animator.switch_to(IDLE, Some(handle), visuals);
    }

    /// Model import failed; keep the entity on a minimal fallback visual.
    pub fn attach_fallback(&mut self, visuals: &mut dyn VisualBackend) {
        if let (Some(handle), false) = (self.visual, self.disposed) {
            visuals.attach_fallback(handle);
            self.animator.reset();
        }
    }

    /// Release the visual and mark the entity dead. Returns false if it was
    /// already disposed.
    pub fn dispose(&mut self, visuals: &mut dyn VisualBackend) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;
        self.active = false;
        self.alive.kill();
        if let Some(handle) = self.visual.take() {
            visuals.destroy(handle);
        }
        self.animator.reset();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::testing::RecordingVisuals;
    use emberfall_common::WorldId;

    fn ctx_with_target() -> WorldContext {
        let mut ctx = WorldContext::new(WorldId::new());
        ctx.install_move_target();
        ctx
    }

    fn spawned_player(visuals: &mut RecordingVisuals) -> Entity {
        let mut player = Entity::player(PlayerStats::default(), &MovementConfig::default());
        let handle = player.spawn(visuals).unwrap();
        visuals.grant_clips(handle, &[IDLE, WALK]);
        player
    }

    #[test]
    fn kinds_and_tags() {
        let npc = Entity::npc(NpcData {
            name: "Mira".into(),
            dialogue_id: "mira_intro".into(),
            quest_id: None,
        });
        assert_eq!(npc.kind(), EntityKind::Npc);
        assert_eq!(npc.name(), "npc_Mira");
        assert!(npc.has_tag(EntityTag::Interactable));

        let monster = Entity::monster(Monster::new(MonsterData::default()));
        assert_eq!(monster.kind(), EntityKind::Monster);
        assert!(monster.has_tag(EntityTag::Hostile));

        assert_eq!(Entity::trigger("gate").kind(), EntityKind::Trigger);
        assert!(Entity::trigger("gate").placeholder().is_none());
    }

    #[test]
    fn player_scenario_walks_then_arrives() {
        let mut visuals = RecordingVisuals::default();
        let mut player = spawned_player(&mut visuals);
        let mut ctx = ctx_with_target();
        ctx.install_move_target().set(10.0, 0.0);

        player.update(1.0, &mut ctx, &mut visuals);
        assert_eq!(player.position(), Vec3::new(5.0, 0.0, 0.0));
        assert!(ctx.move_target().unwrap().has_target);
        assert_eq!(player.animation(), Some(WALK));

        player.teleport(Vec3::new(9.0, 0.0, 0.0), &mut visuals);
        player.update(1.0, &mut ctx, &mut visuals);
        assert_eq!(player.position(), Vec3::new(10.0, 0.0, 0.0));
        assert!(!ctx.move_target().unwrap().has_target);
        assert_eq!(player.animation(), Some(IDLE));
        assert!(matches!(ctx.events().last(), Some(WorldEvent::Arrived { .. })));
    }

    #[test]
    fn visual_follows_placeholder() {
        let mut visuals = RecordingVisuals::default();
        let mut player = spawned_player(&mut visuals);
        let mut ctx = ctx_with_target();
        ctx.install_move_target().set(0.0, 4.0);
        player.update(0.5, &mut ctx, &mut visuals);
        let handle = player.visual().unwrap();
        assert_eq!(visuals.live[&handle].position, Vec3::new(0.0, 0.0, 2.5));
    }

    #[test]
    fn movement_works_without_clips() {
        let mut visuals = RecordingVisuals::default();
        let mut player = Entity::player(PlayerStats::default(), &MovementConfig::default());
        player.spawn(&mut visuals);
        let mut ctx = ctx_with_target();
        ctx.install_move_target().set(2.0, 0.0);
        player.update(0.2, &mut ctx, &mut visuals);
        assert_eq!(player.position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(player.animation(), None);
    }

    #[test]
    fn missing_target_is_rechecked_each_tick() {
        let mut visuals = RecordingVisuals::default();
        let mut player = spawned_player(&mut visuals);
        let mut ctx = WorldContext::new(WorldId::new());
        player.update(1.0, &mut ctx, &mut visuals);
        assert_eq!(player.position(), Vec3::ZERO);

        ctx.install_move_target().set(0.0, 1.0);
        player.update(0.1, &mut ctx, &mut visuals);
        assert!((player.position().z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn no_target_keeps_animation() {
        let mut visuals = RecordingVisuals::default();
        let mut player = spawned_player(&mut visuals);
        let mut ctx = ctx_with_target();
        ctx.install_move_target().set(5.0, 0.0);
        player.update(0.1, &mut ctx, &mut visuals);
        ctx.install_move_target().clear();
        player.update(0.1, &mut ctx, &mut visuals);
        assert_eq!(player.animation(), Some(WALK));
    }

    #[test]
    fn npc_range_check() {
        let mut visuals = RecordingVisuals::default();
        let mut npc = Entity::npc(NpcData {
            name: "Mira".into(),
            dialogue_id: "mira_intro".into(),
            quest_id: Some("q1".into()),
        })
        .at(Vec3::new(2.0, 0.0, 0.0));
        let mut ctx = ctx_with_target();

        ctx.begin_frame(0.016, Some(Vec3::new(0.0, 0.9, 0.0)));
        npc.update(0.016, &mut ctx, &mut visuals);
        assert!(npc.as_npc().unwrap().in_range);

        ctx.begin_frame(0.016, Some(Vec3::new(10.0, 0.0, 0.0)));
        npc.update(0.016, &mut ctx, &mut visuals);
        assert!(!npc.as_npc().unwrap().in_range);
        assert_eq!(npc.as_npc().unwrap().interact().quest_id.as_deref(), Some("q1"));
    }

    #[test]
    fn monster_thresholds() {
        let mut visuals = RecordingVisuals::default();
        let mut monster = Entity::monster(Monster::new(MonsterData::default()));
        let mut ctx = ctx_with_target();
        let state = |e: &Entity| e.as_monster().unwrap().state();

        for (x, expected) in [
            (20.0, MonsterState::Idle),
            (6.0, MonsterState::Chase),
            (1.0, MonsterState::Attack),
            (8.0, MonsterState::Chase),
        ] {
            ctx.begin_frame(0.016, Some(Vec3::new(x, 0.0, 0.0)));
            monster.update(0.016, &mut ctx, &mut visuals);
            assert_eq!(state(&monster), expected, "player at x={x}");
        }
        // Idle -> Chase -> Attack -> Chase
        assert_eq!(ctx.events().len(), 3);
    }

    #[test]
    fn monster_death_starts_despawn_timer() {
        let mut visuals = RecordingVisuals::default();
        let mut monster = Entity::monster(Monster::new(MonsterData::default()));
        let m = monster.as_monster_mut().unwrap();
        assert_eq!(m.despawn_delay(), 0.5);
        assert!(m.take_damage(12.0));
        assert_eq!(m.vitals.current(), 20.0);
        assert!(!m.take_damage(100.0));
        assert_eq!(m.state(), MonsterState::Dead);
        assert!(!m.take_damage(5.0));

        let mut ctx = ctx_with_target();
        ctx.begin_frame(0.3, Some(Vec3::ZERO));
        monster.update(0.3, &mut ctx, &mut visuals);
        assert!(!monster.wants_despawn());
        monster.update(0.3, &mut ctx, &mut visuals);
        assert!(monster.wants_despawn());
        assert_eq!(monster.as_monster().unwrap().state(), MonsterState::Dead);
    }

    #[test]
    fn dispose_exactly_once() {
        let mut visuals = RecordingVisuals::default();
        let mut player = spawned_player(&mut visuals);
        let alive = player.alive_flag();
        assert!(player.dispose(&mut visuals));
        assert!(!player.dispose(&mut visuals));
        assert_eq!(visuals.destroyed, 1);
        assert!(!alive.is_alive());
        assert!(player.visual().is_none());
        assert!(player.spawn(&mut visuals).is_none());
    }

    #[test]
    fn attach_model_starts_idle() {
        let mut visuals = RecordingVisuals::default();
        let mut player = Entity::player(PlayerStats::default(), &MovementConfig::default());
        player.spawn(&mut visuals);
        let model = ModelAsset::from_gltf_json(
            "hero",
            r#"{"meshes": [{"name": "Body"}], "animations": [{"name": "idle"}, {"name": "walk"}]}"#,
        )
        .unwrap();
        player.attach_model(&model, &mut visuals);
        assert_eq!(player.animation(), Some(IDLE));
    }

    #[test]
    fn player_damage_has_no_defense() {
        let mut player = Entity::player(PlayerStats::default(), &MovementConfig::default());
        let p = player.as_player_mut().unwrap();
        assert!(p.take_damage(30.0));
        assert_eq!(p.vitals.current(), 70.0);
        p.take_damage(-5.0);
        assert_eq!(p.vitals.current(), 70.0);
        p.heal(10.0);
        assert_eq!(p.vitals.current(), 80.0);
    }
}
