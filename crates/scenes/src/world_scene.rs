use glam::{Vec2, Vec3};

use emberfall_common::EntityId;
use emberfall_input::{Action, ClickToMove};
use emberfall_kernel::{Entity, PlayerStats, VisualBackend, World};
use emberfall_render::{ClickMarker, IsoCamera};

use crate::manager::{Scene, SceneName};
use crate::session::Session;

/// The playable world: one player on an open ground plane, moved by clicks,
/// followed by an isometric camera.
pub struct WorldScene {
    world: World,
    player: EntityId,
    camera: IsoCamera,
    marker: ClickMarker,
    clicks: ClickToMove,
}

impl WorldScene {
    /// Spawn the player at the origin with the session's character, or
    /// default stats when none was built.
    pub fn new(session: &Session, visuals: &mut dyn VisualBackend) -> Self {
        let config = session.config.clone();
        let stats = session
            .final_stats()
            .map(PlayerStats::from)
            .unwrap_or_default();

        let mut world = World::new(config.clone());
        let player = world.spawn(
            Entity::player(stats, &config.movement).at(Vec3::ZERO),
            visuals,
        );
        world.install_move_target();

        Self {
            world,
            player,
            camera: IsoCamera::new(&config.camera),
            marker: ClickMarker::new(),
            clicks: ClickToMove::new(config.world.ground_name),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn camera(&self) -> &IsoCamera {
        &self.camera
    }

    pub fn marker(&self) -> &ClickMarker {
        &self.marker
    }

    fn click(&mut self, point: Vec2) {
        if self.world.set_move_target(point.x, point.y) {
            self.marker.show_at(point.x, point.y);
            tracing::info!(x = point.x, z = point.y, "target point");
        }
    }
}

impl Scene for WorldScene {
    fn name(&self) -> SceneName {
        SceneName::World
    }

    fn handle(&mut self, action: &Action, session: &mut Session) -> Option<SceneName> {
        match action {
            Action::PointerDown { .. } => {
                if let Some(point) = self.clicks.resolve(action) {
                    self.click(point);
                }
                None
            }
            Action::Zoom(delta) => {
                self.camera.zoom(*delta);
                None
            }
            Action::Back => {
                session.reset_character();
                Some(SceneName::MainMenu)
            }
            _ => None,
        }
    }

    fn update(
        &mut self,
        dt: f32,
        _session: &mut Session,
        visuals: &mut dyn VisualBackend,
    ) -> Option<SceneName> {
        self.world.tick(dt, visuals);
        if let Some(position) = self.world.player_position() {
            self.camera.follow_default(position);
        }
        self.marker.update(dt);
        None
    }

    fn dispose(&mut self, visuals: &mut dyn VisualBackend) {
        self.world.teardown(visuals);
    }

    fn world(&self) -> Option<&World> {
        Some(&self.world)
    }
}
