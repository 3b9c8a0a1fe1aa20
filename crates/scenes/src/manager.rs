use std::collections::BTreeMap;
use std::fmt;

use emberfall_input::Action;
use emberfall_kernel::{VisualBackend, World};

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneName {
    MainMenu,
    CharacterCreate,
    World,
}

impl fmt::Display for SceneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MainMenu => "MainMenuScene",
            Self::CharacterCreate => "CharacterCreateScene",
            Self::World => "WorldScene",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene {0} is not registered")]
    NotRegistered(SceneName),
}

/// One screen of the game. At most one scene is live at a time.
///
/// `handle` and `update` may ask for a transition by returning the next
/// scene's name. The manager performs it after the call returns.
pub trait Scene {
    fn name(&self) -> SceneName;

    fn handle(&mut self, action: &Action, session: &mut Session) -> Option<SceneName>;

    fn update(
        &mut self,
        dt: f32,
        session: &mut Session,
        visuals: &mut dyn VisualBackend,
    ) -> Option<SceneName>;

    /// Release everything the scene created.
    fn dispose(&mut self, visuals: &mut dyn VisualBackend);

    /// The world this scene runs, if it runs one.
    fn world(&self) -> Option<&World> {
        None
    }
}

/// Builds a fresh scene when the manager switches to it.
pub type SceneFactory = Box<dyn Fn(&Session, &mut dyn VisualBackend) -> Box<dyn Scene>>;

/// Owns the live scene and the factories for the rest.
pub struct SceneManager {
    factories: BTreeMap<SceneName, SceneFactory>,
    current: Option<Box<dyn Scene>>,
    session: Session,
}

impl SceneManager {
    pub fn new(session: Session) -> Self {
        Self {
            factories: BTreeMap::new(),
            current: None,
            session,
        }
    }

    /// Manager with the main menu, character creation and world scenes
    /// registered.
    pub fn standard(session: Session) -> Self {
        let mut manager = Self::new(session);
        manager.register_scene(SceneName::MainMenu, |_, _| {
            Box::new(crate::main_menu::MainMenuScene::new())
        });
        manager.register_scene(SceneName::CharacterCreate, |_, _| {
            Box::new(crate::character_create::CharacterCreateScene::new())
        });
        manager.register_scene(SceneName::World, |session, visuals| {
            Box::new(crate::world_scene::WorldScene::new(session, visuals))
        });
        manager
    }

    /// Register (or replace) the factory for `name`.
    pub fn register_scene<F>(&mut self, name: SceneName, factory: F)
    where
        F: Fn(&Session, &mut dyn VisualBackend) -> Box<dyn Scene> + 'static,
    {
        self.factories.insert(name, Box::new(factory));
    }

    pub fn is_registered(&self, name: SceneName) -> bool {
        self.factories.contains_key(&name)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn current(&self) -> Option<&dyn Scene> {
        self.current.as_deref()
    }

    pub fn current_name(&self) -> Option<SceneName> {
        self.current.as_ref().map(|s| s.name())
    }

    /// Dispose the live scene and build `name` in its place.
    pub fn switch_to(
        &mut self,
        name: SceneName,
        visuals: &mut dyn VisualBackend,
    ) -> Result<(), SceneError> {
        let factory = self
            .factories
            .get(&name)
            .ok_or(SceneError::NotRegistered(name))?;
        if let Some(mut old) = self.current.take() {
            old.dispose(visuals);
        }
        tracing::info!(scene = %name, "switching scene");
        self.current = Some(factory(&self.session, visuals));
        Ok(())
    }

    /// Run one frame of the live scene and apply any transition it asks for.
    pub fn frame(&mut self, dt: f32, visuals: &mut dyn VisualBackend) -> Result<(), SceneError> {
        let next = match self.current.as_mut() {
            Some(scene) => scene.update(dt, &mut self.session, visuals),
            None => None,
        };
        match next {
            Some(name) => self.switch_to(name, visuals),
            None => Ok(()),
        }
    }

    /// Forward an action to the live scene and apply any transition.
    pub fn dispatch(
        &mut self,
        action: &Action,
        visuals: &mut dyn VisualBackend,
    ) -> Result<(), SceneError> {
        let next = match self.current.as_mut() {
            Some(scene) => scene.handle(action, &mut self.session),
            None => None,
        };
        match next {
            Some(name) => self.switch_to(name, visuals),
            None => Ok(()),
        }
    }

    /// Dispose the live scene and forget every factory.
    pub fn dispose(&mut self, visuals: &mut dyn VisualBackend) {
        if let Some(mut scene) = self.current.take() {
            scene.dispose(visuals);
        }
        self.factories.clear();
    }
}
