use emberfall_input::Action;
use emberfall_kernel::VisualBackend;

use crate::manager::{Scene, SceneName};
use crate::session::Session;

/// Title screen. Confirm starts character creation.
#[derive(Debug, Default)]
pub struct MainMenuScene;

impl MainMenuScene {
    pub fn new() -> Self {
        Self
    }
}

impl Scene for MainMenuScene {
    fn name(&self) -> SceneName {
        SceneName::MainMenu
    }

    fn handle(&mut self, action: &Action, _session: &mut Session) -> Option<SceneName> {
        match action {
            Action::Confirm => Some(SceneName::CharacterCreate),
            _ => None,
        }
    }

    fn update(
        &mut self,
        _dt: f32,
        _session: &mut Session,
        _visuals: &mut dyn VisualBackend,
    ) -> Option<SceneName> {
        None
    }

    fn dispose(&mut self, _visuals: &mut dyn VisualBackend) {}
}
