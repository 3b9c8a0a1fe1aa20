use std::collections::BTreeMap;

use emberfall_input::Action;
use emberfall_kernel::{CharacterFactory, VisualBackend};

use crate::manager::{Scene, SceneName};
use crate::session::Session;

/// Race and class picker. Confirm builds the character once both are chosen.
#[derive(Debug, Default)]
pub struct CharacterCreateScene;

impl CharacterCreateScene {
    pub fn new() -> Self {
        Self
    }

    /// Stat preview for the current selection.
    pub fn preview(session: &Session) -> Option<BTreeMap<&'static str, String>> {
        let race = session.catalog.race(session.selected_race()?)?;
        let class = session.catalog.class(session.selected_class()?)?;
        Some(CharacterFactory::preview(race, class))
    }
}

impl Scene for CharacterCreateScene {
    fn name(&self) -> SceneName {
        SceneName::CharacterCreate
    }

    fn handle(&mut self, action: &Action, session: &mut Session) -> Option<SceneName> {
        match action {
            Action::SelectRace(id) => {
                session.select_race(id);
                None
            }
            Action::SelectClass(id) => {
                session.select_class(id);
                None
            }
            Action::Confirm => {
                let Some(stats) = session.build_character() else {
                    tracing::debug!("confirm ignored, race or class missing");
                    return None;
                };
                session.set_final_stats(stats);
                Some(SceneName::World)
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
        _dt: f32,
        _session: &mut Session,
        _visuals: &mut dyn VisualBackend,
    ) -> Option<SceneName> {
        None
    }

    fn dispose(&mut self, _visuals: &mut dyn VisualBackend) {}
}
