use emberfall_kernel::{Catalog, CharacterFactory, FinalStats, GameConfig};

/// State that outlives individual scenes: configuration, the race/class
/// catalog and the character being created.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub config: GameConfig,
    pub catalog: Catalog,
    selected_race: Option<String>,
    selected_class: Option<String>,
    final_stats: Option<FinalStats>,
}

impl Session {
    pub fn new(config: GameConfig, catalog: Catalog) -> Self {
        Self {
            config,
            catalog,
            ..Self::default()
        }
    }

    /// Select a race by id. Unknown ids are rejected.
    pub fn select_race(&mut self, id: &str) -> bool {
        if self.catalog.race(id).is_none() {
            tracing::debug!(race = id, "unknown race");
            return false;
        }
        self.selected_race = Some(id.to_owned());
        true
    }

    /// Select a class by id. Unknown ids are rejected.
    pub fn select_class(&mut self, id: &str) -> bool {
        if self.catalog.class(id).is_none() {
            tracing::debug!(class = id, "unknown class");
            return false;
        }
        self.selected_class = Some(id.to_owned());
        true
    }

    pub fn selected_race(&self) -> Option<&str> {
        self.selected_race.as_deref()
    }

    pub fn selected_class(&self) -> Option<&str> {
        self.selected_class.as_deref()
    }

    pub fn final_stats(&self) -> Option<&FinalStats> {
        self.final_stats.as_ref()
    }

    /// Build stats from the current selection, if both halves are chosen.
    pub fn build_character(&self) -> Option<FinalStats> {
        let race = self.catalog.race(self.selected_race.as_deref()?)?;
        let class = self.catalog.class(self.selected_class.as_deref()?)?;
        Some(CharacterFactory::build(race, class))
    }

    pub fn set_final_stats(&mut self, stats: FinalStats) {
        self.final_stats = Some(stats);
    }

    pub fn reset_character(&mut self) {
        self.selected_race = None;
        self.selected_class = None;
        self.final_stats = None;
    }
}
