//! Character building: race modifiers layered on class base stats.
//!
//! Race and class records derive `Deserialize` so whatever loads the game's
//! data files can hand them over directly. Fetching and validating those
//! files happens elsewhere.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatModifiers {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub vitality: i32,
    pub max_hp: f32,
    pub max_mp: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub vitality: i32,
    pub max_hp: f32,
    pub max_mp: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub id: String,
    pub name: String,
    pub description: String,
    pub bonus_description: String,
    pub stat_modifiers: StatModifiers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterClass {
    pub id: String,
    pub name: String,
    pub description: String,
    pub bonus_description: String,
    pub base_stats: BaseStats,
    pub starting_skills: Vec<String>,
}

/// Computed stats for a freshly created character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalStats {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub vitality: i32,
    pub max_hp: f32,
    pub max_mp: f32,
    pub speed: f32,
    pub hp: f32,
    pub mp: f32,
    pub level: u32,
}

/// Live stats carried by the player entity. Health lives in its `Vitals`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_hp: f32,
    pub mp: f32,
    pub max_mp: f32,
    /// Movement units per second.
    pub speed: f32,
    pub level: u32,
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_hp: 100.0,
            mp: 50.0,
            max_mp: 50.0,
            speed: 5.0,
            level: 1,
            strength: 10,
            dexterity: 10,
            intelligence: 10,
        }
    }
}

impl From<&FinalStats> for PlayerStats {
    fn from(s: &FinalStats) -> Self {
        Self {
            max_hp: s.max_hp,
            mp: s.mp,
            max_mp: s.max_mp,
            speed: s.speed,
            level: s.level,
            strength: s.strength,
            dexterity: s.dexterity,
            intelligence: s.intelligence,
        }
    }
}

pub struct CharacterFactory;

impl CharacterFactory {
    /// `class base + race modifier` per stat. Everything floors at 1 except
    /// max MP, which floors at 0. HP and MP start full.
    pub fn build(race: &Race, class: &CharacterClass) -> FinalStats {
        let b = &class.base_stats;
        let m = &race.stat_modifiers;
        let max_hp = (b.max_hp + m.max_hp).max(1.0);
        let max_mp = (b.max_mp + m.max_mp).max(0.0);

        let stats = FinalStats {
            strength: (b.strength + m.strength).max(1),
            dexterity: (b.dexterity + m.dexterity).max(1),
            intelligence: (b.intelligence + m.intelligence).max(1),
            vitality: (b.vitality + m.vitality).max(1),
            max_hp,
            max_mp,
            speed: (b.speed + m.speed).max(1.0),
            hp: max_hp,
            mp: max_mp,
            level: 1,
        };
        tracing::info!(
            race = %race.name,
            class = %class.name,
            hp = stats.max_hp,
            mp = stats.max_mp,
            str = stats.strength,
            dex = stats.dexterity,
            int = stats.intelligence,
            "character built"
        );
        stats
    }

    /// Labelled stat lines for a character-creation preview panel.
    pub fn preview(race: &Race, class: &CharacterClass) -> BTreeMap<&'static str, String> {
        let s = Self::build(race, class);
        BTreeMap::from([
            ("HP", format!("{}", s.max_hp)),
            ("MP", format!("{}", s.max_mp)),
            ("Strength", s.strength.to_string()),
            ("Dexterity", s.dexterity.to_string()),
            ("Intelligence", s.intelligence.to_string()),
            ("Vitality", s.vitality.to_string()),
            ("Speed", format!("{:.1}", s.speed)),
        ])
    }
}

/// Races and classes offered at character creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub races: Vec<Race>,
    pub classes: Vec<CharacterClass>,
}

impl Catalog {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn race(&self, id: &str) -> Option<&Race> {
        self.races.iter().find(|r| r.id == id)
    }

    pub fn class(&self, id: &str) -> Option<&CharacterClass> {
        self.classes.iter().find(|c| c.id == id)
    }
}
