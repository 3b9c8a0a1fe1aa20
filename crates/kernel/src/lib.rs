//! World Kernel: entity registry, click-to-move controller, combat stub and
//! per-frame ticking for one world instance.
//!
//! # Invariants
//! - An id in the registry always denotes a non-disposed entity.
//! - Active entities are ticked once per frame, in registration order.
//! - The player is the only consumer of the move target and the only one
//!   that clears it.
//! - Visuals are only reached through [`VisualBackend`].

pub mod animation;
pub mod character;
pub mod combat;
pub mod config;
pub mod context;
pub mod entity;
pub mod movement;
pub mod registry;
pub mod visual;
pub mod world;

pub use animation::Animator;
pub use character::{
    BaseStats, Catalog, CharacterClass, CharacterFactory, FinalStats, PlayerStats, Race,
    StatModifiers,
};
pub use combat::Vitals;
pub use config::{CameraConfig, ConfigError, GameConfig, MovementConfig, WorldConfig};
pub use context::{WorldContext, WorldEvent};
pub use entity::{Entity, Monster, MonsterData, MonsterState, Npc, NpcData, Player, Role};
pub use movement::{ClickToMove, MoveTarget, Stride};
pub use registry::EntityRegistry;
pub use visual::{Placeholder, VisualBackend, VisualHandle, VisualSpec};
pub use world::World;
