//! Scene shell: main menu, character creation and the playable world.
//!
//! # Invariants
//! - At most one scene is live. Switching disposes the old scene before the
//!   new one is built.
//! - Disposing the world scene disposes every entity it spawned.

mod character_create;
mod main_menu;
mod manager;
mod session;
mod world_scene;

pub use character_create::CharacterCreateScene;
pub use main_menu::MainMenuScene;
pub use manager::{Scene, SceneError, SceneFactory, SceneName, SceneManager};
pub use session::Session;
pub use world_scene::WorldScene;
