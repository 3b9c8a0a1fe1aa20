//! Rendering Adapter: renderer-agnostic view layer.
//!
//! # Invariants
//! - Renderer cannot mutate world truth directly.
//! - Render state derives from world state and view.
//!
//! Ships a text renderer and a headless [`emberfall_kernel::VisualBackend`]
//! so the game runs without a GPU. A real backend implements the same trait.

mod camera;
mod headless;
mod marker;
mod renderer;

pub use camera::IsoCamera;
pub use headless::{HeadlessBackend, HeadlessVisual};
pub use marker::{ClickMarker, FADE_FPS, FADE_FRAMES};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
