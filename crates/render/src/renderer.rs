use std::fmt::Write;

use glam::Vec3;
use emberfall_kernel::World;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads world state and a view configuration, then produces
/// output. It never mutates the world.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given world state and view.
    fn render(&self, world: &World, view: &RenderView) -> Self::Output;
}

/// Renders the world as readable text, one line per entity.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &World, view: &RenderView) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "=== World {} (frame={}) ===", world.id(), world.frames());
        let _ = writeln!(out, "Entities: {}", world.entity_count());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );
        match world.move_target() {
            Some(t) if t.has_target => {
                let _ = writeln!(out, "Target: ({:.2}, {:.2})", t.x, t.z);
            }
            Some(_) => {
                let _ = writeln!(out, "Target: none");
            }
            None => {
                let _ = writeln!(out, "Target: not installed");
            }
        }

        for entity in world.registry().iter() {
            let t = entity.transform();
            let _ = writeln!(
                out,
                "  [{}] {} ({}) pos=({:.2}, {:.2}, {:.2}) yaw={:.2} anim={}{}",
                entity.id(),
                entity.name(),
                entity.kind(),
                t.position.x,
                t.position.y,
                t.position.z,
                t.yaw,
                entity.animation().unwrap_or("-"),
                if entity.active { "" } else { " inactive" },
            );
        }

        out
    }
}
