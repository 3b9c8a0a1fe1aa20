use emberfall_assets::ModelAsset;
use emberfall_common::Transform;

/// Opaque handle to a visual owned by the rendering side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

/// Primitive stand-in shown until (or instead of) a real model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placeholder {
    Capsule { radius: f32, height: f32 },
    Box { width: f32, height: f32, depth: f32 },
}

impl Placeholder {
    pub fn height(&self) -> f32 {
        match *self {
            Self::Capsule { height, .. } | Self::Box { height, .. } => height,
        }
    }
}

/// Everything a backend needs to create an entity's visual.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualSpec {
    pub name: String,
    pub shape: Placeholder,
    pub color: [f32; 3],
    /// Whether pointer picks may land on this visual.
    pub pickable: bool,
}

/// The only way the core touches visuals.
///
/// The core creates, repositions and destroys visuals and requests named
/// animation clips. It never inspects what a backend does with them.
/// Implementations must tolerate calls on handles they no longer know.
pub trait VisualBackend {
    fn create(&mut self, spec: &VisualSpec, transform: &Transform) -> VisualHandle;
    fn destroy(&mut self, handle: VisualHandle);
    fn set_transform(&mut self, handle: VisualHandle, transform: &Transform);
    fn has_clip(&self, handle: VisualHandle, clip: &str) -> bool;
    fn play(&mut self, handle: VisualHandle, clip: &str, looping: bool);
    fn stop(&mut self, handle: VisualHandle, clip: &str);
    /// Swap the placeholder for an imported model and its clip table.
    fn attach_model(&mut self, handle: VisualHandle, model: &ModelAsset);
    /// Import failed; show a minimal fallback instead.
    fn attach_fallback(&mut self, handle: VisualHandle);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_height() {
        let capsule = Placeholder::Capsule {
            radius: 0.4,
            height: 1.8,
        };
        let block = Placeholder::Box {
            width: 0.8,
            height: 1.4,
            depth: 0.8,
        };
        assert_eq!(capsule.height(), 1.8);
        assert_eq!(block.height(), 1.4);
    }
}
