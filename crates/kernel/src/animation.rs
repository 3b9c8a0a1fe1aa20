use crate::visual::{VisualBackend, VisualHandle};

pub const IDLE: &str = "idle";
pub const WALK: &str = "walk";

/// Remembers which looping clip an entity is playing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Animator {
    current: Option<String>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Switch to `clip`, looping. Returns true if playback actually changed.
    ///
    /// Already playing `clip`: nothing happens. No visual, or a visual that
    /// does not (yet) have the clip: nothing happens and the current clip
    /// keeps playing.
    pub fn switch_to(
        &mut self,
        clip: &str,
        visual: Option<VisualHandle>,
        visuals: &mut dyn VisualBackend,
    ) -> bool {
        if self.current.as_deref() == Some(clip) {
            return false;
        }
        let Some(handle) = visual else {
            return false;
        };
        if !visuals.has_clip(handle, clip) {
            return false;
        }
        if let Some(previous) = self.current.take() {
            visuals.stop(handle, &previous);
        }
        visuals.play(handle, clip, true);
        self.current = Some(clip.to_owned());
        true
    }

    /// Forget the current clip without touching the backend.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
