use std::collections::{BTreeMap, BTreeSet};

use emberfall_assets::ModelAsset;
use emberfall_common::Transform;
use emberfall_kernel::{VisualBackend, VisualHandle, VisualSpec};

/// Everything the headless backend knows about one visual.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessVisual {
    pub spec: VisualSpec,
    pub transform: Transform,
    /// Clips the attached model provides. Placeholders have none.
    pub clips: BTreeSet<String>,
    pub playing: BTreeSet<String>,
    /// Name of the attached model, if one loaded.
    pub model: Option<String>,
    pub fallback: bool,
}

/// A [`VisualBackend`] with no GPU behind it. Keeps the state a real scene
/// graph would hold so it can be printed and asserted on.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    visuals: BTreeMap<VisualHandle, HeadlessVisual>,
    next: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&HeadlessVisual> {
        self.visuals.get(&handle)
    }

    pub fn find(&self, name: &str) -> Option<(VisualHandle, &HeadlessVisual)> {
        self.visuals
            .iter()
            .find(|(_, v)| v.spec.name == name)
            .map(|(h, v)| (*h, v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (VisualHandle, &HeadlessVisual)> {
        self.visuals.iter().map(|(h, v)| (*h, v))
    }
}

impl VisualBackend for HeadlessBackend {
    fn create(&mut self, spec: &VisualSpec, transform: &Transform) -> VisualHandle {
        self.next += 1;
        let handle = VisualHandle(self.next);
        tracing::trace!(handle = handle.0, name = %spec.name, "visual created");
        self.visuals.insert(
            handle,
            HeadlessVisual {
                spec: spec.clone(),
                transform: *transform,
                clips: BTreeSet::new(),
                playing: BTreeSet::new(),
                model: None,
                fallback: false,
            },
        );
        handle
    }

    fn destroy(&mut self, handle: VisualHandle) {
        self.visuals.remove(&handle);
    }

    fn set_transform(&mut self, handle: VisualHandle, transform: &Transform) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.transform = *transform;
        }
    }

    fn has_clip(&self, handle: VisualHandle, clip: &str) -> bool {
        self.visuals
            .get(&handle)
            .is_some_and(|v| v.clips.contains(clip))
    }

    fn play(&mut self, handle: VisualHandle, clip: &str, _looping: bool) {
        if let Some(v) = self
            .visuals
            .get_mut(&handle)
            .filter(|v| v.clips.contains(clip))
        {
            v.playing.insert(clip.to_owned());
        }
    }

    fn stop(&mut self, handle: VisualHandle, clip: &str) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.playing.remove(clip);
        }
    }

    fn attach_model(&mut self, handle: VisualHandle, model: &ModelAsset) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.model = Some(model.name.clone());
            v.clips = model.clips.iter().cloned().collect();
            v.playing.clear();
            v.fallback = false;
        }
    }

    fn attach_fallback(&mut self, handle: VisualHandle) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.model = None;
            v.clips.clear();
            v.playing.clear();
            v.fallback = true;
        }
    }
}
