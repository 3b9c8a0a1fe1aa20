use glam::Vec3;

/// Frames the fade-out lasts.
pub const FADE_FRAMES: f32 = 20.0;
/// Frame rate the fade is authored at.
pub const FADE_FPS: f32 = 30.0;

/// Ground ring shown where the player clicked. Fades out on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickMarker {
    position: Vec3,
    visibility: f32,
    enabled: bool,
}

impl Default for ClickMarker {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            visibility: 0.0,
            enabled: false,
        }
    }
}

impl ClickMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the marker at full visibility. Restarts any fade in progress.
    pub fn show_at(&mut self, x: f32, z: f32) {
        self.position = Vec3::new(x, 0.05, z);
        self.visibility = 1.0;
        self.enabled = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.enabled || !(dt.is_finite() && dt > 0.0) {
            return;
        }
        self.visibility -= dt * FADE_FPS / FADE_FRAMES;
        if self.visibility <= 0.0 {
            self.visibility = 0.0;
            self.enabled = false;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn visibility(&self) -> f32 {
        self.visibility
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fades_over_twenty_frames() {
        let mut m = ClickMarker::new();
        assert!(!m.is_enabled());
        m.show_at(2.0, 3.0);
        assert_eq!(m.visibility(), 1.0);
        assert_eq!(m.position(), Vec3::new(2.0, 0.05, 3.0));

        for _ in 0..10 {
            m.update(1.0 / FADE_FPS);
        }
        assert!((m.visibility() - 0.5).abs() < 1e-4);
        assert!(m.is_enabled());

        for _ in 0..11 {
            m.update(1.0 / FADE_FPS);
        }
        assert!(!m.is_enabled());
        assert_eq!(m.visibility(), 0.0);
    }

    #[test]
    fn reclick_restarts_fade() {
        let mut m = ClickMarker::new();
        m.show_at(0.0, 0.0);
        m.update(0.5);
        m.show_at(1.0, 1.0);
        assert_eq!(m.visibility(), 1.0);
    }
}
