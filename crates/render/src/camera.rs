use glam::Vec3;

use emberfall_kernel::CameraConfig;

use crate::renderer::RenderView;

/// Orbit camera locked to an isometric angle.
///
/// `alpha` is the longitudinal angle, `beta` the latitudinal one, both in
/// radians. The eye sits `radius` away from `target` on that sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct IsoCamera {
    pub alpha: f32,
    pub beta: f32,
    radius: f32,
    min_radius: f32,
    max_radius: f32,
    target: Vec3,
    follow_lerp: f32,
}

impl IsoCamera {
    /// Build from config. Swapped zoom limits are put back in order and
    /// the starting radius is clamped into them.
    pub fn new(config: &CameraConfig) -> Self {
        let min_radius = config.min_radius.min(config.max_radius);
        let max_radius = config.max_radius.max(config.min_radius);
        Self {
            alpha: config.alpha,
            beta: config.beta,
            radius: config.radius.clamp(min_radius, max_radius),
            min_radius,
            max_radius,
            target: Vec3::ZERO,
            follow_lerp: config.follow_lerp,
        }
    }

    /// Distance from the eye to the target.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Point the camera looks at.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Default fraction used by [`IsoCamera::follow_default`].
    pub fn follow_lerp(&self) -> f32 {
        self.follow_lerp
    }

    /// Move the target a fraction of the way toward `point`.
    pub fn follow(&mut self, point: Vec3, lerp: f32) {
        self.target += (point - self.target) * lerp.clamp(0.0, 1.0);
    }

    /// [`IsoCamera::follow`] with the configured fraction.
    pub fn follow_default(&mut self, point: Vec3) {
        self.follow(point, self.follow_lerp);
    }

    /// Change the radius, staying within the configured limits.
    pub fn zoom(&mut self, delta: f32) {
        if delta.is_finite() {
            self.radius = (self.radius + delta).clamp(self.min_radius, self.max_radius);
        }
    }

    /// World-space eye position.
    pub fn eye(&self) -> Vec3 {
        let (sa, ca) = self.alpha.sin_cos();
        let (sb, cb) = self.beta.sin_cos();
        self.target + self.radius * Vec3::new(ca * sb, cb, sa * sb)
    }

    /// Snapshot handed to a [`crate::Renderer`].
    pub fn view(&self) -> RenderView {
        RenderView {
            eye: self.eye(),
            target: self.target,
            ..RenderView::default()
        }
    }
}

impl Default for IsoCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}
