//! Point-and-click movement: one shared destination per world, consumed by
//! whichever entity is walking toward it.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use emberfall_common::Transform;

use crate::config::MovementConfig;

/// The world's single click destination.
///
/// `has_target` stays true only until the destination is reached. A new
/// click overwrites the old destination; there is no queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveTarget {
    pub x: f32,
    pub z: f32,
    pub has_target: bool,
}

impl MoveTarget {
    /// Point at `(x, z)` on the ground, replacing any earlier click.
    pub fn set(&mut self, x: f32, z: f32) {
        self.x = x;
        self.z = z;
        self.has_target = true;
    }

    /// Drop the destination. The coordinates are left as they were.
    pub fn clear(&mut self) {
        self.has_target = false;
    }

    /// The XZ destination while one is pending.
    pub fn destination(&self) -> Option<Vec2> {
        self.has_target.then(|| Vec2::new(self.x, self.z))
    }
}

/// Result of one controller tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stride {
    /// No destination; nothing changed.
    Idle,
    /// Advanced `step` units and still on the way.
    Moved { step: f32 },
    /// Destination reached this tick; the target has been cleared.
    Arrived,
}

/// Converts the shared destination into translation plus eased facing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickToMove {
    pub stop_threshold: f32,
    pub rotation_speed: f32,
}

impl Default for ClickToMove {
    fn default() -> Self {
        Self::new(&MovementConfig::default())
    }
}

impl ClickToMove {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            stop_threshold: config.stop_threshold,
            rotation_speed: config.rotation_speed,
        }
    }

    /// Advance `transform` toward `target` at `speed` units per second.
    ///
    /// The step never exceeds the remaining distance, so a long frame cannot
    /// carry the entity past its destination.
    pub fn tick(
        &self,
        transform: &mut Transform,
        target: Option<&mut MoveTarget>,
        speed: f32,
        dt: f32,
    ) -> Stride {
        let dt = sanitize_dt(dt);
        let Some(target) = target else {
            return Stride::Idle;
        };
        if !target.has_target {
            return Stride::Idle;
        }

        let dx = target.x - transform.position.x;
        let dz = target.z - transform.position.z;
        let distance = (dx * dx + dz * dz).sqrt();

        // Also covers distance == 0, so the normalisation below never divides by zero.
        if distance <= self.stop_threshold {
            target.clear();
            return Stride::Arrived;
        }

        let step = (speed.max(0.0) * dt).min(distance);
        if step >= distance {
            transform.position.x = target.x;
            transform.position.z = target.z;
        } else {
            transform.position.x += dx / distance * step;
            transform.position.z += dz / distance * step;
        }

        let fraction = (self.rotation_speed.max(0.0) * dt).min(1.0);
        if fraction > 0.0 {
            let desired = dx.atan2(dz);
            let delta = wrap_angle(desired - transform.yaw);
            transform.yaw = wrap_angle(transform.yaw + delta * fraction);
        }

        if distance - step <= self.stop_threshold {
            target.clear();
            return Stride::Arrived;
        }
        Stride::Moved { step }
    }
}

/// Frame time clamped to a usable value: negative, NaN and infinite become 0.
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

/// Wrap an angle into `(-π, π]`.
///
/// Applied to a heading difference this yields the shortest turn.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { PI } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const EPS: f32 = 1e-4;

    fn target(x: f32, z: f32) -> MoveTarget {
        let mut t = MoveTarget::default();
        t.set(x, z);
        t
    }

    #[test]
    fn no_target_does_nothing() {
        let ctl = ClickToMove::default();
        let mut tf = Transform::at(Vec3::new(1.0, 0.0, 2.0));
        let mut t = MoveTarget::default();
        assert_eq!(ctl.tick(&mut tf, Some(&mut t), 5.0, 1.0), Stride::Idle);
        assert_eq!(ctl.tick(&mut tf, None, 5.0, 1.0), Stride::Idle);
        assert_eq!(tf.position, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn half_way_scenario() {
        let ctl = ClickToMove::default();
        let mut tf = Transform::default();
        let mut t = target(10.0, 0.0);
        let stride = ctl.tick(&mut tf, Some(&mut t), 5.0, 1.0);
        assert_eq!(stride, Stride::Moved { step: 5.0 });
        assert_eq!(tf.position, Vec3::new(5.0, 0.0, 0.0));
        assert!(t.has_target);
    }

    #[test]
    fn final_step_lands_exactly_and_arrives() {
        let ctl = ClickToMove::default();
        let mut tf = Transform::at(Vec3::new(9.0, 0.0, 0.0));
        let mut t = target(10.0, 0.0);
        let stride = ctl.tick(&mut tf, Some(&mut t), 5.0, 1.0);
        assert_eq!(stride, Stride::Arrived);
        assert_eq!(tf.position, Vec3::new(10.0, 0.0, 0.0));
        assert!(!t.has_target);
    }

    #[test]
    fn never_overshoots_on_frame_spike() {
        let ctl = ClickToMove::default();
        let mut tf = Transform::default();
        let mut t = target(3.0, 4.0);
        ctl.tick(&mut tf, Some(&mut t), 5.0, 60.0);
        assert!(tf.planar_distance(Vec3::new(3.0, 0.0, 4.0)) < EPS);
    }

    #[test]
    fn step_length_is_speed_times_dt_below_distance() {
        let ctl = ClickToMove::default();
        for (dt, expected) in [(0.0, 0.0), (0.016, 0.08), (0.5, 2.5), (3.0, 13.0)] {
            let mut tf = Transform::default();
            let mut t = target(0.0, 13.0);
            ctl.tick(&mut tf, Some(&mut t), 5.0, dt);
            assert!((tf.position.z - expected).abs() < EPS, "dt={dt}");
            assert!(tf.position.z <= 13.0);
        }
    }

    #[test]
    fn target_on_top_of_entity_is_arrival() {
        let ctl = ClickToMove::default();
        let mut tf = Transform::at(Vec3::new(2.0, 0.0, 2.0));
        let mut t = target(2.0, 2.0);
        assert_eq!(ctl.tick(&mut tf, Some(&mut t), 5.0, 0.016), Stride::Arrived);
        assert!(!t.has_target);
        assert!(tf.position.x.is_finite() && tf.yaw.is_finite());
    }

    #[test]
    fn within_threshold_is_arrival_without_moving() {
        let ctl = ClickToMove::default();
        let mut tf = Transform::default();
        let mut t = target(0.1, 0.0);
        assert_eq!(ctl.tick(&mut tf, Some(&mut t), 5.0, 1.0), Stride::Arrived);
        assert_eq!(tf.position, Vec3::ZERO);
    }

    #[test]
    fn arrival_is_sticky_until_next_click() {
        let ctl = ClickToMove::default();
        let mut tf = Transform::at(Vec3::new(9.0, 0.0, 0.0));
        let mut t = target(10.0, 0.0);
        ctl.tick(&mut tf, Some(&mut t), 5.0, 1.0);
        let parked = tf;
        for _ in 0..5 {
            assert_eq!(ctl.tick(&mut tf, Some(&mut t), 5.0, 1.0), Stride::Idle);
        }
        assert_eq!(tf, parked);
        assert!(!t.has_target);

        t.set(10.0, 5.0);
        assert!(matches!(
            ctl.tick(&mut tf, Some(&mut t), 5.0, 0.5),
            Stride::Moved { .. }
        ));
    }

    #[test]
    fn negative_dt_is_a_zero_length_tick() {
        let ctl = ClickToMove::default();
        let mut tf = Transform {
            position: Vec3::new(1.0, 0.0, 1.0),
            yaw: 0.5,
        };
        let mut t = target(10.0, 10.0);
        ctl.tick(&mut tf, Some(&mut t), 5.0, -1.0);
        assert_eq!(tf.position, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(tf.yaw, 0.5);
        assert!(t.has_target);
    }

    #[test]
    fn faces_direction_of_travel() {
        let ctl = ClickToMove::default();
        let mut tf = Transform::default();
        let mut t = target(10.0, 0.0);
        // rotation_speed * dt >= 1 applies the whole turn
        ctl.tick(&mut tf, Some(&mut t), 5.0, 0.2);
        assert!((tf.yaw - std::f32::consts::FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn rotation_eases_with_small_dt() {
        let ctl = ClickToMove::default();
        let mut tf = Transform::default();
        let mut t = target(10.0, 0.0);
        ctl.tick(&mut tf, Some(&mut t), 5.0, 0.01);
        // 10 rad/s * 0.01 s = 10% of the quarter turn
        assert!((tf.yaw - std::f32::consts::FRAC_PI_2 * 0.1).abs() < EPS);
    }

    #[test]
    fn turns_the_short_way_across_pi() {
        let ctl = ClickToMove::default();
        let desired = -PI + 0.1;
        let mut tf = Transform {
            position: Vec3::ZERO,
            yaw: PI - 0.1,
        };
        let mut t = target(10.0 * desired.sin(), 10.0 * desired.cos());
        ctl.tick(&mut tf, Some(&mut t), 5.0, 0.01);
        // 10% of the +0.2 short arc, wrapped back into (-π, π]
        assert!((tf.yaw - (PI - 0.08)).abs() < EPS, "yaw={}", tf.yaw);
    }

    #[test]
    fn wrap_angle_range() {
        assert!((wrap_angle(-2.0 * PI + 0.2) - 0.2).abs() < EPS);
        assert!((wrap_angle(2.0 * PI - 0.2) + 0.2).abs() < EPS);
        assert_eq!(wrap_angle(PI), PI);
        assert_eq!(wrap_angle(-PI), PI);
        for raw in [-20.0f32, -3.5, -0.1, 0.0, 0.1, 3.5, 20.0] {
            let w = wrap_angle(raw);
            assert!(w > -PI && w <= PI, "{raw} -> {w}");
        }
    }

    #[test]
    fn sanitize_dt_clamps_garbage() {
        assert_eq!(sanitize_dt(-0.5), 0.0);
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY), 0.0);
        assert_eq!(sanitize_dt(0.25), 0.25);
    }
}
