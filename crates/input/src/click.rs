use glam::Vec2;

use crate::action::{Action, PointerButton};

/// Turns pointer actions into ground destinations.
///
/// Only left clicks that land on the walkable surface count. Everything else
/// (other buttons, misses, clicks on entities or props) is ignored.
#[derive(Debug, Clone)]
pub struct ClickToMove {
    ground: String,
}

impl ClickToMove {
    pub fn new(ground: impl Into<String>) -> Self {
        Self {
            ground: ground.into(),
        }
    }

    pub fn ground(&self) -> &str {
        &self.ground
    }

    /// Destination on the ground plane (`x`, `z`) for this action, if any.
    pub fn resolve(&self, action: &Action) -> Option<Vec2> {
        let Action::PointerDown { button, pick } = action else {
            return None;
        };
        if *button != PointerButton::Left {
            return None;
        }
        let hit = pick.as_ref()?;
        if hit.surface != self.ground {
            tracing::trace!(surface = %hit.surface, "click off the ground");
            return None;
        }
        if !hit.point.x.is_finite() || !hit.point.z.is_finite() {
            return None;
        }
        Some(Vec2::new(hit.point.x, hit.point.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::PickHit;
    use glam::Vec3;

    #[test]
    fn left_click_on_ground() {
        let r = ClickToMove::new("world-ground");
        let a = Action::click("world-ground", Vec3::new(3.0, 0.2, -4.0));
        assert_eq!(r.resolve(&a), Some(Vec2::new(3.0, -4.0)));
    }

    #[test]
    fn ignores_other_clicks() {
        let r = ClickToMove::new("world-ground");
        assert_eq!(r.resolve(&Action::click("npc_Mira", Vec3::ONE)), None);
        assert_eq!(
            r.resolve(&Action::PointerDown {
                button: PointerButton::Right,
                pick: Some(PickHit::ground("world-ground", Vec3::ONE)),
            }),
            None
        );
        assert_eq!(
            r.resolve(&Action::PointerDown {
                button: PointerButton::Left,
                pick: None,
            }),
            None
        );
        assert_eq!(r.resolve(&Action::Confirm), None);
        assert_eq!(
            r.resolve(&Action::click("world-ground", Vec3::new(f32::NAN, 0.0, 1.0))),
            None
        );
    }
}
