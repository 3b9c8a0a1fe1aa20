use emberfall_common::EntityId;
use glam::Vec3;

/// Mouse button that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// What a pointer ray hit in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// Name of the surface or visual that was hit.
    pub surface: String,
    pub point: Vec3,
    /// Entity owning the hit visual, if any.
    pub entity: Option<EntityId>,
}

impl PickHit {
    pub fn ground(surface: impl Into<String>, point: Vec3) -> Self {
        Self {
            surface: surface.into(),
            point,
            entity: None,
        }
    }
}

/// A high-level action produced by whatever owns the raw input.
///
/// Scenes consume actions, never raw events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Pointer pressed. `pick` is the scene hit under the cursor, if any.
    PointerDown {
        button: PointerButton,
        pick: Option<PickHit>,
    },
    /// Accept the current menu choice.
    Confirm,
    /// Leave the current scene.
    Back,
    SelectRace(String),
    SelectClass(String),
    /// Camera zoom, positive pulls the camera back.
    Zoom(f32),
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

impl Action {
    /// Left click on `surface` at `point`.
    pub fn click(surface: impl Into<String>, point: Vec3) -> Self {
        Self::PointerDown {
            button: PointerButton::Left,
            pick: Some(PickHit::ground(surface, point)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_is_a_left_pointer_down() {
        let a = Action::click("world-ground", Vec3::new(1.0, 0.0, 2.0));
        let Action::PointerDown { button, pick } = a else {
            panic!("expected pointer down");
        };
        assert_eq!(button, PointerButton::Left);
        let pick = pick.unwrap();
        assert_eq!(pick.surface, "world-ground");
        assert!(pick.entity.is_none());
    }

    #[test]
    fn menu_actions() {
        assert!(matches!(Action::SelectRace("elf".into()), Action::SelectRace(r) if r == "elf"));
        assert_ne!(Action::Confirm, Action::Back);
    }
}
