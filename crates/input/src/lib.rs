//! Input: pointer and menu input mapped to shared actions.
//!
//! # Invariants
//! - Scenes see [`Action`]s only, never raw window events.
//! - A click resolves to at most one ground destination.

pub mod action;
pub mod click;

pub use action::{Action, PickHit, PointerButton};
pub use click::ClickToMove;
