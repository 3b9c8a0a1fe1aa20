//! Shared types for the emberfall game core.
//!
//! # Invariants
//! - Entity ids are handed out monotonically and never reused within a process.
//! - `Transform::position.y` is ground level for everything the kernel moves.

pub mod types;

pub use types::{AliveFlag, EntityId, EntityKind, EntityTag, TagSet, Transform, WorldId};
