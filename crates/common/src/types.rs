use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use uuid::Uuid;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an entity, assigned monotonically at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Allocate the next id from the process-wide counter.
    pub fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity_{}", self.0)
    }
}

/// Identifies one world instance. A fresh world scene gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub Uuid);

impl WorldId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorldId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.8}", self.0.to_string())
    }
}

/// Closed set of entity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Player,
    Npc,
    Monster,
    Item,
    Trigger,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Player => "player",
            Self::Npc => "npc",
            Self::Monster => "monster",
            Self::Item => "item",
            Self::Trigger => "trigger",
        };
        f.write_str(s)
    }
}

/// Descriptive tags used by systems to filter entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityTag {
    Interactable,
    Hostile,
    Friendly,
    Collidable,
    Lootable,
}

/// Ordered set of tags attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet(BTreeSet<EntityTag>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, tag: EntityTag) -> bool {
        self.0.contains(&tag)
    }

    /// Returns false if the tag was already present.
    pub fn add(&mut self, tag: EntityTag) -> bool {
        self.0.insert(tag)
    }

    /// Returns false if the tag was not present.
    pub fn remove(&mut self, tag: EntityTag) -> bool {
        self.0.remove(&tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityTag> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[EntityTag; N]> for TagSet {
    fn from(tags: [EntityTag; N]) -> Self {
        Self(tags.into_iter().collect())
    }
}

/// Ground-plane transform: a position plus a facing angle around +Y.
///
/// Yaw 0 faces +Z; positive yaw turns toward +X, matching `atan2(dx, dz)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub yaw: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Facing as a quaternion, for renderers that want one.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Distance on the XZ plane, ignoring height.
    pub fn planar_distance(&self, other: Vec3) -> f32 {
        let dx = other.x - self.position.x;
        let dz = other.z - self.position.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Shared liveness token. Cleared exactly when its owner is disposed.
///
/// Clones observe the same flag, so work that outlives a frame (asset loads)
/// can check whether its owner still exists before touching it.
#[derive(Debug, Clone)]
pub struct AliveFlag(Arc<AtomicBool>);

impl AliveFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for AliveFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_are_monotonic() {
        let a = EntityId::next();
        let b = EntityId::next();
        assert!(b > a);
    }

    #[test]
    fn entity_id_display() {
        assert_eq!(EntityId(7).to_string(), "entity_7");
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(EntityKind::Monster.to_string(), "monster");
    }

    #[test]
    fn tag_set_add_remove() {
        let mut tags = TagSet::from([EntityTag::Collidable]);
        assert!(tags.has(EntityTag::Collidable));
        assert!(!tags.add(EntityTag::Collidable));
        assert!(tags.add(EntityTag::Hostile));
        assert_eq!(tags.len(), 2);
        assert!(tags.remove(EntityTag::Hostile));
        assert!(!tags.has(EntityTag::Hostile));
    }

    #[test]
    fn transform_default_is_origin_facing_forward() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.yaw, 0.0);
        assert_eq!(t.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn planar_distance_ignores_height() {
        let t = Transform::at(Vec3::new(0.0, 5.0, 0.0));
        assert!((t.planar_distance(Vec3::new(3.0, -2.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn alive_flag_is_shared_between_clones() {
        let flag = AliveFlag::new();
        let observer = flag.clone();
        assert!(observer.is_alive());
        flag.kill();
        assert!(!observer.is_alive());
    }
}
