//! Core type definitions used throughout the engine

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// Simulation frame counter
pub type Tick = u64;

/// Opaque token identifying a live room instance
///
/// Entities hold this instead of a reference to their room, so the
/// room exclusively owns its entities and the back-link is lookup-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(pub u32);

static NEXT_ROOM_ID: AtomicU32 = AtomicU32::new(1);

impl RoomId {
    /// Allocate a fresh process-unique room token
    pub fn next() -> Self {
        Self(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// How a trigger tests its target against its own box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionMode {
    /// Full axis-aligned box overlap
    #[default]
    BoundingBox,
    /// Only the target's anchor point
    Origin,
}

impl CollisionMode {
    /// Parse a mode name, rejecting anything malformed
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "BoundingBox" => Some(Self::BoundingBox),
            "Origin" => Some(Self::Origin),
            _ => None,
        }
    }
}

/// Half-open AABB overlap test
///
/// Boxes span `[top_left, bottom_right)`, so boxes that merely share an
/// edge do not overlap.
pub fn aabb_overlap(tl_a: Vec2, br_a: Vec2, tl_b: Vec2, br_b: Vec2) -> bool {
    tl_a.x < br_b.x && tl_b.x < br_a.x && tl_a.y < br_b.y && tl_b.y < br_a.y
}

/// Half-open point-in-box test
pub fn aabb_contains(tl: Vec2, br: Vec2, p: Vec2) -> bool {
    p.x >= tl.x && p.x < br.x && p.y >= tl.y && p.y < br.y
}
