//! Input listener behavior and the input snapshot it consumes
//!
//! The core never polls hardware: the host hands the room an
//! `InputSnapshot` of logical key names before each tick, and the room
//! latches the previous frame's snapshot so listeners can see edges.

use ahash::AHashSet;

use crate::core::error::Result;
use crate::entity::behaviors::Behavior;
use crate::entity::Entity;
use crate::world::room::RoomCtx;

/// Logical keys down during one frame
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    down: AHashSet<String>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            down: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn press(&mut self, key: impl Into<String>) {
        self.down.insert(key.into());
    }

    pub fn release(&mut self, key: &str) {
        self.down.remove(key);
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.down.contains(key)
    }
}

/// Fires key events for one logical key
#[derive(Debug, Clone)]
pub struct InputListener {
    pub key: String,
}

impl InputListener {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

pub(crate) fn tick(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    let key = match &e.behavior {
        Behavior::InputListener(l) => l.key.clone(),
        _ => return Ok(()),
    };
    if ctx.room.key_pressed(&key) {
        e.fire_event(ctx, "OnKeyPressed");
    }
    if ctx.room.key_released(&key) {
        e.fire_event(ctx, "OnKeyReleased");
    }
    if ctx.room.key_down(&key) {
        e.fire_event(ctx, "OnKeyDown");
    }
    Ok(())
}
