//! Player behavior
//!
//! Moves the player entity from the room's input snapshot, rejected by
//! room bounds and by collision tiles. Movement goes through the normal
//! move path, so `OnMove` links fire like any other entity's.

use glam::Vec2;

use crate::core::error::Result;
use crate::entity::behaviors::Behavior;
use crate::entity::Entity;
use crate::world::room::RoomCtx;

#[derive(Debug, Clone)]
pub struct Player {
    /// Movement speed in room units per second
    pub move_speed: f32,
    pub key_up: String,
    pub key_down: String,
    pub key_left: String,
    pub key_right: String,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            move_speed: 60.0,
            key_up: "Up".to_owned(),
            key_down: "Down".to_owned(),
            key_left: "Left".to_owned(),
            key_right: "Right".to_owned(),
        }
    }
}

pub(crate) fn tick(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    let (speed, up, down, left, right) = match &e.behavior {
        Behavior::Player(p) => (
            p.move_speed,
            p.key_up.clone(),
            p.key_down.clone(),
            p.key_left.clone(),
            p.key_right.clone(),
        ),
        _ => return Ok(()),
    };
    let mut dir = Vec2::ZERO;
    if ctx.room.key_down(&up) {
        dir.y -= 1.0;
    }
    if ctx.room.key_down(&down) {
        dir.y += 1.0;
    }
    if ctx.room.key_down(&left) {
        dir.x -= 1.0;
    }
    if ctx.room.key_down(&right) {
        dir.x += 1.0;
    }
    if dir == Vec2::ZERO {
        return Ok(());
    }
    let offset = dir.normalize_or_zero() * speed * ctx.dt;
    let candidate = e.position() + offset;
    let tl = Vec2::new(candidate.x - e.size().x / 2.0, candidate.y - e.size().y);
    if ctx.room.tiles.box_collides(tl, e.size()) {
        return Ok(());
    }
    e.try_move(ctx, offset, true, false);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let p = Player::default();
        assert_eq!(p.key_up, "Up");
        assert_eq!(p.key_right, "Right");
        assert!(p.move_speed > 0.0);
    }
}
