//! Trigger behavior (edge detector)
//!
//! Recomputes "target currently satisfies the condition" every tick and
//! fires `OnTrigger` only on the rising edge relative to the previous
//! frame's state, which is latched at after-tick. The initial state is
//! latched at init, so a target already inside at room load never fires.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::CollisionMode;
use crate::entity::behaviors::Behavior;
use crate::entity::Entity;
use crate::world::room::{Room, RoomCtx};

/// Which side of the collision the trigger watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerCondition {
    /// Satisfied while the target is inside (enter-style trigger)
    #[default]
    Enter,
    /// Satisfied while the target is outside (exit-style trigger)
    Exit,
}

#[derive(Debug, Clone)]
pub struct Trigger {
    /// Name of the watched entity, resolved per tick
    pub target: String,
    pub mode: CollisionMode,
    pub condition: TriggerCondition,
    /// Previous frame's state, latched at after-tick
    pub(crate) was_satisfied: bool,
    /// This frame's state, computed at tick
    pub(crate) current: bool,
}

impl Trigger {
    pub fn new(target: impl Into<String>, mode: CollisionMode, condition: TriggerCondition) -> Self {
        Self {
            target: target.into(),
            mode,
            condition,
            was_satisfied: false,
            current: false,
        }
    }
}

/// Evaluate a trigger entity's condition against the room.
///
/// `None` when the entity is not a trigger or the target is absent; a
/// missing target never satisfies either condition.
pub(crate) fn evaluate(e: &Entity, room: &Room) -> Option<bool> {
    let Behavior::Trigger(cfg) = &e.behavior else {
        return None;
    };
    let target = room.get_entity(&cfg.target)?;
    let inside = match cfg.mode {
        CollisionMode::BoundingBox => e.collides_with(target),
        CollisionMode::Origin => e.collides_point(target.position()),
    };
    Some(match cfg.condition {
        TriggerCondition::Enter => inside,
        TriggerCondition::Exit => !inside,
    })
}

pub(crate) fn init(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    let target = match &e.behavior {
        Behavior::Trigger(t) => t.target.clone(),
        _ => return Ok(()),
    };
    if ctx.room.get_entity(&target).is_none() {
        ctx.room.sink_mut().error(
            Some(e.name()),
            format!("trigger target '{target}' not found"),
        );
    }
    let state = evaluate(e, ctx.room).unwrap_or(false);
    if let Behavior::Trigger(t) = &mut e.behavior {
        t.was_satisfied = state;
        t.current = state;
    }
    Ok(())
}

pub(crate) fn tick(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    let current = evaluate(e, ctx.room).unwrap_or(false);
    let rising = {
        let Behavior::Trigger(t) = &mut e.behavior else {
            return Ok(());
        };
        t.current = current;
        current && !t.was_satisfied
    };
    if rising {
        e.fire_event(ctx, "OnTrigger");
    }
    Ok(())
}

pub(crate) fn after_tick(e: &mut Entity, _ctx: &mut RoomCtx) -> Result<()> {
    if let Behavior::Trigger(t) = &mut e.behavior {
        t.was_satisfied = t.current;
    }
    Ok(())
}
