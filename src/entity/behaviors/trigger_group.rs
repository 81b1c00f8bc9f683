//! Trigger group behavior
//!
//! Watches a fixed list of trigger entities. Every member rising edge
//! fires `OnTriggerAny`; the group's own rising edge (no member
//! satisfied -> at least one satisfied) additionally fires
//! `OnTriggerGroup`. The group evaluates member conditions itself so
//! the result does not depend on tick ordering between group and
//! members.

use crate::core::error::Result;
use crate::entity::behaviors::{trigger, Behavior};
use crate::entity::Entity;
use crate::world::room::{Room, RoomCtx};

#[derive(Debug, Clone)]
pub struct TriggerGroup {
    /// Member trigger entity names, resolved by room lookup each tick
    pub members: Vec<String>,
    pub(crate) member_prev: Vec<bool>,
    pub(crate) member_current: Vec<bool>,
    pub(crate) group_prev: bool,
    pub(crate) group_current: bool,
}

impl TriggerGroup {
    pub fn new(members: Vec<String>) -> Self {
        Self {
            members,
            member_prev: Vec::new(),
            member_current: Vec::new(),
            group_prev: false,
            group_current: false,
        }
    }
}

/// A disabled, missing, or non-trigger member never satisfies
fn member_state(room: &Room, name: &str) -> bool {
    match room.get_entity(name) {
        Some(member) if member.is_enabled() => trigger::evaluate(member, room).unwrap_or(false),
        _ => false,
    }
}

pub(crate) fn init(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    let members = match &e.behavior {
        Behavior::TriggerGroup(g) => g.members.clone(),
        _ => return Ok(()),
    };
    let mut states = Vec::with_capacity(members.len());
    for name in &members {
        let problem = match ctx.room.get_entity(name) {
            None => Some(format!("linked trigger '{name}' not found")),
            Some(member) if !matches!(member.behavior, Behavior::Trigger(_)) => {
                Some(format!("linked entity '{name}' is not a trigger"))
            }
            Some(_) => None,
        };
        match problem {
            Some(message) => {
                ctx.room.sink_mut().error(Some(e.name()), message);
                states.push(false);
            }
            None => states.push(member_state(ctx.room, name)),
        }
    }
    let any = states.iter().any(|&s| s);
    if let Behavior::TriggerGroup(g) = &mut e.behavior {
        g.member_prev = states.clone();
        g.member_current = states;
        g.group_prev = any;
        g.group_current = any;
    }
    Ok(())
}

pub(crate) fn tick(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    let members = match &e.behavior {
        Behavior::TriggerGroup(g) => g.members.clone(),
        _ => return Ok(()),
    };
    let states: Vec<bool> = members
        .iter()
        .map(|name| member_state(ctx.room, name))
        .collect();
    let any = states.iter().any(|&s| s);
    let (rising_members, group_rising) = {
        let Behavior::TriggerGroup(g) = &mut e.behavior else {
            return Ok(());
        };
        if g.member_prev.len() != states.len() {
            g.member_prev = vec![false; states.len()];
        }
        let rising = states
            .iter()
            .zip(&g.member_prev)
            .filter(|(now, prev)| **now && !**prev)
            .count();
        g.member_current = states;
        g.group_current = any;
        (rising, any && !g.group_prev)
    };
    for _ in 0..rising_members {
        e.fire_event(ctx, "OnTriggerAny");
    }
    if group_rising {
        e.fire_event(ctx, "OnTriggerGroup");
    }
    Ok(())
}

pub(crate) fn after_tick(e: &mut Entity, _ctx: &mut RoomCtx) -> Result<()> {
    if let Behavior::TriggerGroup(g) = &mut e.behavior {
        g.member_prev = g.member_current.clone();
        g.group_prev = g.group_current;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_starts_unlatched() {
        let g = TriggerGroup::new(vec!["a".into(), "b".into()]);
        assert!(!g.group_prev);
        assert!(g.member_prev.is_empty());
    }
}
