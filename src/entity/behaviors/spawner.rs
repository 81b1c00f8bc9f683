//! Entity spawner behavior
//!
//! Clones a template entity at one of a set of named spawn points. The
//! template is a prototype: at init the room's copy is removed and a
//! private clone is kept inside the spawner. Clone names come from a
//! base-name prefix plus a monotonically incrementing counter.

use rand::Rng;

use crate::actions::catalog::{ActionCall, ActionError, ActionSpec};
use crate::core::error::Result;
use crate::entity::behaviors::Behavior;
use crate::entity::Entity;
use crate::world::room::RoomCtx;

#[derive(Debug, Clone)]
pub struct Spawner {
    /// Spawn-point entity names; the choice is uniform among the
    /// currently enabled ones
    pub spawn_points: Vec<String>,
    /// Name of the template entity removed from the room at init
    pub template_name: String,
    /// Prefix for clone names; defaults to the template name at load
    pub base_name: String,
    /// Prototype held after init; never part of the room
    pub(crate) template: Option<Box<Entity>>,
    /// Monotonic clone counter
    pub(crate) spawned: u64,
}

impl Spawner {
    pub fn new(
        template_name: impl Into<String>,
        spawn_points: Vec<String>,
        base_name: impl Into<String>,
    ) -> Self {
        Self {
            spawn_points,
            template_name: template_name.into(),
            base_name: base_name.into(),
            template: None,
            spawned: 0,
        }
    }
}

pub(crate) fn init(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    let (spawn_points, template_name, already_held) = match &e.behavior {
        Behavior::Spawner(s) => (
            s.spawn_points.clone(),
            s.template_name.clone(),
            s.template.is_some(),
        ),
        _ => return Ok(()),
    };
    for name in &spawn_points {
        if ctx.room.get_entity(name).is_none() {
            ctx.room
                .sink_mut()
                .error(Some(e.name()), format!("spawn point '{name}' not found"));
        }
    }
    // Re-enabling keeps the prototype taken during the first init
    if already_held {
        return Ok(());
    }
    let clone = ctx
        .room
        .get_entity(&template_name)
        .map(|t| Box::new(t.clone_spawned(template_name.clone())));
    match clone {
        None => {
            ctx.room.sink_mut().error(
                Some(e.name()),
                format!("spawn template '{template_name}' not found"),
            );
        }
        Some(template) => {
            if let Behavior::Spawner(s) = &mut e.behavior {
                s.template = Some(template);
            }
            if let Err(err) = ctx.room.remove_entity(&template_name) {
                let name = e.name().to_owned();
                ctx.room.sink_mut().error(
                    Some(&name),
                    format!("failed to remove spawn template from room: {err}"),
                );
            }
        }
    }
    Ok(())
}

fn spawn_entity(e: &mut Entity, ctx: &mut RoomCtx, _call: &ActionCall) -> std::result::Result<(), ActionError> {
    let (spawn_points, base_name, counter_start, has_template) = match &e.behavior {
        Behavior::Spawner(s) => (
            s.spawn_points.clone(),
            s.base_name.clone(),
            s.spawned,
            s.template.is_some(),
        ),
        _ => return Err(ActionError::Rejected("entity is not a spawner".into())),
    };
    if !has_template {
        return Err(ActionError::Rejected("no spawn template resolved".into()));
    }

    let enabled_points: Vec<(String, glam::Vec2)> = spawn_points
        .iter()
        .filter_map(|name| {
            ctx.room
                .get_entity(name)
                .filter(|p| p.is_enabled())
                .map(|p| (name.clone(), p.position()))
        })
        .collect();
    if enabled_points.is_empty() {
        let name = e.name().to_owned();
        ctx.room
            .sink_mut()
            .warn(Some(&name), "no enabled spawn points; nothing spawned");
        return Ok(());
    }
    let pick = ctx.room.rng_mut().gen_range(0..enabled_points.len());
    let (point_name, point_position) = enabled_points[pick].clone();

    // Derive a unique clone name from the monotonic counter
    let mut counter = counter_start;
    let clone_name = loop {
        let candidate = format!("{base_name}{counter}");
        counter += 1;
        if ctx.room.index_of(&candidate).is_none() && !ctx.room.pending_has(&candidate) {
            break candidate;
        }
    };

    let mut clone = {
        let Behavior::Spawner(s) = &mut e.behavior else {
            return Err(ActionError::Rejected("entity is not a spawner".into()));
        };
        s.spawned = counter;
        match &s.template {
            Some(template) => template.clone_spawned(clone_name),
            None => return Err(ActionError::Rejected("no spawn template resolved".into())),
        }
    };
    // The spawn point is in-bounds by definition; bypass bounds rejection
    clone.set_position_forced(point_position);
    if let Err(err) = ctx.room.add_entity(clone) {
        let name = e.name().to_owned();
        ctx.room
            .sink_mut()
            .error(Some(&name), format!("spawned entity rejected: {err}"));
        return Ok(());
    }

    // Notify the chosen spawn point through its own links
    if let Some(idx) = ctx.room.index_of(&point_name) {
        if let Some(mut point) = ctx.room.take_slot(idx) {
            point.fire_event(ctx, "OnSpawn");
            ctx.room.restore_slot(idx, point);
        }
    }
    Ok(())
}

pub(crate) static ACTIONS: &[ActionSpec] = &[ActionSpec {
    name: "SpawnEntity",
    executable_when_disabled: false,
    handler: spawn_entity,
}];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_spawner_holds_no_template() {
        let s = Spawner::new("bat", vec!["north".into(), "south".into()], "bat_");
        assert!(s.template.is_none());
        assert_eq!(s.spawned, 0);
        assert_eq!(s.spawn_points.len(), 2);
    }
}
