//! Action broadcast behavior
//!
//! Fans one action method out to every room entity whose name matches a
//! configured regular expression, with a parameter map pre-resolved at
//! init from parameter-holder entities. Entities that fail to match are
//! silently skipped.

use regex::Regex;

use crate::actions::catalog::{ActionCall, ActionError, ActionSpec};
use crate::actions::value::ParamMap;
use crate::core::error::Result;
use crate::entity::behaviors::Behavior;
use crate::entity::Entity;
use crate::world::room::RoomCtx;

#[derive(Debug, Clone)]
pub struct Broadcast {
    /// Regular expression matched against entity names
    pub pattern: String,
    /// Action method invoked on every match
    pub action: String,
    /// Names of `ParamHolder` entities contributing parameters
    pub param_sources: Vec<String>,
    pub(crate) compiled: Option<Regex>,
    pub(crate) resolved: ParamMap,
}

impl Broadcast {
    pub fn new(pattern: impl Into<String>, action: impl Into<String>, param_sources: Vec<String>) -> Self {
        Self {
            pattern: pattern.into(),
            action: action.into(),
            param_sources,
            compiled: None,
            resolved: ParamMap::new(),
        }
    }
}

pub(crate) fn init(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    let (pattern, sources) = match &e.behavior {
        Behavior::Broadcast(b) => (b.pattern.clone(), b.param_sources.clone()),
        _ => return Ok(()),
    };
    let compiled = match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            ctx.room.sink_mut().error(
                Some(e.name()),
                format!("broadcast pattern '{pattern}' failed to compile: {err}"),
            );
            None
        }
    };
    let mut resolved = ParamMap::new();
    for source in &sources {
        let entry = match ctx.room.get_entity(source) {
            None => Err(format!("parameter holder '{source}' not found")),
            Some(holder) => match &holder.behavior {
                Behavior::ParamHolder(p) => Ok((p.key.clone(), p.value.clone())),
                _ => Err(format!("entity '{source}' is not a parameter holder")),
            },
        };
        match entry {
            Ok((key, value)) => {
                resolved.insert(key, value);
            }
            Err(message) => ctx.room.sink_mut().error(Some(e.name()), message),
        }
    }
    if let Behavior::Broadcast(b) = &mut e.behavior {
        b.compiled = compiled;
        b.resolved = resolved;
    }
    Ok(())
}

fn broadcast(e: &mut Entity, ctx: &mut RoomCtx, _call: &ActionCall) -> std::result::Result<(), ActionError> {
    let (regex, action, params) = match &e.behavior {
        Behavior::Broadcast(b) => (b.compiled.clone(), b.action.clone(), b.resolved.clone()),
        _ => return Err(ActionError::Rejected("entity is not a broadcaster".into())),
    };
    let Some(regex) = regex else {
        return Err(ActionError::Rejected(
            "broadcast pattern was not compiled".into(),
        ));
    };
    if ctx.depth >= ctx.room.config().max_dispatch_depth {
        let name = e.name().to_owned();
        ctx.room
            .sink_mut()
            .error(Some(&name), "broadcast dropped: dispatch depth limit reached");
        return Ok(());
    }
    let sender = e.name().to_owned();

    let mut targets = Vec::new();
    for idx in 0..ctx.room.slot_count() {
        if let Some(entity) = ctx.room.entity_at(idx) {
            if regex.is_match(entity.name()) {
                targets.push(idx);
            }
        }
    }

    ctx.depth += 1;
    for idx in targets {
        if let Some(mut target) = ctx.room.take_slot(idx) {
            target.run_action_method(ctx, &action, &sender, &params);
            ctx.room.restore_slot(idx, target);
        }
    }
    // The broadcaster itself is detached from its slot; a self-match
    // runs directly.
    if regex.is_match(&sender) {
        e.run_action_method(ctx, &action, &sender, &params);
    }
    ctx.depth -= 1;
    Ok(())
}

pub(crate) static ACTIONS: &[ActionSpec] = &[ActionSpec {
    name: "Broadcast",
    executable_when_disabled: false,
    handler: broadcast,
}];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_broadcast_is_unresolved() {
        let b = Broadcast::new("^crate_\\d+$", "Disable", vec![]);
        assert!(b.compiled.is_none());
        assert!(b.resolved.is_empty());
    }
}
