//! Action-method catalog
//!
//! The reflection-free registry behind "invoke by name": every behavior
//! kind maps action names to typed handler functions through static
//! tables. Each handler declares and validates its expected named
//! parameters before touching any state. A lazily-built index over the
//! tables serves lookups; it is a pure performance aid, never a
//! correctness dependency.

use ahash::AHashMap;
use glam::Vec2;
use std::sync::OnceLock;
use thiserror::Error;

use crate::actions::value::{ParamKind, ParamMap};
use crate::entity::behaviors::{self, BehaviorKind};
use crate::entity::Entity;
use crate::world::room::RoomCtx;

/// Context of one action invocation
pub struct ActionCall<'a> {
    /// Name of the entity that fired the triggering event
    pub sender: &'a str,
    pub params: &'a ParamMap,
}

/// Why an action invocation was rejected; reported, never fatal
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("missing parameter '{0}'")]
    MissingParam(&'static str),

    #[error("parameter '{0}' is not a {kind}", kind = .1.name())]
    MistypedParam(&'static str, ParamKind),

    #[error("{0}")]
    Rejected(String),
}

pub type ActionHandler = fn(&mut Entity, &mut RoomCtx, &ActionCall) -> Result<(), ActionError>;

/// One named action method and its dispatch metadata
pub struct ActionSpec {
    pub name: &'static str,
    /// Whether a disabled entity may still run this method
    pub executable_when_disabled: bool,
    pub handler: ActionHandler,
}

/// Actions every entity exposes regardless of behavior kind
pub static BUILTIN_ACTIONS: &[ActionSpec] = &[
    ActionSpec {
        name: "Enable",
        executable_when_disabled: true,
        handler: enable,
    },
    ActionSpec {
        name: "Disable",
        executable_when_disabled: false,
        handler: disable,
    },
    ActionSpec {
        name: "SetPosition",
        executable_when_disabled: false,
        handler: set_position,
    },
    ActionSpec {
        name: "Move",
        executable_when_disabled: false,
        handler: move_by,
    },
    ActionSpec {
        name: "SetSize",
        executable_when_disabled: false,
        handler: set_size,
    },
    ActionSpec {
        name: "Resize",
        executable_when_disabled: false,
        handler: resize_by,
    },
    ActionSpec {
        name: "Scale",
        executable_when_disabled: false,
        handler: scale,
    },
    ActionSpec {
        name: "ChangeTexture",
        executable_when_disabled: false,
        handler: change_texture,
    },
];

/// Resolve an action method for a behavior kind
pub fn lookup(kind: BehaviorKind, name: &str) -> Option<&'static ActionSpec> {
    let index = INDEX.get_or_init(build_index);
    index.get(&kind)?.get(name).copied()
}

type KindIndex = AHashMap<&'static str, &'static ActionSpec>;

static INDEX: OnceLock<AHashMap<BehaviorKind, KindIndex>> = OnceLock::new();

fn build_index() -> AHashMap<BehaviorKind, KindIndex> {
    let mut index = AHashMap::new();
    for &kind in BehaviorKind::ALL {
        let mut methods: KindIndex = AHashMap::new();
        for spec in BUILTIN_ACTIONS {
            methods.insert(spec.name, spec);
        }
        for spec in behaviors::variant_actions(kind) {
            methods.insert(spec.name, spec);
        }
        index.insert(kind, methods);
    }
    index
}

// --- parameter extraction -------------------------------------------------

pub fn require_vec2(call: &ActionCall, name: &'static str) -> Result<Vec2, ActionError> {
    let value = call
        .params
        .get(name)
        .ok_or(ActionError::MissingParam(name))?;
    value
        .as_vec2()
        .ok_or(ActionError::MistypedParam(name, ParamKind::Vector))
}

pub fn require_number(call: &ActionCall, name: &'static str) -> Result<f64, ActionError> {
    let value = call
        .params
        .get(name)
        .ok_or(ActionError::MissingParam(name))?;
    value
        .as_number()
        .ok_or(ActionError::MistypedParam(name, ParamKind::Number))
}

pub fn require_int(call: &ActionCall, name: &'static str) -> Result<i64, ActionError> {
    let value = call
        .params
        .get(name)
        .ok_or(ActionError::MissingParam(name))?;
    value
        .as_int()
        .ok_or(ActionError::MistypedParam(name, ParamKind::Number))
}

pub fn require_text<'a>(call: &'a ActionCall, name: &'static str) -> Result<&'a str, ActionError> {
    let value = call
        .params
        .get(name)
        .ok_or(ActionError::MissingParam(name))?;
    value
        .as_text()
        .ok_or(ActionError::MistypedParam(name, ParamKind::Text))
}

// --- built-in handlers ----------------------------------------------------

fn enable(e: &mut Entity, ctx: &mut RoomCtx, _call: &ActionCall) -> Result<(), ActionError> {
    e.set_enabled(ctx, true);
    Ok(())
}

fn disable(e: &mut Entity, ctx: &mut RoomCtx, _call: &ActionCall) -> Result<(), ActionError> {
    e.set_enabled(ctx, false);
    Ok(())
}

fn set_position(e: &mut Entity, ctx: &mut RoomCtx, call: &ActionCall) -> Result<(), ActionError> {
    let target = require_vec2(call, "Position")?;
    e.try_move(ctx, target, false, false);
    Ok(())
}

fn move_by(e: &mut Entity, ctx: &mut RoomCtx, call: &ActionCall) -> Result<(), ActionError> {
    let offset = require_vec2(call, "Offset")?;
    e.try_move(ctx, offset, true, false);
    Ok(())
}

fn set_size(e: &mut Entity, ctx: &mut RoomCtx, call: &ActionCall) -> Result<(), ActionError> {
    let size = require_vec2(call, "Size")?;
    e.try_resize(ctx, size, false);
    Ok(())
}

fn resize_by(e: &mut Entity, ctx: &mut RoomCtx, call: &ActionCall) -> Result<(), ActionError> {
    let amount = require_vec2(call, "Amount")?;
    e.try_resize(ctx, amount, true);
    Ok(())
}

fn scale(e: &mut Entity, ctx: &mut RoomCtx, call: &ActionCall) -> Result<(), ActionError> {
    let factor = require_number(call, "Factor")?;
    let size = e.size() * factor as f32;
    e.try_resize(ctx, size, false);
    Ok(())
}

fn change_texture(e: &mut Entity, _ctx: &mut RoomCtx, call: &ActionCall) -> Result<(), ActionError> {
    let texture = require_text(call, "Texture")?;
    e.texture = texture.to_owned();
    Ok(())
}
