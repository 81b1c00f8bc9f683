//! Behavior variants
//!
//! The closed set of behaviors an entity can carry, composed with the
//! shared entity record instead of an inheritance chain. Each variant
//! lives in its own module with its config/state, lifecycle hooks, and
//! action-method table.

pub mod broadcast;
pub mod counter;
pub mod input;
pub mod logic_gate;
pub mod param_holder;
pub mod player;
pub mod spawner;
pub mod timer;
pub mod trigger;
pub mod trigger_group;

pub use broadcast::Broadcast;
pub use counter::{BoundsMode, Counter};
pub use input::{InputListener, InputSnapshot};
pub use logic_gate::{GateOp, LogicGate};
pub use param_holder::ParamHolder;
pub use player::Player;
pub use spawner::Spawner;
pub use timer::{Timer, TimerClock};
pub use trigger::{Trigger, TriggerCondition};
pub use trigger_group::TriggerGroup;

use crate::actions::catalog::ActionSpec;
use crate::core::error::Result;
use crate::entity::Entity;
use crate::world::room::RoomCtx;

/// Variant-specific state of an entity
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Plain scenery or spawn-point entity; no tick logic
    Static,
    Timer(Timer),
    Counter(Counter),
    LogicGate(LogicGate),
    Trigger(Trigger),
    TriggerGroup(TriggerGroup),
    Spawner(Spawner),
    Broadcast(Broadcast),
    ParamHolder(ParamHolder),
    InputListener(InputListener),
    Player(Player),
}

/// Discriminant used for action-method lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    Static,
    Timer,
    Counter,
    LogicGate,
    Trigger,
    TriggerGroup,
    Spawner,
    Broadcast,
    ParamHolder,
    InputListener,
    Player,
}

impl BehaviorKind {
    pub const ALL: &'static [BehaviorKind] = &[
        BehaviorKind::Static,
        BehaviorKind::Timer,
        BehaviorKind::Counter,
        BehaviorKind::LogicGate,
        BehaviorKind::Trigger,
        BehaviorKind::TriggerGroup,
        BehaviorKind::Spawner,
        BehaviorKind::Broadcast,
        BehaviorKind::ParamHolder,
        BehaviorKind::InputListener,
        BehaviorKind::Player,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BehaviorKind::Static => "Static",
            BehaviorKind::Timer => "Timer",
            BehaviorKind::Counter => "Counter",
            BehaviorKind::LogicGate => "LogicGate",
            BehaviorKind::Trigger => "Trigger",
            BehaviorKind::TriggerGroup => "TriggerGroup",
            BehaviorKind::Spawner => "Spawner",
            BehaviorKind::Broadcast => "Broadcast",
            BehaviorKind::ParamHolder => "ParamHolder",
            BehaviorKind::InputListener => "InputListener",
            BehaviorKind::Player => "Player",
        }
    }
}

impl Behavior {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Static => BehaviorKind::Static,
            Behavior::Timer(_) => BehaviorKind::Timer,
            Behavior::Counter(_) => BehaviorKind::Counter,
            Behavior::LogicGate(_) => BehaviorKind::LogicGate,
            Behavior::Trigger(_) => BehaviorKind::Trigger,
            Behavior::TriggerGroup(_) => BehaviorKind::TriggerGroup,
            Behavior::Spawner(_) => BehaviorKind::Spawner,
            Behavior::Broadcast(_) => BehaviorKind::Broadcast,
            Behavior::ParamHolder(_) => BehaviorKind::ParamHolder,
            Behavior::InputListener(_) => BehaviorKind::InputListener,
            Behavior::Player(_) => BehaviorKind::Player,
        }
    }

    /// Clear runtime-only state; spawn clones start from here
    pub(crate) fn reset_runtime(&mut self) {
        match self {
            Behavior::Timer(t) => t.elapsed = 0.0,
            Behavior::LogicGate(g) => {
                g.inputs_this_frame = 0;
                g.inputs_last_frame = 0;
            }
            Behavior::Trigger(t) => {
                t.was_satisfied = false;
                t.current = false;
            }
            Behavior::TriggerGroup(g) => {
                g.member_prev.clear();
                g.member_current.clear();
                g.group_prev = false;
                g.group_current = false;
            }
            Behavior::Spawner(s) => {
                s.template = None;
                s.spawned = 0;
            }
            Behavior::Broadcast(b) => {
                b.compiled = None;
                b.resolved.clear();
            }
            Behavior::Static
            | Behavior::Counter(_)
            | Behavior::ParamHolder(_)
            | Behavior::InputListener(_)
            | Behavior::Player(_) => {}
        }
    }
}

/// Action methods specific to a behavior kind
pub(crate) fn variant_actions(kind: BehaviorKind) -> &'static [ActionSpec] {
    match kind {
        BehaviorKind::Timer => timer::ACTIONS,
        BehaviorKind::Counter => counter::ACTIONS,
        BehaviorKind::LogicGate => logic_gate::ACTIONS,
        BehaviorKind::Spawner => spawner::ACTIONS,
        BehaviorKind::Broadcast => broadcast::ACTIONS,
        _ => &[],
    }
}

pub(crate) fn init(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    match e.behavior.kind() {
        BehaviorKind::Timer => timer::init(e, ctx),
        BehaviorKind::Trigger => trigger::init(e, ctx),
        BehaviorKind::TriggerGroup => trigger_group::init(e, ctx),
        BehaviorKind::Spawner => spawner::init(e, ctx),
        BehaviorKind::Broadcast => broadcast::init(e, ctx),
        _ => Ok(()),
    }
}

pub(crate) fn destroy(_e: &mut Entity, _ctx: &mut RoomCtx) -> Result<()> {
    // No variant holds external resources; re-enabling goes back
    // through init, which re-arms whatever it needs.
    Ok(())
}

pub(crate) fn tick(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    match e.behavior.kind() {
        BehaviorKind::Timer => timer::tick(e, ctx),
        BehaviorKind::LogicGate => logic_gate::tick(e, ctx),
        BehaviorKind::Trigger => trigger::tick(e, ctx),
        BehaviorKind::TriggerGroup => trigger_group::tick(e, ctx),
        BehaviorKind::InputListener => input::tick(e, ctx),
        BehaviorKind::Player => player::tick(e, ctx),
        _ => Ok(()),
    }
}

pub(crate) fn after_tick(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    match e.behavior.kind() {
        BehaviorKind::LogicGate => logic_gate::after_tick(e, ctx),
        BehaviorKind::Trigger => trigger::after_tick(e, ctx),
        BehaviorKind::TriggerGroup => trigger_group::after_tick(e, ctx),
        _ => Ok(()),
    }
}
