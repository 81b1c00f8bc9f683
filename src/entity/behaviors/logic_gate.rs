//! Boolean logic gate behavior
//!
//! Counts `Input` invocations received during the tick pass; the count
//! is latched at after-tick and evaluated on the *next* tick, so there
//! is a deliberate one-frame latency between inputs arriving and the
//! gate firing `OnTrue`.

use serde::{Deserialize, Serialize};

use crate::actions::catalog::{ActionCall, ActionError, ActionSpec};
use crate::core::error::Result;
use crate::entity::behaviors::Behavior;
use crate::entity::Entity;
use crate::world::room::RoomCtx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateOp {
    And,
    Or,
    Xor,
}

impl GateOp {
    /// Evaluate against the number of inputs received last frame
    pub fn eval(&self, inputs: u32) -> bool {
        match self {
            GateOp::And => inputs >= 2,
            GateOp::Or => inputs >= 1,
            GateOp::Xor => inputs == 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogicGate {
    pub op: GateOp,
    pub(crate) inputs_this_frame: u32,
    pub(crate) inputs_last_frame: u32,
}

impl LogicGate {
    pub fn new(op: GateOp) -> Self {
        Self {
            op,
            inputs_this_frame: 0,
            inputs_last_frame: 0,
        }
    }
}

pub(crate) fn tick(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    let satisfied = {
        let Behavior::LogicGate(g) = &e.behavior else {
            return Ok(());
        };
        g.op.eval(g.inputs_last_frame)
    };
    if satisfied {
        e.fire_event(ctx, "OnTrue");
    }
    Ok(())
}

pub(crate) fn after_tick(e: &mut Entity, _ctx: &mut RoomCtx) -> Result<()> {
    if let Behavior::LogicGate(g) = &mut e.behavior {
        g.inputs_last_frame = g.inputs_this_frame;
        g.inputs_this_frame = 0;
    }
    Ok(())
}

fn input(e: &mut Entity, _ctx: &mut RoomCtx, _call: &ActionCall) -> std::result::Result<(), ActionError> {
    let Behavior::LogicGate(g) = &mut e.behavior else {
        return Err(ActionError::Rejected("entity is not a logic gate".into()));
    };
    g.inputs_this_frame = g.inputs_this_frame.saturating_add(1);
    Ok(())
}

pub(crate) static ACTIONS: &[ActionSpec] = &[ActionSpec {
    name: "Input",
    executable_when_disabled: false,
    handler: input,
}];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_needs_two_inputs() {
        assert!(!GateOp::And.eval(0));
        assert!(!GateOp::And.eval(1));
        assert!(GateOp::And.eval(2));
        assert!(GateOp::And.eval(3));
    }

    #[test]
    fn test_or_needs_one_input() {
        assert!(!GateOp::Or.eval(0));
        assert!(GateOp::Or.eval(1));
        assert!(GateOp::Or.eval(5));
    }

    #[test]
    fn test_xor_needs_exactly_one() {
        assert!(!GateOp::Xor.eval(0));
        assert!(GateOp::Xor.eval(1));
        assert!(!GateOp::Xor.eval(2));
    }
}
