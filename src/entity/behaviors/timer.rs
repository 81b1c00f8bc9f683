//! Timer behavior
//!
//! Counts a monotonic clock (frames or accumulated wall time) toward a
//! fixed interval and fires `TimerElapsed` on arrival. A repeating timer
//! re-arms with the remainder carried over; a one-shot timer disables
//! itself and stays terminal until explicitly re-enabled.

use serde::{Deserialize, Serialize};

use crate::actions::catalog::{ActionCall, ActionError, ActionSpec};
use crate::core::error::{EngineError, Result};
use crate::entity::behaviors::Behavior;
use crate::entity::Entity;
use crate::world::room::RoomCtx;

/// Which monotonic clock the timer compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimerClock {
    /// One unit per simulation frame
    #[default]
    Frames,
    /// Accumulated `dt` in seconds
    Seconds,
}

#[derive(Debug, Clone)]
pub struct Timer {
    /// Units of the configured clock between firings; must be positive
    pub interval: f64,
    pub clock: TimerClock,
    pub repeat: bool,
    /// Runtime clock accumulator, reset on init
    pub(crate) elapsed: f64,
}

impl Timer {
    pub fn new(interval: f64, clock: TimerClock, repeat: bool) -> Self {
        Self {
            interval,
            clock,
            repeat,
            elapsed: 0.0,
        }
    }
}

pub(crate) fn init(e: &mut Entity, _ctx: &mut RoomCtx) -> Result<()> {
    let Behavior::Timer(t) = &mut e.behavior else {
        return Ok(());
    };
    t.elapsed = 0.0;
    if t.interval <= 0.0 {
        return Err(EngineError::Behavior(format!(
            "timer interval must be positive, got {}",
            t.interval
        )));
    }
    Ok(())
}

pub(crate) fn tick(e: &mut Entity, ctx: &mut RoomCtx) -> Result<()> {
    let (fires, disable) = {
        let Behavior::Timer(t) = &mut e.behavior else {
            return Ok(());
        };
        if t.interval <= 0.0 {
            return Ok(());
        }
        t.elapsed += match t.clock {
            TimerClock::Frames => 1.0,
            TimerClock::Seconds => f64::from(ctx.dt),
        };
        let mut fires = 0u32;
        let mut disable = false;
        while t.elapsed >= t.interval {
            fires += 1;
            if t.repeat {
                t.elapsed -= t.interval;
            } else {
                disable = true;
                break;
            }
        }
        (fires, disable)
    };
    for _ in 0..fires {
        e.fire_event(ctx, "TimerElapsed");
    }
    if disable {
        e.set_enabled(ctx, false);
    }
    Ok(())
}

fn reset(e: &mut Entity, _ctx: &mut RoomCtx, _call: &ActionCall) -> std::result::Result<(), ActionError> {
    let Behavior::Timer(t) = &mut e.behavior else {
        return Err(ActionError::Rejected("entity is not a timer".into()));
    };
    t.elapsed = 0.0;
    Ok(())
}

pub(crate) static ACTIONS: &[ActionSpec] = &[ActionSpec {
    name: "Reset",
    executable_when_disabled: false,
    handler: reset,
}];
