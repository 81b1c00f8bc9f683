//! Counter behavior
//!
//! A bounded integer accumulator. Setting the value fires
//! `OnMinimumReached`/`OnMaximumReached` when the pre-bounding value
//! reaches either inclusive bound, then applies the bounding policy.

use serde::{Deserialize, Serialize};

use crate::actions::catalog::{self, ActionCall, ActionError, ActionSpec};
use crate::entity::behaviors::Behavior;
use crate::entity::Entity;
use crate::world::room::RoomCtx;

/// What happens to a value outside `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundsMode {
    /// Saturate at the violated bound
    #[default]
    Clamp,
    /// Floor-mod into the inclusive span, so negative offsets wrap
    Wrap,
    /// Store unmodified
    Ignore,
}

#[derive(Debug, Clone)]
pub struct Counter {
    pub min: i64,
    pub max: i64,
    pub current: i64,
    pub mode: BoundsMode,
}

/// Which bound events a value change produced
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundEvents {
    pub at_min: bool,
    pub at_max: bool,
}

impl Counter {
    pub fn new(min: i64, max: i64, current: i64, mode: BoundsMode) -> Self {
        Self {
            min,
            max,
            current,
            mode,
        }
    }

    /// Store a new value, returning which bound events to fire.
    ///
    /// Bound events are decided on the pre-bounding value; the stored
    /// value is the bounded one.
    pub fn apply(&mut self, value: i64) -> BoundEvents {
        let events = BoundEvents {
            at_min: value <= self.min,
            at_max: value >= self.max,
        };
        self.current = match self.mode {
            BoundsMode::Clamp => value.max(self.min).min(self.max),
            BoundsMode::Wrap => {
                let span = self.max - self.min + 1;
                self.min + (value - self.min).rem_euclid(span)
            }
            BoundsMode::Ignore => value,
        };
        events
    }
}

fn store_and_fire(e: &mut Entity, ctx: &mut RoomCtx, value: i64) -> Result<(), ActionError> {
    let events = {
        let Behavior::Counter(c) = &mut e.behavior else {
            return Err(ActionError::Rejected("entity is not a counter".into()));
        };
        if c.min > c.max {
            return Err(ActionError::Rejected(format!(
                "counter bounds are inverted: min {} > max {}",
                c.min, c.max
            )));
        }
        c.apply(value)
    };
    if events.at_min {
        e.fire_event(ctx, "OnMinimumReached");
    }
    if events.at_max {
        e.fire_event(ctx, "OnMaximumReached");
    }
    Ok(())
}

fn current_value(e: &Entity) -> Result<i64, ActionError> {
    match &e.behavior {
        Behavior::Counter(c) => Ok(c.current),
        _ => Err(ActionError::Rejected("entity is not a counter".into())),
    }
}

fn increment(e: &mut Entity, ctx: &mut RoomCtx, call: &ActionCall) -> Result<(), ActionError> {
    let amount = catalog::require_int(call, "Amount")?;
    let value = current_value(e)?.saturating_add(amount);
    store_and_fire(e, ctx, value)
}

fn decrement(e: &mut Entity, ctx: &mut RoomCtx, call: &ActionCall) -> Result<(), ActionError> {
    let amount = catalog::require_int(call, "Amount")?;
    let value = current_value(e)?.saturating_sub(amount);
    store_and_fire(e, ctx, value)
}

fn set_value(e: &mut Entity, ctx: &mut RoomCtx, call: &ActionCall) -> Result<(), ActionError> {
    let value = catalog::require_int(call, "Value")?;
    store_and_fire(e, ctx, value)
}

pub(crate) static ACTIONS: &[ActionSpec] = &[
    ActionSpec {
        name: "IncrementValue",
        executable_when_disabled: false,
        handler: increment,
    },
    ActionSpec {
        name: "DecrementValue",
        executable_when_disabled: false,
        handler: decrement,
    },
    ActionSpec {
        name: "SetValue",
        executable_when_disabled: false,
        handler: set_value,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_over_maximum() {
        let mut c = Counter::new(0, 10, 0, BoundsMode::Wrap);
        c.apply(11);
        assert_eq!(c.current, 0);
    }

    #[test]
    fn test_wrap_below_minimum() {
        let mut c = Counter::new(0, 10, 0, BoundsMode::Wrap);
        c.apply(-1);
        assert_eq!(c.current, 10);
    }

    #[test]
    fn test_wrap_with_negative_minimum() {
        let mut c = Counter::new(-5, 4, 0, BoundsMode::Wrap);
        c.apply(5);
        assert_eq!(c.current, -5);
        c.apply(-6);
        assert_eq!(c.current, 4);
    }

    #[test]
    fn test_clamp_saturates_and_flags_bound() {
        let mut c = Counter::new(0, 10, 5, BoundsMode::Clamp);
        let events = c.apply(15);
        assert_eq!(c.current, 10);
        assert!(events.at_max);
        assert!(!events.at_min);
    }

    #[test]
    fn test_ignore_stores_out_of_range() {
        let mut c = Counter::new(0, 10, 5, BoundsMode::Ignore);
        let events = c.apply(-3);
        assert_eq!(c.current, -3);
        assert!(events.at_min);
    }

    #[test]
    fn test_inclusive_bounds_flag_events() {
        let mut c = Counter::new(0, 10, 5, BoundsMode::Clamp);
        assert!(c.apply(10).at_max);
        assert!(c.apply(0).at_min);
        let mid = c.apply(5);
        assert!(!mid.at_min && !mid.at_max);
    }
}
