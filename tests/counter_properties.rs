//! Property tests for counter bounding policies

use proptest::prelude::*;

use gridspire::entity::behaviors::{Behavior, BoundsMode, Counter};
use gridspire::entity::Entity;

/// Drive a value through a counter entity and read back the stored state
fn stored_after(min: i64, max: i64, mode: BoundsMode, value: i64) -> i64 {
    // The bounding policy itself has no room dependency; exercise it
    // through the entity record the way the dispatcher holds it.
    let mut entity = Entity::new("probe", Behavior::Counter(Counter::new(min, max, min, mode)));
    match &mut entity.behavior {
        Behavior::Counter(c) => {
            c.apply(value);
            c.current
        }
        _ => unreachable!(),
    }
}

proptest! {
    #[test]
    fn prop_clamp_always_lands_in_range(
        (min, max) in (-1000i64..1000).prop_flat_map(|a| (Just(a), a..1001)),
        value in -10_000i64..10_000,
    ) {
        let stored = stored_after(min, max, BoundsMode::Clamp, value);
        prop_assert!(stored >= min && stored <= max);
        // In-range values pass through untouched
        if value >= min && value <= max {
            prop_assert_eq!(stored, value);
        }
    }

    #[test]
    fn prop_wrap_always_lands_in_range(
        (min, max) in (-1000i64..1000).prop_flat_map(|a| (Just(a), a..1001)),
        value in -10_000i64..10_000,
    ) {
        let stored = stored_after(min, max, BoundsMode::Wrap, value);
        prop_assert!(stored >= min && stored <= max);
        // Wrapping preserves the offset modulo the inclusive span
        let span = max - min + 1;
        prop_assert_eq!((stored - min).rem_euclid(span), (value - min).rem_euclid(span));
    }

    #[test]
    fn prop_ignore_stores_verbatim(
        (min, max) in (-1000i64..1000).prop_flat_map(|a| (Just(a), a..1001)),
        value in -10_000i64..10_000,
    ) {
        prop_assert_eq!(stored_after(min, max, BoundsMode::Ignore, value), value);
    }

    #[test]
    fn prop_wrap_and_clamp_agree_inside_range(
        (min, max) in (-1000i64..1000).prop_flat_map(|a| (Just(a), a..1001)),
    ) {
        // Any in-range value is a fixed point for every policy
        let mid = min + (max - min) / 2;
        prop_assert_eq!(stored_after(min, max, BoundsMode::Clamp, mid), mid);
        prop_assert_eq!(stored_after(min, max, BoundsMode::Wrap, mid), mid);
        prop_assert_eq!(stored_after(min, max, BoundsMode::Ignore, mid), mid);
    }
}
