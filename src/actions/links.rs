//! Event-action link storage
//!
//! A link wires an event fired by one entity to an action method on
//! another, resolved by name through the room at dispatch time. Links are
//! declared in the room snapshot and fixed for the lifetime of the room;
//! per-event insertion order is the firing order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::actions::value::ParamMap;

/// One (target entity, target action, parameters) triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventActionLink {
    pub target: String,
    pub action: String,
    #[serde(default)]
    pub params: ParamMap,
}

/// All links of one entity, keyed by event name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkTable {
    links: BTreeMap<String, Vec<EventActionLink>>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links registered for an event, in firing order
    pub fn links_for(&self, event: &str) -> &[EventActionLink] {
        self.links.get(event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a link to an event, preserving insertion order
    pub fn add_link(&mut self, event: impl Into<String>, link: EventActionLink) {
        self.links.entry(event.into()).or_default().push(link);
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Event names with at least one link
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::value::ParamValue;

    fn link(target: &str, action: &str) -> EventActionLink {
        EventActionLink {
            target: target.to_owned(),
            action: action.to_owned(),
            params: ParamMap::new(),
        }
    }

    #[test]
    fn test_links_preserve_insertion_order() {
        let mut table = LinkTable::new();
        table.add_link("TimerElapsed", link("counter", "IncrementValue"));
        table.add_link("TimerElapsed", link("gate", "Input"));
        table.add_link("TimerElapsed", link("door", "Enable"));

        let order: Vec<&str> = table
            .links_for("TimerElapsed")
            .iter()
            .map(|l| l.target.as_str())
            .collect();
        assert_eq!(order, vec!["counter", "gate", "door"]);
    }

    #[test]
    fn test_unknown_event_is_empty() {
        let table = LinkTable::new();
        assert!(table.links_for("OnMove").is_empty());
    }

    #[test]
    fn test_table_roundtrip_with_typed_params() {
        let mut table = LinkTable::new();
        let mut params = ParamMap::new();
        params.insert("Offset".to_owned(), ParamValue::Vector([2.0, -1.0]));
        params.insert("Amount".to_owned(), ParamValue::Number(3.0));
        table.add_link(
            "OnTrigger",
            EventActionLink {
                target: "platform".to_owned(),
                action: "Move".to_owned(),
                params,
            },
        );

        let json = serde_json::to_string(&table).unwrap();
        let back: LinkTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
