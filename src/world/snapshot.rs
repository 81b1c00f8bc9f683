//! Room snapshot loading and saving
//!
//! The snapshot is a structured JSON document holding the tile grid,
//! background color, and the ordered entity list, each entity tagged
//! with its behavior kind and declared fields. Geometry is serialized
//! as plain `[f32; 2]` arrays and converted to `glam` at load.
//! Validation rejects duplicate names, non-positive sizes, and
//! out-of-bounds entities before the room goes live.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::actions::links::LinkTable;
use crate::actions::value::ParamValue;
use crate::core::config::EngineConfig;
use crate::core::error::EngineError;
use crate::core::types::CollisionMode;
use crate::entity::behaviors::{
    Behavior, BoundsMode, Broadcast, Counter, GateOp, InputListener, LogicGate, ParamHolder,
    Player, Spawner, Timer, TimerClock, Trigger, TriggerCondition, TriggerGroup,
};
use crate::entity::Entity;
use crate::world::room::Room;
use crate::world::tile::{Tile, TileMap};

/// Errors that can occur when loading a room snapshot
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid room dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),

    #[error("tile ({x}, {y}) lies outside the {width}x{height} grid")]
    TileOutOfRange { x: u32, y: u32, width: u32, height: u32 },

    #[error("duplicate entity name: {0}")]
    DuplicateName(String),

    #[error("entity '{name}': {reason}")]
    InvalidEntity { name: String, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default)]
    pub background: [f32; 3],
    #[serde(default)]
    pub tiles: Vec<TileSnapshot>,
    #[serde(default)]
    pub entities: Vec<EntitySnapshot>,
}

/// Sparse tile entry; unlisted cells stay empty and passable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub x: u32,
    pub y: u32,
    #[serde(default)]
    pub texture: String,
    #[serde(default)]
    pub is_collision: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub name: String,
    pub position: [f32; 2],
    #[serde(default = "default_size")]
    pub size: [f32; 2],
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub texture: String,
    #[serde(default)]
    pub links: LinkTable,
    #[serde(flatten)]
    pub behavior: BehaviorSnapshot,
}

/// Declared behavior-variant fields, tagged by kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BehaviorSnapshot {
    Static,
    Timer {
        interval: f64,
        #[serde(default)]
        clock: TimerClock,
        #[serde(default)]
        repeat: bool,
    },
    Counter {
        min: i64,
        max: i64,
        /// Defaults to `min` when omitted
        #[serde(default)]
        value: Option<i64>,
        #[serde(default)]
        mode: BoundsMode,
    },
    LogicGate {
        op: GateOp,
    },
    Trigger {
        target: String,
        #[serde(default)]
        mode: CollisionMode,
        #[serde(default)]
        condition: TriggerCondition,
    },
    TriggerGroup {
        members: Vec<String>,
    },
    Spawner {
        template: String,
        spawn_points: Vec<String>,
        /// Defaults to `<template>_` when omitted
        #[serde(default)]
        base_name: Option<String>,
    },
    Broadcast {
        pattern: String,
        action: String,
        #[serde(default)]
        param_sources: Vec<String>,
    },
    ParamHolder {
        key: String,
        value: ParamValue,
    },
    InputListener {
        key: String,
    },
    Player {
        #[serde(default = "default_move_speed")]
        move_speed: f32,
    },
}

fn default_tile_size() -> f32 {
    16.0
}

fn default_size() -> [f32; 2] {
    [1.0, 1.0]
}

fn default_true() -> bool {
    true
}

fn default_move_speed() -> f32 {
    60.0
}

impl BehaviorSnapshot {
    fn into_behavior(self, name: &str) -> Result<Behavior, LoadError> {
        let invalid = |reason: String| LoadError::InvalidEntity {
            name: name.to_owned(),
            reason,
        };
        Ok(match self {
            BehaviorSnapshot::Static => Behavior::Static,
            BehaviorSnapshot::Timer {
                interval,
                clock,
                repeat,
            } => {
                if interval <= 0.0 {
                    return Err(invalid(format!(
                        "timer interval must be positive, got {interval}"
                    )));
                }
                Behavior::Timer(Timer::new(interval, clock, repeat))
            }
            BehaviorSnapshot::Counter {
                min,
                max,
                value,
                mode,
            } => {
                if min > max {
                    return Err(invalid(format!(
                        "counter bounds are inverted: min {min} > max {max}"
                    )));
                }
                Behavior::Counter(Counter::new(min, max, value.unwrap_or(min), mode))
            }
            BehaviorSnapshot::LogicGate { op } => Behavior::LogicGate(LogicGate::new(op)),
            BehaviorSnapshot::Trigger {
                target,
                mode,
                condition,
            } => Behavior::Trigger(Trigger::new(target, mode, condition)),
            BehaviorSnapshot::TriggerGroup { members } => {
                Behavior::TriggerGroup(TriggerGroup::new(members))
            }
            BehaviorSnapshot::Spawner {
                template,
                spawn_points,
                base_name,
            } => {
                let base = base_name.unwrap_or_else(|| format!("{template}_"));
                Behavior::Spawner(Spawner::new(template, spawn_points, base))
            }
            BehaviorSnapshot::Broadcast {
                pattern,
                action,
                param_sources,
            } => Behavior::Broadcast(Broadcast::new(pattern, action, param_sources)),
            BehaviorSnapshot::ParamHolder { key, value } => {
                Behavior::ParamHolder(ParamHolder::new(key, value))
            }
            BehaviorSnapshot::InputListener { key } => {
                Behavior::InputListener(InputListener::new(key))
            }
            BehaviorSnapshot::Player { move_speed } => Behavior::Player(Player {
                move_speed,
                ..Player::default()
            }),
        })
    }

    fn from_behavior(behavior: &Behavior) -> Self {
        match behavior {
            Behavior::Static => BehaviorSnapshot::Static,
            Behavior::Timer(t) => BehaviorSnapshot::Timer {
                interval: t.interval,
                clock: t.clock,
                repeat: t.repeat,
            },
            Behavior::Counter(c) => BehaviorSnapshot::Counter {
                min: c.min,
                max: c.max,
                value: Some(c.current),
                mode: c.mode,
            },
            Behavior::LogicGate(g) => BehaviorSnapshot::LogicGate { op: g.op },
            Behavior::Trigger(t) => BehaviorSnapshot::Trigger {
                target: t.target.clone(),
                mode: t.mode,
                condition: t.condition,
            },
            Behavior::TriggerGroup(g) => BehaviorSnapshot::TriggerGroup {
                members: g.members.clone(),
            },
            Behavior::Spawner(s) => BehaviorSnapshot::Spawner {
                template: s.template_name.clone(),
                spawn_points: s.spawn_points.clone(),
                base_name: Some(s.base_name.clone()),
            },
            Behavior::Broadcast(b) => BehaviorSnapshot::Broadcast {
                pattern: b.pattern.clone(),
                action: b.action.clone(),
                param_sources: b.param_sources.clone(),
            },
            Behavior::ParamHolder(p) => BehaviorSnapshot::ParamHolder {
                key: p.key.clone(),
                value: p.value.clone(),
            },
            Behavior::InputListener(l) => BehaviorSnapshot::InputListener {
                key: l.key.clone(),
            },
            Behavior::Player(p) => BehaviorSnapshot::Player {
                move_speed: p.move_speed,
            },
        }
    }
}

/// Load a room from JSON text
pub fn load_from_json(json: &str, config: EngineConfig) -> Result<Room, LoadError> {
    let snapshot: RoomSnapshot = serde_json::from_str(json)?;
    build_room(snapshot, config)
}

/// Load a room from a JSON file on disk
pub fn load_from_file(path: &Path, config: EngineConfig) -> Result<Room, LoadError> {
    let content = std::fs::read_to_string(path)?;
    load_from_json(&content, config)
}

/// Build and validate a room from a parsed snapshot
pub fn build_room(snapshot: RoomSnapshot, config: EngineConfig) -> Result<Room, LoadError> {
    if snapshot.width == 0 || snapshot.height == 0 || snapshot.tile_size <= 0.0 {
        return Err(LoadError::InvalidDimensions(snapshot.width, snapshot.height));
    }
    let mut tiles = TileMap::new(snapshot.width, snapshot.height, snapshot.tile_size);
    for tile in snapshot.tiles {
        let placed = tiles.set(
            tile.x,
            tile.y,
            Tile {
                texture: tile.texture,
                is_collision: tile.is_collision,
            },
        );
        if !placed {
            return Err(LoadError::TileOutOfRange {
                x: tile.x,
                y: tile.y,
                width: snapshot.width,
                height: snapshot.height,
            });
        }
    }
    let mut room = Room::new(tiles, config);
    room.background = snapshot.background;

    let extents = room.tiles.pixel_extents();
    for spec in snapshot.entities {
        let [x, y] = spec.position;
        let [w, h] = spec.size;
        if w <= 0.0 || h <= 0.0 {
            return Err(LoadError::InvalidEntity {
                name: spec.name,
                reason: format!("non-positive size ({w}, {h})"),
            });
        }
        let (tl_x, tl_y) = (x - w / 2.0, y - h);
        let (br_x, br_y) = (x + w / 2.0, y);
        if tl_x < 0.0 || tl_y < 0.0 || br_x >= extents.x || br_y >= extents.y {
            return Err(LoadError::InvalidEntity {
                name: spec.name,
                reason: format!("bounding box ({tl_x}, {tl_y})..({br_x}, {br_y}) leaves the room"),
            });
        }
        let behavior = spec.behavior.into_behavior(&spec.name)?;
        let mut entity = Entity::new(spec.name.clone(), behavior)
            .with_position(glam::Vec2::new(x, y))
            .with_size(glam::Vec2::new(w, h))
            .with_enabled(spec.enabled)
            .with_texture(spec.texture);
        entity.links = spec.links;
        room.add_entity(entity).map_err(|err| match err {
            EngineError::DuplicateEntity(name) => LoadError::DuplicateName(name),
            other => LoadError::InvalidEntity {
                name: spec.name.clone(),
                reason: other.to_string(),
            },
        })?;
    }
    room.finish_load();
    Ok(room)
}

/// Produce a snapshot of the room's current serializable state
pub fn save_room(room: &Room) -> RoomSnapshot {
    let tiles = room
        .tiles
        .iter()
        .filter(|(_, _, tile)| !tile.texture.is_empty() || tile.is_collision)
        .map(|(x, y, tile)| TileSnapshot {
            x,
            y,
            texture: tile.texture.clone(),
            is_collision: tile.is_collision,
        })
        .collect();
    let entities = room
        .entities()
        .map(|entity| EntitySnapshot {
            name: entity.name().to_owned(),
            position: [entity.position().x, entity.position().y],
            size: [entity.size().x, entity.size().y],
            enabled: entity.is_enabled(),
            texture: entity.texture.clone(),
            links: entity.links.clone(),
            behavior: BehaviorSnapshot::from_behavior(&entity.behavior),
        })
        .collect();
    RoomSnapshot {
        width: room.tiles.width(),
        height: room.tiles.height(),
        tile_size: room.tiles.tile_size(),
        background: room.background,
        tiles,
        entities,
    }
}

/// Serialize the room to pretty JSON
pub fn save_to_json(room: &Room) -> Result<String, LoadError> {
    Ok(serde_json::to_string_pretty(&save_room(room))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(width: u32, height: u32) -> RoomSnapshot {
        RoomSnapshot {
            width,
            height,
            tile_size: 16.0,
            background: [0.1, 0.2, 0.3],
            tiles: Vec::new(),
            entities: Vec::new(),
        }
    }

    fn entity_spec(name: &str, behavior: BehaviorSnapshot) -> EntitySnapshot {
        EntitySnapshot {
            name: name.to_owned(),
            position: [40.0, 40.0],
            size: [4.0, 4.0],
            enabled: true,
            texture: String::new(),
            links: LinkTable::new(),
            behavior,
        }
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = build_room(minimal(0, 8), EngineConfig::default());
        assert!(matches!(err, Err(LoadError::InvalidDimensions(0, 8))));
    }

    #[test]
    fn test_tile_out_of_range_rejected() {
        let mut snapshot = minimal(4, 4);
        snapshot.tiles.push(TileSnapshot {
            x: 4,
            y: 0,
            texture: "wall".to_owned(),
            is_collision: true,
        });
        assert!(matches!(
            build_room(snapshot, EngineConfig::default()),
            Err(LoadError::TileOutOfRange { x: 4, y: 0, .. })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected_at_load() {
        let mut snapshot = minimal(8, 8);
        snapshot
            .entities
            .push(entity_spec("door", BehaviorSnapshot::Static));
        snapshot
            .entities
            .push(entity_spec("door", BehaviorSnapshot::Static));
        assert!(matches!(
            build_room(snapshot, EngineConfig::default()),
            Err(LoadError::DuplicateName(name)) if name == "door"
        ));
    }

    #[test]
    fn test_out_of_bounds_entity_rejected_at_load() {
        let mut snapshot = minimal(8, 8);
        let mut spec = entity_spec("door", BehaviorSnapshot::Static);
        spec.position = [1.0, 40.0]; // top-left x would be negative
        snapshot.entities.push(spec);
        assert!(matches!(
            build_room(snapshot, EngineConfig::default()),
            Err(LoadError::InvalidEntity { .. })
        ));
    }

    #[test]
    fn test_inverted_counter_bounds_rejected() {
        let mut snapshot = minimal(8, 8);
        snapshot.entities.push(entity_spec(
            "score",
            BehaviorSnapshot::Counter {
                min: 10,
                max: 0,
                value: None,
                mode: BoundsMode::Clamp,
            },
        ));
        assert!(matches!(
            build_room(snapshot, EngineConfig::default()),
            Err(LoadError::InvalidEntity { .. })
        ));
    }

    #[test]
    fn test_counter_value_defaults_to_min() {
        let mut snapshot = minimal(8, 8);
        snapshot.entities.push(entity_spec(
            "score",
            BehaviorSnapshot::Counter {
                min: 3,
                max: 9,
                value: None,
                mode: BoundsMode::Clamp,
            },
        ));
        let room = build_room(snapshot, EngineConfig::default()).unwrap();
        match &room.get_entity("score").unwrap().behavior {
            Behavior::Counter(c) => assert_eq!(c.current, 3),
            other => panic!("unexpected behavior {other:?}"),
        }
    }

    #[test]
    fn test_save_roundtrips_entities() {
        let mut snapshot = minimal(8, 8);
        snapshot.entities.push(entity_spec(
            "pulse",
            BehaviorSnapshot::Timer {
                interval: 30.0,
                clock: TimerClock::Frames,
                repeat: true,
            },
        ));
        let room = build_room(snapshot, EngineConfig::default()).unwrap();
        let saved = save_room(&room);
        assert_eq!(saved.entities.len(), 1);
        let json = serde_json::to_string(&saved).unwrap();
        let reloaded = load_from_json(&json, EngineConfig::default()).unwrap();
        let entity = reloaded.get_entity("pulse").unwrap();
        assert!(matches!(
            &entity.behavior,
            Behavior::Timer(t) if t.interval == 30.0 && t.repeat
        ));
    }
}
