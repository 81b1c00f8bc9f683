//! Room: tile grid plus the owned, uniquely-named entity collection
//!
//! The room drives the two per-frame passes and brokers all event
//! dispatch through its name index. Invoking an entity detaches it from
//! its slot for the duration of the call, so re-entrant dispatch can
//! never alias; structural mutation requested during a tick is deferred
//! to the end of the frame so the in-flight enumeration stays valid.

use ahash::AHashMap;
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::actions::links::LinkTable;
use crate::actions::value::ParamMap;
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::report::ReportSink;
use crate::core::types::{RoomId, Tick};
use crate::entity::behaviors::InputSnapshot;
use crate::entity::Entity;
use crate::world::tile::TileMap;

/// Mutable room access handed to an entity while it is detached from
/// its slot
pub struct RoomCtx<'a> {
    pub room: &'a mut Room,
    /// Seconds covered by the current frame; zero outside the tick
    pub dt: f32,
    /// Current dispatch nesting level
    pub(crate) depth: u32,
}

enum PendingOp {
    Add(Box<Entity>),
    Remove(String),
}

#[derive(Clone, Copy)]
enum Pass {
    Tick,
    After,
}

pub struct Room {
    id: RoomId,
    pub tiles: TileMap,
    pub background: [f32; 3],
    /// Entities in insertion order. `None` marks a slot whose entity is
    /// temporarily detached for a call, or a tombstone left by removal
    /// so live indices never shift.
    slots: Vec<Option<Box<Entity>>>,
    name_index: AHashMap<String, usize>,
    currently_ticking: bool,
    loaded: bool,
    frame: Tick,
    sim_time: f64,
    pending: Vec<PendingOp>,
    rng: ChaCha8Rng,
    sink: ReportSink,
    input: InputSnapshot,
    input_prev: InputSnapshot,
    config: EngineConfig,
}

impl Room {
    pub fn new(tiles: TileMap, config: EngineConfig) -> Self {
        Self {
            id: RoomId::next(),
            tiles,
            background: [0.0, 0.0, 0.0],
            slots: Vec::new(),
            name_index: AHashMap::new(),
            currently_ticking: false,
            loaded: false,
            frame: 0,
            sim_time: 0.0,
            pending: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            sink: ReportSink::new(config.report_capacity),
            input: InputSnapshot::new(),
            input_prev: InputSnapshot::new(),
            config,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn frame(&self) -> Tick {
        self.frame
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// True only for the duration of the per-frame passes
    pub fn is_ticking(&self) -> bool {
        self.currently_ticking
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn sink(&self) -> &ReportSink {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut ReportSink {
        &mut self.sink
    }

    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    // --- entity collection ------------------------------------------------

    /// Add an entity under its unique name.
    ///
    /// During a tick the add is deferred and becomes visible next frame.
    /// Once the room is loaded, enabled entities run `Init` on insertion.
    pub fn add_entity(&mut self, entity: Entity) -> Result<()> {
        self.validate_new(&entity)?;
        if self.currently_ticking {
            self.pending.push(PendingOp::Add(Box::new(entity)));
        } else {
            self.insert_now(Box::new(entity));
        }
        Ok(())
    }

    /// Remove an entity by name, running `Destroy` if it was enabled.
    ///
    /// During a tick the removal is deferred to the end of the frame.
    pub fn remove_entity(&mut self, name: &str) -> Result<()> {
        if !self.name_index.contains_key(name) {
            return Err(EngineError::EntityNotFound(name.to_owned()));
        }
        if self.currently_ticking {
            let already = self
                .pending
                .iter()
                .any(|op| matches!(op, PendingOp::Remove(n) if n == name));
            if !already {
                self.pending.push(PendingOp::Remove(name.to_owned()));
            }
            return Ok(());
        }
        self.remove_now(name)
    }

    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        let idx = *self.name_index.get(name)?;
        self.entity_at(idx)
    }

    /// Live entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().filter_map(|slot| slot.as_deref())
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate_new(&self, entity: &Entity) -> Result<()> {
        if entity.name().is_empty() {
            return Err(EngineError::InvalidConfig(
                "entity name must not be empty".to_owned(),
            ));
        }
        if self.name_index.contains_key(entity.name()) || self.pending_has(entity.name()) {
            return Err(EngineError::DuplicateEntity(entity.name().to_owned()));
        }
        let size = entity.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(EngineError::InvalidGeometry(format!(
                "entity '{}' has non-positive size ({}, {})",
                entity.name(),
                size.x,
                size.y
            )));
        }
        Ok(())
    }

    fn insert_now(&mut self, mut entity: Box<Entity>) {
        entity.set_room(Some(self.id));
        let idx = self.slots.len();
        self.name_index.insert(entity.name().to_owned(), idx);
        self.slots.push(Some(entity));
        if self.loaded {
            self.init_entity(idx);
        }
    }

    fn init_entity(&mut self, idx: usize) {
        let Some(mut entity) = self.take_slot(idx) else {
            return;
        };
        if entity.is_enabled() {
            let result = {
                let mut ctx = RoomCtx {
                    room: self,
                    dt: 0.0,
                    depth: 0,
                };
                entity.run_init(&mut ctx)
            };
            if let Err(err) = result {
                let pos = entity.position();
                self.sink.error(
                    Some(entity.name()),
                    format!("init fault at ({}, {}): {err}", pos.x, pos.y),
                );
            }
        }
        self.restore_slot(idx, entity);
    }

    fn remove_now(&mut self, name: &str) -> Result<()> {
        let idx = self
            .name_index
            .remove(name)
            .ok_or_else(|| EngineError::EntityNotFound(name.to_owned()))?;
        let Some(mut entity) = self.slots.get_mut(idx).and_then(Option::take) else {
            return Ok(());
        };
        if self.loaded && entity.is_enabled() {
            let result = {
                let mut ctx = RoomCtx {
                    room: self,
                    dt: 0.0,
                    depth: 0,
                };
                entity.run_destroy(&mut ctx)
            };
            if let Err(err) = result {
                let pos = entity.position();
                self.sink.error(
                    Some(entity.name()),
                    format!("destroy fault at ({}, {}): {err}", pos.x, pos.y),
                );
            }
        }
        entity.set_room(None);
        Ok(())
    }

    // --- lifecycle --------------------------------------------------------

    /// Mark the room loaded and run `Init` for every enabled entity.
    ///
    /// Events fired from init are rejected with a warning since the room
    /// is not in its tick phase.
    pub fn finish_load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        for idx in 0..self.slots.len() {
            self.init_entity(idx);
        }
    }

    /// Run `Destroy` for every enabled entity and drop the collection
    pub fn unload(&mut self) {
        for idx in 0..self.slots.len() {
            let Some(mut entity) = self.slots.get_mut(idx).and_then(Option::take) else {
                continue;
            };
            if self.loaded && entity.is_enabled() {
                let result = {
                    let mut ctx = RoomCtx {
                        room: self,
                        dt: 0.0,
                        depth: 0,
                    };
                    entity.run_destroy(&mut ctx)
                };
                if let Err(err) = result {
                    let pos = entity.position();
                    self.sink.error(
                        Some(entity.name()),
                        format!("destroy fault at ({}, {}): {err}", pos.x, pos.y),
                    );
                }
            }
            entity.set_room(None);
        }
        self.name_index.clear();
        self.loaded = false;
    }

    /// Advance one simulation step: tick pass, then after-tick pass over
    /// the same enumeration, then deferred structural mutation.
    pub fn tick(&mut self, dt: f32) {
        if !self.loaded {
            self.finish_load();
        }
        self.frame += 1;
        self.sim_time += f64::from(dt);
        self.sink.set_frame(self.frame);
        self.currently_ticking = true;
        let count = self.slots.len();
        for idx in 0..count {
            self.run_entity_pass(idx, dt, Pass::Tick);
        }
        for idx in 0..count {
            self.run_entity_pass(idx, dt, Pass::After);
        }
        self.currently_ticking = false;
        self.apply_pending();
        self.input_prev = self.input.clone();
    }

    fn run_entity_pass(&mut self, idx: usize, dt: f32, pass: Pass) {
        let Some(mut entity) = self.take_slot(idx) else {
            return;
        };
        if entity.is_enabled() {
            let result = {
                let mut ctx = RoomCtx {
                    room: self,
                    dt,
                    depth: 0,
                };
                match pass {
                    Pass::Tick => entity.tick(&mut ctx),
                    Pass::After => entity.after_tick(&mut ctx),
                }
            };
            if let Err(err) = result {
                let pos = entity.position();
                let label = match pass {
                    Pass::Tick => "tick",
                    Pass::After => "after-tick",
                };
                self.sink.error(
                    Some(entity.name()),
                    format!("{label} fault at ({}, {}): {err}", pos.x, pos.y),
                );
            }
        }
        self.restore_slot(idx, entity);
    }

    fn apply_pending(&mut self) {
        let ops = std::mem::take(&mut self.pending);
        for op in ops {
            match op {
                PendingOp::Add(entity) => {
                    if let Err(err) = self.validate_new(&entity) {
                        self.sink.error(
                            Some(entity.name()),
                            format!("deferred add rejected: {err}"),
                        );
                        continue;
                    }
                    self.insert_now(entity);
                }
                PendingOp::Remove(name) => {
                    if let Err(err) = self.remove_now(&name) {
                        self.sink
                            .error(Some(&name), format!("deferred remove failed: {err}"));
                    }
                }
            }
        }
    }

    // --- input ------------------------------------------------------------

    /// Hand the room this frame's input; the previous frame's snapshot
    /// is latched when the tick completes
    pub fn set_input(&mut self, input: InputSnapshot) {
        self.input = input;
    }

    pub fn key_down(&self, key: &str) -> bool {
        self.input.is_down(key)
    }

    pub fn key_pressed(&self, key: &str) -> bool {
        self.input.is_down(key) && !self.input_prev.is_down(key)
    }

    pub fn key_released(&self, key: &str) -> bool {
        !self.input.is_down(key) && self.input_prev.is_down(key)
    }

    // --- editor-facing mutation -------------------------------------------
    //
    // Names are re-resolved on every call; nothing caches entity
    // references across edits.

    pub fn move_entity(
        &mut self,
        name: &str,
        target: Vec2,
        relative: bool,
        force: bool,
    ) -> Result<bool> {
        self.with_entity(name, |entity, ctx| entity.try_move(ctx, target, relative, force))
    }

    pub fn resize_entity(&mut self, name: &str, target: Vec2, relative: bool) -> Result<bool> {
        self.with_entity(name, |entity, ctx| entity.try_resize(ctx, target, relative))
    }

    pub fn set_entity_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        self.with_entity(name, |entity, ctx| entity.set_enabled(ctx, enabled))
    }

    /// Fire an event on an entity from the host; subject to the same
    /// tick-phase gating as any other firing
    pub fn fire_entity_event(&mut self, name: &str, event: &str) -> Result<()> {
        self.with_entity(name, |entity, ctx| entity.fire_event(ctx, event))
    }

    /// Run an action method outside the link system (host or editor)
    pub fn invoke_action(
        &mut self,
        name: &str,
        action: &str,
        sender: &str,
        params: &ParamMap,
    ) -> Result<()> {
        self.with_entity(name, |entity, ctx| {
            entity.run_action_method(ctx, action, sender, params)
        })
    }

    pub fn rename_entity(&mut self, from: &str, to: &str) -> Result<()> {
        if to.is_empty() {
            return Err(EngineError::InvalidConfig(
                "entity name must not be empty".to_owned(),
            ));
        }
        if self.name_index.contains_key(to) {
            return Err(EngineError::DuplicateEntity(to.to_owned()));
        }
        let idx = self
            .name_index
            .remove(from)
            .ok_or_else(|| EngineError::EntityNotFound(from.to_owned()))?;
        if let Some(entity) = self.slots.get_mut(idx).and_then(Option::as_mut) {
            entity.set_name(to);
        }
        self.name_index.insert(to.to_owned(), idx);
        Ok(())
    }

    pub fn set_entity_links(&mut self, name: &str, links: LinkTable) -> Result<()> {
        let idx = self
            .name_index
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::EntityNotFound(name.to_owned()))?;
        match self.slots.get_mut(idx).and_then(Option::as_mut) {
            Some(entity) => {
                entity.links = links;
                Ok(())
            }
            None => Err(EngineError::EntityNotFound(name.to_owned())),
        }
    }

    fn with_entity<R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Entity, &mut RoomCtx) -> R,
    ) -> Result<R> {
        let idx = self
            .name_index
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::EntityNotFound(name.to_owned()))?;
        let Some(mut entity) = self.take_slot(idx) else {
            return Err(EngineError::EntityNotFound(name.to_owned()));
        };
        let result = {
            let mut ctx = RoomCtx {
                room: self,
                dt: 0.0,
                depth: 0,
            };
            f(&mut entity, &mut ctx)
        };
        self.restore_slot(idx, entity);
        Ok(result)
    }

    // --- slot plumbing for the dispatcher ---------------------------------

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    pub(crate) fn take_slot(&mut self, idx: usize) -> Option<Box<Entity>> {
        self.slots.get_mut(idx).and_then(Option::take)
    }

    pub(crate) fn restore_slot(&mut self, idx: usize, entity: Box<Entity>) {
        if let Some(slot) = self.slots.get_mut(idx) {
            *slot = Some(entity);
        }
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn entity_at(&self, idx: usize) -> Option<&Entity> {
        self.slots.get(idx).and_then(Option::as_deref)
    }

    pub(crate) fn pending_has(&self, name: &str) -> bool {
        self.pending
            .iter()
            .any(|op| matches!(op, PendingOp::Add(e) if e.name() == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::behaviors::Behavior;

    fn test_room() -> Room {
        Room::new(TileMap::new(10, 10, 16.0), EngineConfig::default())
    }

    fn static_entity(name: &str, x: f32, y: f32) -> Entity {
        Entity::new(name, Behavior::Static)
            .with_position(Vec2::new(x, y))
            .with_size(Vec2::new(4.0, 4.0))
    }

    #[test]
    fn test_add_and_lookup() {
        let mut room = test_room();
        room.add_entity(static_entity("door", 20.0, 20.0)).unwrap();
        assert_eq!(room.len(), 1);
        assert_eq!(room.get_entity("door").unwrap().name(), "door");
        assert!(room.get_entity("Door").is_none(), "lookup is case-sensitive");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut room = test_room();
        room.add_entity(static_entity("door", 20.0, 20.0)).unwrap();
        let err = room.add_entity(static_entity("door", 40.0, 40.0));
        assert!(matches!(err, Err(EngineError::DuplicateEntity(_))));
        assert_eq!(room.len(), 1);
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let mut room = test_room();
        let bad = Entity::new("flat", Behavior::Static).with_size(Vec2::new(4.0, 0.0));
        assert!(matches!(
            room.add_entity(bad),
            Err(EngineError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_remove_and_reuse_name() {
        let mut room = test_room();
        room.add_entity(static_entity("door", 20.0, 20.0)).unwrap();
        room.remove_entity("door").unwrap();
        assert!(room.get_entity("door").is_none());
        assert!(room.add_entity(static_entity("door", 30.0, 30.0)).is_ok());
    }

    #[test]
    fn test_entities_keep_insertion_order_across_removal() {
        let mut room = test_room();
        for name in ["a", "b", "c"] {
            room.add_entity(static_entity(name, 20.0, 20.0)).unwrap();
        }
        room.remove_entity("b").unwrap();
        let order: Vec<&str> = room.entities().map(Entity::name).collect();
        assert_eq!(order, vec!["a", "c"]);
    }

    #[test]
    fn test_editor_move_rejects_out_of_bounds() {
        let mut room = test_room();
        room.add_entity(static_entity("door", 20.0, 20.0)).unwrap();
        room.finish_load();
        let moved = room
            .move_entity("door", Vec2::new(-5.0, 20.0), false, false)
            .unwrap();
        assert!(!moved);
        assert_eq!(room.get_entity("door").unwrap().position(), Vec2::new(20.0, 20.0));
        // Rejection is surfaced through the report channel
        assert!(room.sink().count_at(crate::core::report::ReportLevel::Warn) >= 1);
    }

    #[test]
    fn test_force_move_bypasses_bounds() {
        let mut room = test_room();
        room.add_entity(static_entity("door", 20.0, 20.0)).unwrap();
        room.finish_load();
        let moved = room
            .move_entity("door", Vec2::new(-5.0, 20.0), false, true)
            .unwrap();
        assert!(moved);
        assert_eq!(
            room.get_entity("door").unwrap().position(),
            Vec2::new(-5.0, 20.0)
        );
    }

    #[test]
    fn test_rename_updates_index() {
        let mut room = test_room();
        room.add_entity(static_entity("door", 20.0, 20.0)).unwrap();
        room.rename_entity("door", "gate").unwrap();
        assert!(room.get_entity("door").is_none());
        assert_eq!(room.get_entity("gate").unwrap().name(), "gate");
    }

    #[test]
    fn test_key_edges() {
        let mut room = test_room();
        room.finish_load();
        room.set_input(InputSnapshot::from_keys(["Jump"]));
        assert!(room.key_pressed("Jump"));
        room.tick(1.0 / 60.0);
        // Still held: down but no longer an edge
        assert!(room.key_down("Jump"));
        assert!(!room.key_pressed("Jump"));
        room.set_input(InputSnapshot::new());
        assert!(room.key_released("Jump"));
    }
}
