//! Top-level session state: current room and current player
//!
//! Exactly one room and one player are active at a time; both change
//! only through explicit transition operations.

use crate::core::error::{EngineError, Result};
use crate::entity::behaviors::InputSnapshot;
use crate::world::room::Room;

#[derive(Default)]
pub struct World {
    room: Option<Room>,
    player: Option<String>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `room` current, destroying the previous room's entities.
    ///
    /// The incoming room is finish-loaded if it was not already; the
    /// player selection resets because names belong to the old room.
    pub fn load_room(&mut self, mut room: Room) {
        if let Some(mut old) = self.room.take() {
            old.unload();
        }
        room.finish_load();
        self.room = Some(room);
        self.player = None;
    }

    /// Unload and drop the current room, if any
    pub fn unload_room(&mut self) {
        if let Some(mut old) = self.room.take() {
            old.unload();
        }
        self.player = None;
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn current_room_mut(&mut self) -> Option<&mut Room> {
        self.room.as_mut()
    }

    /// Select the current player by entity name in the current room
    pub fn set_player(&mut self, name: &str) -> Result<()> {
        let room = self
            .room
            .as_ref()
            .ok_or_else(|| EngineError::EntityNotFound(name.to_owned()))?;
        if room.get_entity(name).is_none() {
            return Err(EngineError::EntityNotFound(name.to_owned()));
        }
        self.player = Some(name.to_owned());
        Ok(())
    }

    pub fn current_player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    /// Advance the current room one simulation step
    pub fn tick(&mut self, dt: f32, input: InputSnapshot) {
        if let Some(room) = self.room.as_mut() {
            room.set_input(input);
            room.tick(dt);
        }
    }
}
