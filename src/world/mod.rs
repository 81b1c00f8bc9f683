//! Rooms, tiles, snapshots, and the top-level world session

pub mod room;
pub mod snapshot;
pub mod tile;
pub mod world;

pub use room::{Room, RoomCtx};
pub use snapshot::{load_from_file, load_from_json, save_room, save_to_json, LoadError};
pub use tile::{Tile, TileMap};
pub use world::World;
