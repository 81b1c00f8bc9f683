//! Tile grid storage and collision queries

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One grid cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub texture: String,
    pub is_collision: bool,
}

/// Row-major grid of tiles with a fixed tile-to-unit scale
#[derive(Debug, Clone)]
pub struct TileMap {
    width: u32,
    height: u32,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl TileMap {
    pub fn new(width: u32, height: u32, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            tiles: vec![Tile::default(); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Room extents in world units
    pub fn pixel_extents(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get((y as usize) * (self.width as usize) + x as usize)
    }

    /// Replace a tile; returns false when out of range
    pub fn set(&mut self, x: u32, y: u32, tile: Tile) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.tiles[(y as usize) * (self.width as usize) + x as usize] = tile;
        true
    }

    /// Iterate all tiles row by row with their grid coordinates
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &Tile)> {
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            let x = (i as u32) % self.width;
            let y = (i as u32) / self.width;
            (x, y, tile)
        })
    }

    /// True when any collision tile overlaps the half-open box
    /// `[top_left, top_left + size)`
    pub fn box_collides(&self, top_left: Vec2, size: Vec2) -> bool {
        if size.x <= 0.0 || size.y <= 0.0 {
            return false;
        }
        let br = top_left + size;
        let start_x = (top_left.x / self.tile_size).floor().max(0.0) as u32;
        let start_y = (top_left.y / self.tile_size).floor().max(0.0) as u32;
        let end_x = ((br.x / self.tile_size).ceil() as i64).clamp(0, self.width as i64) as u32;
        let end_y = ((br.y / self.tile_size).ceil() as i64).clamp(0, self.height as i64) as u32;
        for cy in start_y..end_y {
            for cx in start_x..end_x {
                // Half-open: a box ending exactly on a cell boundary does
                // not reach into that cell
                let cell_start = Vec2::new(cx as f32 * self.tile_size, cy as f32 * self.tile_size);
                if br.x <= cell_start.x || br.y <= cell_start.y {
                    continue;
                }
                if let Some(tile) = self.get(cx, cy) {
                    if tile.is_collision {
                        return true;
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(texture: &str) -> Tile {
        Tile {
            texture: texture.to_owned(),
            is_collision: true,
        }
    }

    #[test]
    fn test_out_of_range_access() {
        let mut map = TileMap::new(4, 3, 16.0);
        assert!(map.get(4, 0).is_none());
        assert!(map.get(0, 3).is_none());
        assert!(!map.set(9, 9, Tile::default()));
        assert!(map.set(3, 2, solid("wall")));
        assert!(map.get(3, 2).unwrap().is_collision);
    }

    #[test]
    fn test_pixel_extents() {
        let map = TileMap::new(10, 5, 16.0);
        assert_eq!(map.pixel_extents(), Vec2::new(160.0, 80.0));
    }

    #[test]
    fn test_box_collides_hits_solid_cell() {
        let mut map = TileMap::new(4, 4, 10.0);
        map.set(2, 1, solid("wall"));
        // Overlapping the solid cell
        assert!(map.box_collides(Vec2::new(25.0, 15.0), Vec2::new(4.0, 4.0)));
        // Clear cell
        assert!(!map.box_collides(Vec2::new(5.0, 5.0), Vec2::new(4.0, 4.0)));
    }

    #[test]
    fn test_box_collides_is_half_open() {
        let mut map = TileMap::new(4, 4, 10.0);
        map.set(2, 0, solid("wall"));
        // Box ends exactly at x=20.0, the solid cell starts there
        assert!(!map.box_collides(Vec2::new(10.0, 0.0), Vec2::new(10.0, 5.0)));
        assert!(map.box_collides(Vec2::new(10.0, 0.0), Vec2::new(10.5, 5.0)));
    }
}
