use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::collision::aabb_collision;

pub const TILE_SIZE: f32 = 64.0;

// Tile type codes. Only OUT_OF_BOUNDS blocks movement; every other code
// (shore, sand, grass and friends) is a visual subtype of walkable ground.
pub const TILE_EMPTY: i32 = -1;
pub const TILE_OUT_OF_BOUNDS: i32 = 0;

pub const BACKGROUND_ID: &str = "background-";

#[derive(Debug)]
pub enum MapError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Format(String),
    NotFound(String),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Format(err) => write!(f, "format error: {err}"),
            Self::NotFound(id) => write!(f, "tile map not found: {id}"),
        }
    }
}

impl std::error::Error for MapError {}

impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileData {
    #[serde(default = "default_tile_index")]
    pub index: i32,
    #[serde(rename = "type", default = "default_tile_type")]
    pub kind: i32,
}

fn default_tile_index() -> i32 {
    -1
}

fn default_tile_type() -> i32 {
    TILE_EMPTY
}

impl TileData {
    pub const fn empty() -> Self {
        Self {
            index: -1,
            kind: TILE_EMPTY,
        }
    }

    pub const fn new(index: i32, kind: i32) -> Self {
        Self { index, kind }
    }

    pub fn is_solid(&self) -> bool {
        self.kind == TILE_OUT_OF_BOUNDS
    }
}

// A tile resolved against the current camera window.
pub struct Tile {
    pub index: i32,
    pub kind: i32,
    pub solid: bool,
    pub src: Rect,
    pub world: Rect,
    pub screen: Rect,
}

pub struct TileMap {
    pub id: String,
    cols: usize,
    rows: usize,
    tiles: Vec<TileData>,
    solid: Vec<bool>,
}

impl TileMap {
    // Short serialized layers are padded with empty tiles to the full grid.
    pub fn new(id: impl Into<String>, cols: usize, rows: usize, mut data: Vec<TileData>) -> Self {
        let len = cols * rows;
        data.truncate(len);
        data.resize(len, TileData::empty());
        let solid = data.iter().map(TileData::is_solid).collect();
        Self {
            id: id.into(),
            cols,
            rows,
            tiles: data,
            solid,
        }
    }

    pub fn empty(id: impl Into<String>, cols: usize, rows: usize) -> Self {
        Self::new(id, cols, rows, Vec::new())
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tiles(&self) -> &[TileData] {
        &self.tiles
    }

    fn idx(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    pub fn set_tile(&mut self, col: usize, row: usize, tile: TileData) {
        if col >= self.cols || row >= self.rows {
            return;
        }
        let i = self.idx(col, row);
        self.tiles[i] = tile;
        self.solid[i] = tile.is_solid();
    }

    pub fn tile_data(&self, col: i32, row: i32) -> Option<TileData> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.tiles[self.idx(col, row)])
    }

    // Out of range is not solid; the world edge must never be an invisible wall.
    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        if col < 0 || row < 0 {
            return false;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return false;
        }
        self.solid[self.idx(col, row)]
    }

    pub fn tile_bounds(&self, col: i32, row: i32) -> Rect {
        Rect::new(
            col as f32 * TILE_SIZE,
            row as f32 * TILE_SIZE,
            TILE_SIZE,
            TILE_SIZE,
        )
    }

    pub fn tile_at(&self, col: i32, row: i32, camera: &Camera) -> Option<Tile> {
        let data = self.tile_data(col, row)?;

        let start_col = (camera.x / TILE_SIZE).floor();
        let start_row = (camera.y / TILE_SIZE).floor();
        let offset_x = -camera.x + start_col * TILE_SIZE;
        let offset_y = -camera.y + start_row * TILE_SIZE;

        Some(Tile {
            index: data.index,
            kind: data.kind,
            solid: data.is_solid(),
            src: Rect::new(data.index as f32 * TILE_SIZE, 0.0, TILE_SIZE, TILE_SIZE),
            world: self.tile_bounds(col, row),
            screen: Rect::new(
                (col as f32 - start_col) * TILE_SIZE + offset_x,
                (row as f32 - start_row) * TILE_SIZE + offset_y,
                TILE_SIZE,
                TILE_SIZE,
            ),
        })
    }

    // Inclusive start, exclusive end, clamped to the grid.
    pub fn visible_range(&self, camera: &Camera) -> (i32, i32, i32, i32) {
        let start_col = (camera.x / TILE_SIZE).floor() as i32;
        let end_col = ((camera.x + camera.width) / TILE_SIZE).ceil() as i32 + 1;
        let start_row = (camera.y / TILE_SIZE).floor() as i32;
        let end_row = ((camera.y + camera.height) / TILE_SIZE).ceil() as i32 + 1;
        (
            start_col.max(0),
            end_col.min(self.cols as i32),
            start_row.max(0),
            end_row.min(self.rows as i32),
        )
    }

    // Any blocking tile under the rectangle's footprint vetoes the move.
    pub fn collides(&self, rect: &Rect) -> bool {
        let start_col = (rect.x / TILE_SIZE).floor() as i32;
        let end_col = ((rect.x + rect.w) / TILE_SIZE).ceil() as i32;
        let start_row = (rect.y / TILE_SIZE).floor() as i32;
        let end_row = ((rect.y + rect.h) / TILE_SIZE).ceil() as i32;

        for col in start_col..end_col {
            for row in start_row..end_row {
                if !self.is_solid(col, row) {
                    continue;
                }
                if aabb_collision(rect, &self.tile_bounds(col, row)) {
                    return true;
                }
            }
        }
        false
    }
}

pub struct TileMaps {
    maps: Vec<TileMap>,
}

impl TileMaps {
    pub fn new() -> Self {
        Self { maps: Vec::new() }
    }

    // Every serialized layer becomes one background tile map, front to back.
    pub fn from_layer_data(
        cols: usize,
        rows: usize,
        layers: Vec<Vec<TileData>>,
    ) -> Result<Self, MapError> {
        if cols == 0 || rows == 0 {
            return Err(MapError::Format(format!(
                "world grid must be non-empty, got {cols}x{rows}"
            )));
        }
        let mut maps = Self::new();
        for (i, layer) in layers.into_iter().enumerate() {
            maps.set(TileMap::new(format!("{BACKGROUND_ID}{i}"), cols, rows, layer));
        }
        Ok(maps)
    }

    pub fn set(&mut self, map: TileMap) {
        if let Some(slot) = self.maps.iter_mut().find(|m| m.id == map.id) {
            *slot = map;
        } else {
            self.maps.push(map);
        }
    }

    pub fn get(&self, id: &str) -> Result<&TileMap, MapError> {
        self.maps
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| MapError::NotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut TileMap, MapError> {
        self.maps
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| MapError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.maps.iter().any(|m| m.id == id)
    }

    pub fn array(&self) -> &[TileMap] {
        &self.maps
    }

    pub fn cols(&self) -> usize {
        self.maps.first().map(|m| m.cols).unwrap_or(0)
    }

    pub fn rows(&self) -> usize {
        self.maps.first().map(|m| m.rows).unwrap_or(0)
    }

    pub fn world_width(&self) -> f32 {
        self.cols() as f32 * TILE_SIZE
    }

    pub fn world_height(&self) -> f32 {
        self.rows() as f32 * TILE_SIZE
    }

    pub fn collides(&self, rect: &Rect) -> bool {
        self.maps.iter().any(|map| map.collides(rect))
    }

    pub fn to_layer_data(&self) -> Vec<Vec<TileData>> {
        self.maps.iter().map(|m| m.tiles.clone()).collect()
    }
}
