use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision::point_in_rectangle;
use crate::entity::{GameObjects, ObjectError, ObjectKind, PLAYER_ID, Placement};
use crate::layers::LayerRegistry;
use crate::map::{BACKGROUND_ID, MapError, TILE_OUT_OF_BOUNDS, TILE_SIZE, TileData, TileMaps};

// Paintable tile brushes: the rock blocker plus the walkable ground subtypes.
const TILE_PALETTE: &[TileData] = &[
    TileData::new(0, TILE_OUT_OF_BOUNDS),
    TileData::new(1, 1),
    TileData::new(2, 2),
    TileData::new(3, 3),
    TileData::new(4, 4),
    TileData::empty(),
];

const OBJECT_PALETTE: &[ObjectKind] = &[
    ObjectKind::BlobMonster,
    ObjectKind::PalmTree,
    ObjectKind::Invisible,
];

#[derive(Serialize, Deserialize)]
pub struct WorldFile {
    pub cols: usize,
    pub rows: usize,
    pub tile_layers: Vec<Vec<TileData>>,
    pub objects: Vec<Placement>,
}

pub fn parse_world(json: &str) -> Result<WorldFile, MapError> {
    Ok(serde_json::from_str(json)?)
}

pub fn export_world(maps: &TileMaps, objects: &GameObjects) -> Result<String, MapError> {
    let file = WorldFile {
        cols: maps.cols(),
        rows: maps.rows(),
        tile_layers: maps.to_layer_data(),
        objects: objects.export(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

// The browser build has no filesystem; the export is logged instead of saved.
pub fn save_world(path: &str, json: &str) -> Result<(), MapError> {
    if cfg!(target_arch = "wasm32") {
        info!("world export:\n{json}");
        return Ok(());
    }
    std::fs::write(path, json)?;
    Ok(())
}

pub struct Editor {
    pub enabled: bool,
    pub active_layer: usize,
    tile_slot: usize,
    object_slot: usize,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            enabled: false,
            active_layer: 0,
            tile_slot: 0,
            object_slot: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn selected_tile(&self) -> TileData {
        TILE_PALETTE[self.tile_slot % TILE_PALETTE.len()]
    }

    pub fn selected_kind(&self) -> ObjectKind {
        OBJECT_PALETTE[self.object_slot % OBJECT_PALETTE.len()]
    }

    pub fn next_tile(&mut self) {
        self.tile_slot = (self.tile_slot + 1) % TILE_PALETTE.len();
    }

    pub fn next_object(&mut self) {
        self.object_slot = (self.object_slot + 1) % OBJECT_PALETTE.len();
    }

    pub fn next_layer(&mut self, maps: &TileMaps) {
        let count = maps.array().len().max(1);
        self.active_layer = (self.active_layer + 1) % count;
    }

    pub fn active_layer_id(&self) -> String {
        format!("{BACKGROUND_ID}{}", self.active_layer)
    }

    // Paints the selected brush onto the active layer at a world position.
    // Positions outside the grid are ignored.
    pub fn paint_tile(&self, maps: &mut TileMaps, world: Vec2) -> bool {
        if world.x < 0.0 || world.y < 0.0 {
            return false;
        }
        let col = (world.x / TILE_SIZE).floor() as usize;
        let row = (world.y / TILE_SIZE).floor() as usize;
        let tile = self.selected_tile();
        match maps.get_mut(&self.active_layer_id()) {
            Ok(map) => {
                if col >= map.cols() || row >= map.rows() {
                    return false;
                }
                map.set_tile(col, row, tile);
                true
            }
            Err(err) => {
                warn!("{err}");
                false
            }
        }
    }

    pub fn place_object(
        &self,
        objects: &mut GameObjects,
        layers: &mut LayerRegistry,
        world: Vec2,
    ) -> Result<String, ObjectError> {
        objects.spawn(self.selected_kind(), world, None, layers)
    }

    pub fn object_at(&self, objects: &GameObjects, world: Vec2) -> Option<String> {
        objects
            .iter()
            .find(|o| point_in_rectangle(world, &o.rect))
            .map(|o| o.id.clone())
    }

    // The player is not deletable; the session needs its singleton.
    pub fn remove_object_at(
        &self,
        objects: &mut GameObjects,
        layers: &mut LayerRegistry,
        world: Vec2,
    ) -> Option<String> {
        let id = self.object_at(objects, world)?;
        if id == PLAYER_ID {
            return None;
        }
        objects.remove(&id, layers);
        Some(id)
    }
}
