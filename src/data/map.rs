//! Layered world map, read once from `assets/data/map.ron`.
//!
//! Tile layers place one tile-sized image per grid coordinate. Object layers
//! place named objects with a pixel position and size. The level reads the
//! map once at setup and never again.

use std::collections::BTreeMap;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::SetupError;
use crate::shared::*;

pub const HOUSE_FLOOR: &str = "HouseFloor";
pub const HOUSE_FURNITURE_BOTTOM: &str = "HouseFurnitureBottom";
pub const HOUSE_WALLS: &str = "HouseWalls";
pub const HOUSE_FURNITURE_TOP: &str = "HouseFurnitureTop";
pub const FENCE: &str = "Fence";
pub const WATER: &str = "Water";
pub const COLLISION: &str = "Collision";
pub const FARMABLE: &str = "Farmable";

pub const TREES: &str = "Trees";
pub const DECORATION: &str = "Decoration";
pub const PLAYER: &str = "Player";

pub const START_OBJECT: &str = "Start";
pub const BED_OBJECT: &str = "Bed";
pub const TRADER_OBJECT: &str = "Trader";

const REQUIRED_TILE_LAYERS: [&str; 8] = [
    HOUSE_FLOOR,
    HOUSE_FURNITURE_BOTTOM,
    HOUSE_WALLS,
    HOUSE_FURNITURE_TOP,
    FENCE,
    WATER,
    COLLISION,
    FARMABLE,
];

const REQUIRED_OBJECT_LAYERS: [&str; 3] = [TREES, DECORATION, PLAYER];

/// One tile. `x`/`y` are grid coordinates; `image` may be empty for layers
/// that only carry meaning (collision, farmable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub x: u32,
    pub y: u32,
    #[serde(default)]
    pub image: String,
}

impl TilePlacement {
    /// Pixel-space top-left corner.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x as f32 * TILE_SIZE, self.y as f32 * TILE_SIZE)
    }
}

/// A placed object. Position and size are in pixels, y growing downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub image: String,
}

impl MapObject {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.position(), self.position() + self.size())
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct WorldMap {
    /// Map size in tiles.
    pub width: u32,
    pub height: u32,
    /// Image stretched over the whole map on the ground layer.
    pub ground: String,
    pub tile_layers: BTreeMap<String, Vec<TilePlacement>>,
    pub object_layers: BTreeMap<String, Vec<MapObject>>,
}

impl WorldMap {
    pub fn from_ron_str(source: &str) -> Result<Self, SetupError> {
        let map: WorldMap = ron::from_str(source).map_err(|source| SetupError::Parse {
            what: "world map".to_string(),
            source,
        })?;
        map.validate()?;
        Ok(map)
    }

    /// The map is required; a missing file is fatal.
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let text = std::fs::read_to_string(path).map_err(|source| SetupError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        for layer in REQUIRED_TILE_LAYERS {
            if !self.tile_layers.contains_key(layer) {
                return Err(SetupError::MissingLayer(layer.to_string()));
            }
        }
        for layer in REQUIRED_OBJECT_LAYERS {
            if !self.object_layers.contains_key(layer) {
                return Err(SetupError::MissingLayer(layer.to_string()));
            }
        }
        self.object(PLAYER, START_OBJECT).map(|_| ())
    }

    pub fn tiles(&self, layer: &str) -> &[TilePlacement] {
        self.tile_layers.get(layer).map_or(&[], Vec::as_slice)
    }

    pub fn objects(&self, layer: &str) -> &[MapObject] {
        self.object_layers.get(layer).map_or(&[], Vec::as_slice)
    }

    /// First object with this name in the layer.
    pub fn object(&self, layer: &str, name: &str) -> Result<&MapObject, SetupError> {
        self.objects(layer)
            .iter()
            .find(|object| object.name == name)
            .ok_or_else(|| SetupError::MissingObject {
                layer: layer.to_string(),
                name: name.to_string(),
            })
    }

    /// Map size in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * TILE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_map() -> String {
        r#"(
            width: 4,
            height: 3,
            ground: "graphics/world/ground.png",
            tile_layers: {
                "HouseFloor": [], "HouseFurnitureBottom": [], "HouseWalls": [],
                "HouseFurnitureTop": [], "Fence": [], "Water": [],
                "Collision": [(x: 0, y: 0)],
                "Farmable": [(x: 1, y: 1), (x: 2, y: 1)],
            },
            object_layers: {
                "Trees": [], "Decoration": [],
                "Player": [(name: "Start", x: 128.0, y: 96.0, width: 0.0, height: 0.0)],
            },
        )"#
        .to_string()
    }

    #[test]
    fn minimal_map_parses() {
        let map = WorldMap::from_ron_str(&minimal_map()).unwrap();
        assert_eq!(map.pixel_size(), Vec2::new(256.0, 192.0));
        assert_eq!(map.tiles(FARMABLE).len(), 2);
        assert_eq!(map.tiles(FARMABLE)[1].position(), Vec2::new(128.0, 64.0));
        assert_eq!(map.object(PLAYER, START_OBJECT).unwrap().x, 128.0);
    }

    #[test]
    fn missing_layer_is_reported() {
        let source = minimal_map().replace("\"Fence\": [],", "");
        match WorldMap::from_ron_str(&source) {
            Err(SetupError::MissingLayer(layer)) => assert_eq!(layer, FENCE),
            other => panic!("expected missing layer, got {other:?}"),
        }
    }

    #[test]
    fn missing_start_is_reported() {
        let source = minimal_map().replace("\"Start\"", "\"Elsewhere\"");
        assert!(matches!(
            WorldMap::from_ron_str(&source),
            Err(SetupError::MissingObject { .. })
        ));
    }

    #[test]
    fn shipped_map_is_valid() {
        let map = WorldMap::load(Path::new(super::super::MAP_PATH)).unwrap();
        assert!(map.object(PLAYER, BED_OBJECT).is_ok());
        assert!(map.object(PLAYER, TRADER_OBJECT).is_ok());
        assert!(!map.tiles(FARMABLE).is_empty());
    }
}
