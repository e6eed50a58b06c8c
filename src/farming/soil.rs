//! Soil grid: tile-indexed cultivation state.
//!
//! Pure data: no ECS access. The render module mirrors this grid into
//! sprites after every change.

use bevy::prelude::*;

use crate::data::crops::crop_def;
use crate::data::map::{WorldMap, FARMABLE};
use crate::shared::*;

/// Integer grid address of a soil tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub row: usize,
    pub col: usize,
}

impl TileCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Tile containing a map-pixel position. Negative positions have none.
    pub fn from_world(pos: Vec2) -> Option<Self> {
        if pos.x < 0.0 || pos.y < 0.0 || !pos.is_finite() {
            return None;
        }
        Some(Self {
            row: (pos.y / TILE_SIZE) as usize,
            col: (pos.x / TILE_SIZE) as usize,
        })
    }

    pub fn top_left(self) -> Vec2 {
        Vec2::new(self.col as f32 * TILE_SIZE, self.row as f32 * TILE_SIZE)
    }

    pub fn rect(self) -> Rect {
        Rect::from_corners(self.top_left(), self.top_left() + Vec2::splat(TILE_SIZE))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plant {
    pub crop: CropKind,
    pub stage: u8,
    pub max_stage: u8,
    pub harvestable: bool,
}

impl Plant {
    pub fn new(crop: CropKind) -> Self {
        Self {
            crop,
            stage: 0,
            max_stage: crop_def(crop).max_stage,
            harvestable: false,
        }
    }

    /// One growth step, capped at the maximum stage.
    pub fn grow(&mut self) {
        if self.stage < self.max_stage {
            self.stage += 1;
        }
        if self.stage >= self.max_stage {
            self.harvestable = true;
        }
    }
}

/// Sprite rect of a plant growing on `coord`: tile-sized, bottom edge on the
/// tile's bottom edge shifted by the crop's offset.
pub fn plant_rect(coord: TileCoord, crop: CropKind) -> Rect {
    let tile = coord.rect();
    let bottom = Vec2::new(tile.center().x, tile.max.y + crop_def(crop).y_offset);
    Rect::from_corners(
        bottom - Vec2::new(TILE_SIZE / 2.0, TILE_SIZE),
        bottom + Vec2::new(TILE_SIZE / 2.0, 0.0),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoilCell {
    pub farmable: bool,
    pub tilled: bool,
    pub watered: bool,
    pub plant: Option<Plant>,
}

impl SoilCell {
    pub fn planted(&self) -> bool {
        self.plant.is_some()
    }
}

/// Farmable bounds and per-tile soil state for the whole map.
#[derive(Resource, Debug, Clone, Default)]
pub struct SoilGrid {
    rows: usize,
    cols: usize,
    cells: Vec<SoilCell>,
    /// Fresh tiles are watered on the spot while this is set.
    pub raining: bool,
}

impl SoilGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![SoilCell::default(); rows * cols],
            raining: false,
        }
    }

    /// Grid sized to the map with every `Farmable` tile marked.
    pub fn from_map(map: &WorldMap) -> Self {
        let mut grid = Self::new(map.height as usize, map.width as usize);
        for tile in map.tiles(FARMABLE) {
            grid.set_farmable(TileCoord::new(tile.y as usize, tile.x as usize));
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn set_farmable(&mut self, coord: TileCoord) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.farmable = true;
        }
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        (coord.row < self.rows && coord.col < self.cols).then(|| coord.row * self.cols + coord.col)
    }

    pub fn cell(&self, coord: TileCoord) -> Option<&SoilCell> {
        self.index(coord).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, coord: TileCoord) -> Option<&mut SoilCell> {
        self.index(coord).map(|i| &mut self.cells[i])
    }

    /// In-bounds tile under a map position.
    pub fn coord_at(&self, pos: Vec2) -> Option<TileCoord> {
        TileCoord::from_world(pos).filter(|coord| self.index(*coord).is_some())
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (TileCoord, &SoilCell)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (TileCoord::new(i / cols, i % cols), cell))
    }

    /// Till a farmable tile. Returns true when the tile changed.
    pub fn till(&mut self, pos: Vec2) -> bool {
        let raining = self.raining;
        let Some(cell) = self.coord_at(pos).and_then(|c| self.cell_mut(c)) else {
            return false;
        };
        if !cell.farmable || cell.tilled {
            return false;
        }
        cell.tilled = true;
        if raining {
            cell.watered = true;
        }
        true
    }

    /// Water a tilled tile. Returns true when the tile changed.
    pub fn water(&mut self, pos: Vec2) -> bool {
        match self.coord_at(pos).and_then(|c| self.cell_mut(c)) {
            Some(cell) if cell.tilled && !cell.watered => {
                cell.watered = true;
                true
            }
            _ => false,
        }
    }

    /// Plant a seed on a tilled, empty tile. Returns true on success.
    pub fn plant(&mut self, pos: Vec2, crop: CropKind) -> bool {
        match self.coord_at(pos).and_then(|c| self.cell_mut(c)) {
            Some(cell) if cell.tilled && cell.plant.is_none() => {
                cell.plant = Some(Plant::new(crop));
                true
            }
            _ => false,
        }
    }

    pub fn remove_water(&mut self) {
        for cell in &mut self.cells {
            cell.watered = false;
        }
    }

    /// Water every tilled tile.
    pub fn water_all(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.tilled) {
            cell.watered = true;
        }
    }

    /// One growth step for every plant on a watered tile. Returns how many
    /// plants grew.
    pub fn advance_growth(&mut self) -> usize {
        let mut grown = 0;
        for cell in self.cells.iter_mut().filter(|cell| cell.watered) {
            if let Some(plant) = cell.plant.as_mut() {
                let before = plant.stage;
                plant.grow();
                if plant.stage != before {
                    grown += 1;
                }
            }
        }
        grown
    }

    /// Remove a ripe plant and return its crop. Unripe or absent plants are
    /// left alone.
    pub fn harvest(&mut self, coord: TileCoord) -> Option<CropKind> {
        let cell = self.cell_mut(coord)?;
        match cell.plant {
            Some(plant) if plant.harvestable => {
                cell.plant = None;
                Some(plant.crop)
            }
            _ => None,
        }
    }

    /// Tiles holding a ripe plant.
    pub fn harvestable(&self) -> Vec<(TileCoord, CropKind)> {
        self.cells()
            .filter_map(|(coord, cell)| {
                cell.plant
                    .filter(|plant| plant.harvestable)
                    .map(|plant| (coord, plant.crop))
            })
            .collect()
    }
}
