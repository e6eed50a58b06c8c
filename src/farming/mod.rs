//! Farming domain: soil tilling, watering, planting, growth, harvest.
//!
//! The `SoilGrid` resource is the source of truth. Render systems mirror it
//! into sprites; the day reset advances it.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::shared::*;

pub mod harvest;
pub mod render;
pub mod soil;

pub use soil::{Plant, SoilCell, SoilGrid, TileCoord};

/// Sprite entities mirroring the soil grid, keyed by tile.
#[derive(Resource, Default, Debug)]
pub struct FarmEntities {
    pub soil: HashMap<TileCoord, Entity>,
    pub water: HashMap<TileCoord, Entity>,
    /// Plant entity and the stage it was drawn at.
    pub plants: HashMap<TileCoord, (Entity, u8)>,
}

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoilGrid>()
            .init_resource::<FarmEntities>()
            .add_event::<ToolUseEvent>()
            .add_event::<SeedUseEvent>()
            .add_systems(
                Update,
                render::sync_soil_sprites
                    .in_set(LevelSet::Render)
                    .run_if(level_active),
            )
            .add_systems(
                Update,
                harvest::harvest_ripe_plants
                    .in_set(LevelSet::Harvest)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (harvest::handle_soil_tools, harvest::handle_seed_use)
                    .in_set(LevelSet::Control)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
