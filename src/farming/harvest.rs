//! Tool handling and auto-harvest.

use bevy::prelude::*;

use super::soil::{plant_rect, SoilGrid, TileCoord};
use crate::registry::{overlaps, Hitbox};
use crate::shared::*;

/// Hoe tills, watering can waters. The axe belongs to the trees.
pub fn handle_soil_tools(mut events: EventReader<ToolUseEvent>, mut grid: ResMut<SoilGrid>) {
    for event in events.read() {
        match event.tool {
            Tool::Hoe => {
                if grid.till(event.target) {
                    info!("[Farming] tilled {:?}", TileCoord::from_world(event.target));
                }
            }
            Tool::Water => {
                grid.water(event.target);
            }
            Tool::Axe => {}
        }
    }
}

/// Plant the selected seed. A seed is only spent when planting succeeds.
pub fn handle_seed_use(
    mut events: EventReader<SeedUseEvent>,
    mut grid: ResMut<SoilGrid>,
    mut wallet: ResMut<PlayerWallet>,
) {
    for event in events.read() {
        if wallet.seed_count(event.crop) == 0 {
            continue;
        }
        if grid.plant(event.target, event.crop) {
            wallet.take_seed(event.crop);
            info!(
                "[Farming] planted {} ({} seeds left)",
                event.crop.name(),
                wallet.seed_count(event.crop)
            );
        }
    }
}

/// Plants harvested this frame, with the rect each one occupied.
pub fn collect_ripe_plants(grid: &mut SoilGrid, hitbox: Rect) -> Vec<(CropKind, Rect)> {
    let mut harvested = Vec::new();
    for (coord, crop) in grid.harvestable() {
        let rect = plant_rect(coord, crop);
        if overlaps(rect, hitbox) {
            if let Some(crop) = grid.harvest(coord) {
                harvested.push((crop, rect));
            }
        }
    }
    harvested
}

/// Any ripe plant touching the player's hitbox goes straight to the
/// inventory and leaves a pop particle behind.
pub fn harvest_ripe_plants(
    mut grid: ResMut<SoilGrid>,
    mut wallet: ResMut<PlayerWallet>,
    player: Query<&Hitbox, With<Player>>,
    mut particles: EventWriter<PopParticleEvent>,
) {
    let Ok(hitbox) = player.get_single() else {
        return;
    };
    let has_ripe = grid.cells().any(|(_, cell)| cell.plant.is_some_and(|p| p.harvestable));
    if !has_ripe {
        return;
    }

    for (crop, rect) in collect_ripe_plants(&mut grid, hitbox.0) {
        wallet.add_item(crop.produce());
        particles.send(PopParticleEvent { rect });
        info!(
            "[Farming] harvested {} (now {})",
            crop.name(),
            wallet.item_count(crop.produce())
        );
    }
}
