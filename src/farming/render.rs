//! Visual synchronisation: mirror the soil grid into registered sprites.

use bevy::prelude::*;

use super::soil::{plant_rect, SoilGrid, TileCoord};
use super::FarmEntities;
use crate::data::crops::stage_image;
use crate::registry::*;
use crate::shared::*;

const SOIL_IMAGE: &str = "graphics/soil/o.png";
const SOIL_WATER_IMAGE: &str = "graphics/soil_water/0.png";

/// Registration for a plant sprite at its current stage. Sprouted plants
/// stand on the main layer and block movement.
pub fn plant_registration(coord: TileCoord, crop: CropKind, stage: u8) -> Registration {
    let rect = plant_rect(coord, crop);
    let look = Look::Image(stage_image(crop, stage));
    if stage == 0 {
        return Registration::new(rect, Layer::GroundPlant, &[Group::All], look);
    }
    let hitbox = inflate(rect, Vec2::new(-26.0, -rect.height() * 0.4));
    Registration::new(rect, Layer::Main, &[Group::All, Group::Collidable], look).with_hitbox(hitbox)
}

/// Spawn missing soil, water and plant sprites; despawn stale ones; re-register
/// plants whose stage changed.
pub fn sync_soil_sprites(
    mut commands: Commands,
    grid: Res<SoilGrid>,
    assets: Option<Res<AssetServer>>,
    mut registry: ResMut<SpriteRegistry>,
    mut entities: ResMut<FarmEntities>,
) {
    if !grid.is_changed() {
        return;
    }
    let assets = assets.as_deref();

    for (coord, cell) in grid.cells() {
        // Tilled patch
        match (cell.tilled, entities.soil.get(&coord).copied()) {
            (true, None) => {
                let registration = Registration::new(
                    coord.rect(),
                    Layer::Soil,
                    &[Group::All],
                    Look::Image(SOIL_IMAGE.into()),
                );
                let entity = registry.register(&mut commands, assets, registration).id();
                entities.soil.insert(coord, entity);
            }
            (false, Some(entity)) => {
                destroy(&mut commands, entity);
                entities.soil.remove(&coord);
            }
            _ => {}
        }

        // Water overlay
        match (cell.watered, entities.water.get(&coord).copied()) {
            (true, None) => {
                let registration = Registration::new(
                    coord.rect(),
                    Layer::SoilWater,
                    &[Group::All],
                    Look::Image(SOIL_WATER_IMAGE.into()),
                );
                let entity = registry.register(&mut commands, assets, registration).id();
                entities.water.insert(coord, entity);
            }
            (false, Some(entity)) => {
                destroy(&mut commands, entity);
                entities.water.remove(&coord);
            }
            _ => {}
        }

        // Plant
        let current = entities.plants.get(&coord).copied();
        match (cell.plant, current) {
            (Some(plant), Some((_, stage))) if stage == plant.stage => {}
            (Some(plant), stale) => {
                if let Some((entity, _)) = stale {
                    destroy(&mut commands, entity);
                }
                let registration = plant_registration(coord, plant.crop, plant.stage);
                let entity = registry.register(&mut commands, assets, registration).id();
                entities.plants.insert(coord, (entity, plant.stage));
            }
            (None, Some((entity, _))) => {
                destroy(&mut commands, entity);
                entities.plants.remove(&coord);
            }
            (None, None) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seedlings_do_not_block() {
        let seedling = plant_registration(TileCoord::new(0, 0), CropKind::Corn, 0);
        assert_eq!(seedling.layer, Layer::GroundPlant);
        assert!(!seedling.groups.contains(Group::Collidable));
        assert!(seedling.hitbox.is_none());

        let grown = plant_registration(TileCoord::new(0, 0), CropKind::Corn, 1);
        assert_eq!(grown.layer, Layer::Main);
        assert!(grown.groups.contains(Group::Collidable));
        let hitbox = grown.hitbox.unwrap();
        assert_eq!(hitbox.width(), TILE_SIZE - 26.0);
        assert!((hitbox.height() - TILE_SIZE * 0.6).abs() < 1e-4);
    }
}
