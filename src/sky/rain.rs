use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use crate::data::WorldMap;
use crate::registry::*;
use crate::shared::*;
use crate::world::particles::Lifetime;

const DROP_IMAGE: &str = "graphics/rain/drops/0.png";
const FLOOR_IMAGE: &str = "graphics/rain/floor/0.png";
const DROP_SIZE: Vec2 = Vec2::new(8.0, 16.0);
const FLOOR_SIZE: Vec2 = Vec2::new(24.0, 12.0);
/// Falling direction before scaling by the drop's speed.
const DROP_HEADING: Vec2 = Vec2::new(-2.0, 4.0);

/// A falling raindrop.
#[derive(Component, Debug, Clone, Copy)]
pub struct RainDrop {
    pub velocity: Vec2,
}

fn random_lifetime(rng: &mut impl Rng) -> Lifetime {
    Lifetime::new(Duration::from_millis(rng.gen_range(400..=500)))
}

/// One drop and one floor splash per frame while it rains.
pub fn spawn_rain(
    mut commands: Commands,
    weather: Res<Weather>,
    map: Option<Res<WorldMap>>,
    assets: Option<Res<AssetServer>>,
    mut registry: ResMut<SpriteRegistry>,
) {
    if !weather.raining {
        return;
    }
    let Some(map) = map else {
        return;
    };
    let bounds = map.pixel_size();
    if bounds.x <= 0.0 || bounds.y <= 0.0 {
        return;
    }
    let mut rng = rand::thread_rng();
    let assets = assets.as_deref();

    let at = Vec2::new(rng.gen_range(0.0..bounds.x), rng.gen_range(0.0..bounds.y));
    let registration = Registration::new(
        rect_at(at, DROP_SIZE),
        Layer::RainDrops,
        &[Group::All],
        Look::Image(DROP_IMAGE.into()),
    );
    let velocity = DROP_HEADING * rng.gen_range(200.0..=250.0);
    registry
        .register(&mut commands, assets, registration)
        .insert((RainDrop { velocity }, random_lifetime(&mut rng)));

    let at = Vec2::new(rng.gen_range(0.0..bounds.x), rng.gen_range(0.0..bounds.y));
    let registration = Registration::new(
        rect_at(at, FLOOR_SIZE),
        Layer::RainFloor,
        &[Group::All],
        Look::Image(FLOOR_IMAGE.into()),
    );
    registry
        .register(&mut commands, assets, registration)
        .insert(random_lifetime(&mut rng));
}

pub fn fall_rain(time: Res<Time>, mut drops: Query<(&RainDrop, &mut WorldSprite)>) {
    let dt = time.delta_secs();
    for (drop, mut sprite) in &mut drops {
        let shift = drop.velocity * dt;
        sprite.rect = Rect::from_corners(sprite.rect.min + shift, sprite.rect.max + shift);
    }
}
