//! Level construction and teardown.

use bevy::prelude::*;
use rand::Rng;

use super::trees::{object_hitbox, spawn_tree};
use super::{LevelBuilt, Zone};
use crate::actor::{actor_hitbox, spawn_actor, Controller, PlayerKit, PursuerContact};
use crate::data::crops::TreeSize;
use crate::data::map::*;
use crate::data::{GameConfig, SetupError};
use crate::farming::{FarmEntities, SoilGrid};
use crate::registry::*;
use crate::shared::*;

/// Counts logged once the level is up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelSummary {
    pub sprites: u64,
    pub trees: usize,
    pub farmable: usize,
}

/// Roll the weather locally.
pub fn roll_rain(chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen_bool(chance.clamp(0.0, 1.0))
}

fn register_tiles(
    commands: &mut Commands,
    registry: &mut SpriteRegistry,
    assets: Option<&AssetServer>,
    map: &WorldMap,
    layer_name: &str,
    layer: Layer,
    groups: &[Group],
) {
    for tile in map.tiles(layer_name) {
        let rect = rect_at(tile.position(), Vec2::splat(TILE_SIZE));
        let mut registration = Registration::new(rect, layer, groups, Look::Image(tile.image.clone()));
        if groups.contains(&Group::Collidable) {
            registration = registration.with_hitbox(object_hitbox(rect));
        }
        registry.register(commands, assets, registration);
    }
}

/// Populate the registry, soil grid, wallet and weather from the map.
#[allow(clippy::too_many_arguments)]
pub fn populate_level(
    commands: &mut Commands,
    registry: &mut SpriteRegistry,
    assets: Option<&AssetServer>,
    map: &WorldMap,
    config: &GameConfig,
    grid: &mut SoilGrid,
    wallet: &mut PlayerWallet,
    weather: &mut Weather,
    rng: &mut impl Rng,
) -> Result<LevelSummary, SetupError> {
    let start = map.object(PLAYER, START_OBJECT)?.position();

    // Ground
    let ground = Rect::from_corners(Vec2::ZERO, map.pixel_size());
    registry.register(
        commands,
        assets,
        Registration::new(ground, Layer::Ground, &[Group::All], Look::Image(map.ground.clone())),
    );

    // House
    for name in [HOUSE_FLOOR, HOUSE_FURNITURE_BOTTOM] {
        register_tiles(commands, registry, assets, map, name, Layer::HouseBottom, &[Group::All]);
    }
    for name in [HOUSE_WALLS, HOUSE_FURNITURE_TOP] {
        register_tiles(commands, registry, assets, map, name, Layer::Main, &[Group::All]);
    }

    register_tiles(
        commands,
        registry,
        assets,
        map,
        FENCE,
        Layer::Main,
        &[Group::All, Group::Collidable],
    );
    register_tiles(commands, registry, assets, map, WATER, Layer::Water, &[Group::All]);

    // Invisible blockers
    for tile in map.tiles(COLLISION) {
        let rect = rect_at(tile.position(), Vec2::splat(TILE_SIZE));
        registry.register(
            commands,
            assets,
            Registration::new(rect, Layer::Main, &[Group::Collidable], Look::Color(Color::NONE)),
        );
    }

    let trees = map.objects(TREES);
    for object in trees {
        let size = TreeSize::from_name(&object.name);
        spawn_tree(commands, registry, assets, object.rect(), size, &object.image, rng);
    }

    // Wildflowers
    for object in map.objects(DECORATION) {
        let rect = object.rect();
        let hitbox = inflate(rect, Vec2::new(-20.0, -rect.height() * 0.9));
        let registration = Registration::new(
            rect,
            Layer::Main,
            &[Group::All, Group::Collidable],
            Look::Image(object.image.clone()),
        )
        .with_hitbox(hitbox);
        registry.register(commands, assets, registration);
    }

    // Interaction zones
    for object in map.objects(PLAYER) {
        let zone = match object.name.as_str() {
            BED_OBJECT => Zone::Bed,
            TRADER_OBJECT => Zone::Trader,
            _ => continue,
        };
        let registration = Registration::new(
            object.rect(),
            Layer::Main,
            &[Group::Interactable],
            Look::Color(Color::NONE),
        );
        registry.register(commands, assets, registration).insert(zone);
    }

    // Actors
    let player = spawn_actor(
        commands,
        registry,
        assets,
        config,
        start,
        Controller::PlayerInput,
        "character",
    )?;
    commands.entity(player).insert((Player, PlayerKit::default()));

    let jitter = config.actors.pursuer_spawn_jitter.abs();
    let offset = if jitter > 0.0 {
        Vec2::new(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
    } else {
        Vec2::ZERO
    };
    let pursuer = spawn_actor(
        commands,
        registry,
        assets,
        config,
        start + offset,
        Controller::ChaseTarget { target: start },
        "enemy",
    )?;
    let contact = PursuerContact::at_spawn(
        actor_hitbox(config, start + offset),
        actor_hitbox(config, start),
    );
    commands.entity(pursuer).insert((Pursuer, contact));

    // Soil, wallet, weather
    *grid = SoilGrid::from_map(map);
    *wallet = config.economy.starting_wallet();
    weather.raining = roll_rain(config.rain_chance, rng);
    grid.raining = weather.raining;

    Ok(LevelSummary {
        sprites: registry.registered(),
        trees: trees.len(),
        farmable: map.tiles(FARMABLE).len(),
    })
}

/// OnEnter(Playing): build the world unless it already exists (returning
/// from the shop keeps the current level).
#[allow(clippy::too_many_arguments)]
pub fn build_level(
    mut commands: Commands,
    built: Option<Res<LevelBuilt>>,
    map: Option<Res<WorldMap>>,
    config: Res<GameConfig>,
    assets: Option<Res<AssetServer>>,
    mut registry: ResMut<SpriteRegistry>,
    mut grid: ResMut<SoilGrid>,
    mut wallet: ResMut<PlayerWallet>,
    mut weather: ResMut<Weather>,
    mut exit: EventWriter<AppExit>,
) {
    if built.is_some() {
        return;
    }
    let Some(map) = map else {
        error!("[World] no world map loaded");
        exit.send(AppExit::error());
        return;
    };

    let mut rng = rand::thread_rng();
    let result = populate_level(
        &mut commands,
        &mut registry,
        assets.as_deref(),
        &map,
        &config,
        &mut grid,
        &mut wallet,
        &mut weather,
        &mut rng,
    );
    match result {
        Ok(summary) => {
            info!(
                "[World] level built: {} sprites, {} trees, {} farmable tiles, raining: {}",
                summary.sprites, summary.trees, summary.farmable, weather.raining
            );
            commands.insert_resource(LevelBuilt);
        }
        Err(err) => {
            error!("[World] cannot build level: {err}");
            exit.send(AppExit::error());
        }
    }
}

/// OnEnter(Start): throw the old level away so the next game starts fresh.
pub fn teardown_level(
    mut commands: Commands,
    sprites: Query<Entity, With<WorldSprite>>,
    mut registry: ResMut<SpriteRegistry>,
    mut farm_entities: ResMut<FarmEntities>,
    mut grid: ResMut<SoilGrid>,
) {
    let mut removed = 0;
    for entity in &sprites {
        destroy(&mut commands, entity);
        removed += 1;
    }
    if removed > 0 {
        info!("[World] level torn down ({removed} sprites)");
    }
    registry.reset();
    *farm_entities = FarmEntities::default();
    *grid = SoilGrid::default();
    commands.remove_resource::<LevelBuilt>();
}
