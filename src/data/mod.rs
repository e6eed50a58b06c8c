//! Data layer: loads configuration and world map at startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), reads
//! `assets/config/game.ron` and `assets/data/map.ron`, inserts them as
//! resources and transitions the game to GameState::Start. A map that is
//! missing or incomplete is fatal: the world cannot be built without it.

pub mod config;
pub mod crops;
pub mod map;

use std::path::Path;

use bevy::prelude::*;
use thiserror::Error;

use crate::shared::*;

pub use config::{AgentConfig, GameConfig};
pub use map::WorldMap;

pub const CONFIG_PATH: &str = "assets/config/game.ron";
pub const MAP_PATH: &str = "assets/data/map.ron";

/// Anything that stops the world from being constructed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed {what}: {source}")]
    Parse {
        what: String,
        source: ron::error::SpannedError,
    },
    #[error("map layer '{0}' is missing")]
    MissingLayer(String),
    #[error("map object '{name}' is missing from layer '{layer}'")]
    MissingObject { layer: String, name: String },
    #[error("animation '{0}' has no frames")]
    EmptyAnimation(String),
}

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Reads config and map, then moves on to the start screen.
fn load_all_data(
    mut commands: Commands,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    info!("[Data] loading configuration and world map…");

    let loaded = GameConfig::load(Path::new(CONFIG_PATH))
        .and_then(|config| WorldMap::load(Path::new(MAP_PATH)).map(|map| (config, map)));

    match loaded {
        Ok((config, map)) => {
            info!(
                "[Data] map {}x{} tiles, {} tile layers, {} object layers",
                map.width,
                map.height,
                map.tile_layers.len(),
                map.object_layers.len()
            );
            commands.insert_resource(config);
            commands.insert_resource(map);
            next_state.set(GameState::Start);
        }
        Err(err) => {
            error!("[Data] cannot start: {err}");
            exit.send(AppExit::error());
        }
    }
}
