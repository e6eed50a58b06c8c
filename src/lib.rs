//! Harvest Moonlight library crate: re-exports all modules for integration
//! testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can import game types, systems, and resources without needing a
//! window or GPU.

pub mod shared;
pub mod input;
pub mod registry;
pub mod data;
pub mod world;
pub mod farming;
pub mod actor;
pub mod camera;
pub mod sky;
pub mod agent;
pub mod shop;
pub mod level;
pub mod session;
pub mod ui;

use bevy::prelude::*;

use shared::*;

/// Every simulation plugin, without rendering, windowing or audio. The game
/// adds `DefaultPlugins` and [`ui::UiPlugin`] on top; headless tests add
/// `MinimalPlugins`.
pub struct SimulationPlugins;

impl Plugin for SimulationPlugins {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_plugins(input::InputPlugin)
            .add_plugins(data::DataPlugin)
            .add_plugins(agent::AgentPlugin)
            .add_plugins(level::LevelPlugin)
            .add_plugins(world::WorldPlugin)
            .add_plugins(farming::FarmingPlugin)
            .add_plugins(actor::ActorPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(sky::SkyPlugin)
            .add_plugins(shop::ShopPlugin)
            .add_plugins(session::SessionPlugin);
    }
}
