//! World domain: builds the level from the map and owns trees, interaction
//! zones and particles.

use bevy::prelude::*;

use crate::registry::SpriteRegistry;
use crate::shared::*;

pub mod particles;
pub mod setup;
pub mod trees;

pub use trees::Tree;

/// Area the player can `Enter` to interact with.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Bed,
    Trader,
}

/// Present while a level exists.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct LevelBuilt;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpriteRegistry>()
            .init_resource::<PlayerWallet>()
            .init_resource::<Weather>()
            .add_event::<PopParticleEvent>()
            .add_event::<DayResetEvent>()
            .add_systems(OnEnter(GameState::Playing), setup::build_level)
            .add_systems(OnEnter(GameState::Start), setup::teardown_level)
            .add_systems(
                Update,
                particles::expire_lifetimes
                    .in_set(LevelSet::Advance)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (trees::handle_axe, particles::spawn_pop_particles)
                    .chain()
                    .in_set(LevelSet::Control)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                trees::regrow_fruit
                    .in_set(LevelSet::Transition)
                    .after(crate::level::reset::run_day_reset)
                    .run_if(level_active),
            );
    }
}
