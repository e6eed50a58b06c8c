//! Actors: the player and the pursuer.
//!
//! Both share one `Actor` component and the same movement, collision and
//! animation systems. A `Controller` decides where each one wants to go:
//! the keyboard for the player, the player's position for the pursuer.

use bevy::prelude::*;

use crate::data::{GameConfig, SetupError};
use crate::registry::{inflate, Group, Look, Registration, SpriteRegistry};
use crate::shared::*;

pub mod animation;
pub mod movement;
pub mod player;
pub mod pursuer;

pub use animation::AnimationSet;
pub use player::PlayerKit;
pub use pursuer::PursuerContact;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    /// Centre of the hitbox, map pixels.
    pub pos: Vec2,
    /// Zero or unit length after every move.
    pub direction: Vec2,
    pub speed: f32,
    pub status: ActorStatus,
    /// Fractional index into the current animation sequence.
    pub frame: f32,
}

impl Actor {
    pub fn new(pos: Vec2, speed: f32, status: ActorStatus) -> Self {
        Self {
            pos,
            direction: Vec2::ZERO,
            speed,
            status,
            frame: 0.0,
        }
    }

    /// Switch to the idle variant of the current facing.
    pub fn idle(&mut self) {
        self.status = ActorStatus::idle(self.status.facing);
    }
}

/// Where an actor's per-frame direction comes from.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum Controller {
    PlayerInput,
    ChaseTarget { target: Vec2 },
}

/// Player hitbox: the sprite rect shrunk by 126 × 70.
pub const PLAYER_HITBOX_SHRINK: Vec2 = Vec2::new(-126.0, -70.0);

/// Hitbox of an actor centred on `pos`.
pub fn actor_hitbox(config: &GameConfig, pos: Vec2) -> Rect {
    inflate(Rect::from_center_size(pos, config.actors.sprite_size()), PLAYER_HITBOX_SHRINK)
}

/// Register an actor sprite with its hitbox and animation.
pub fn spawn_actor(
    commands: &mut Commands,
    registry: &mut SpriteRegistry,
    assets: Option<&AssetServer>,
    config: &GameConfig,
    pos: Vec2,
    controller: Controller,
    folder: &str,
) -> Result<Entity, SetupError> {
    let animations = AnimationSet::from_folder(folder, config.actors.frames_per_status)?;
    let rect = Rect::from_center_size(pos, config.actors.sprite_size());
    let hitbox = actor_hitbox(config, pos);
    let speed = match controller {
        Controller::PlayerInput => config.actors.player_speed,
        Controller::ChaseTarget { .. } => config.actors.pursuer_speed,
    };
    let first_frame = animations
        .frames(ActorStatus::idle(Facing::Down))
        .first()
        .cloned()
        .unwrap_or_default();

    let registration = Registration::new(rect, Layer::Main, &[Group::All], Look::Image(first_frame))
        .with_hitbox(hitbox);
    let entity = registry
        .register(commands, assets, registration)
        .insert((
            Actor::new(pos, speed, ActorStatus::idle(Facing::Down)),
            controller,
            animations,
        ))
        .id();
    Ok(entity)
}

pub struct ActorPlugin;

impl Plugin for ActorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            pursuer::track_player
                .in_set(LevelSet::Track)
                .run_if(level_active),
        )
        .add_systems(
            Update,
            (
                player::drive_player,
                pursuer::steer_chasers,
                movement::move_actors,
                animation::animate_actors,
            )
                .chain()
                .in_set(LevelSet::Advance)
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            Update,
            pursuer::apply_pursuer_penalty
                .in_set(LevelSet::Harvest)
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            Update,
            player::handle_player_interactions
                .in_set(LevelSet::Control)
                .run_if(in_state(GameState::Playing)),
        );
    }
}
