//! The pursuer: chases the player in a straight line and costs money on
//! contact.

use bevy::prelude::*;

use super::{Actor, Controller};
use crate::data::GameConfig;
use crate::registry::{overlaps, Hitbox};
use crate::shared::*;

/// Closer than this on an axis counts as aligned.
const ALIGN_EPSILON: f32 = 1.0;

/// Whether the pursuer was already touching the player last frame. The
/// penalty is charged once per contact, not once per frame.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PursuerContact {
    pub touching: bool,
}

impl PursuerContact {
    /// A pursuer that spawns on top of the player is already in contact.
    pub fn at_spawn(pursuer: Rect, player: Rect) -> Self {
        Self {
            touching: overlaps(pursuer, player),
        }
    }

    /// Record this frame's overlap. True only when a new contact begins.
    pub fn update(&mut self, touching: bool) -> bool {
        let started = touching && !self.touching;
        self.touching = touching;
        started
    }
}

fn axis_sign(delta: f32) -> f32 {
    if delta > ALIGN_EPSILON {
        1.0
    } else if delta < -ALIGN_EPSILON {
        -1.0
    } else {
        0.0
    }
}

/// Direction and status that take an actor at `pos` towards `target`.
/// Vertical movement decides the facing when both axes move.
pub fn chase(pos: Vec2, target: Vec2, current: ActorStatus) -> (Vec2, ActorStatus) {
    let delta = target - pos;
    let direction = Vec2::new(axis_sign(delta.x), axis_sign(delta.y));

    let mut facing = current.facing;
    if direction.x > 0.0 {
        facing = Facing::Right;
    } else if direction.x < 0.0 {
        facing = Facing::Left;
    }
    if direction.y > 0.0 {
        facing = Facing::Down;
    } else if direction.y < 0.0 {
        facing = Facing::Up;
    }

    let status = if direction == Vec2::ZERO {
        ActorStatus::idle(facing)
    } else {
        ActorStatus::moving(facing)
    };
    (direction, status)
}

/// Aim every chasing actor at the player's current position.
pub fn track_player(
    player: Query<&Actor, With<Player>>,
    mut chasers: Query<&mut Controller, Without<Player>>,
) {
    let Ok(player) = player.get_single() else {
        return;
    };
    for mut controller in &mut chasers {
        if let Controller::ChaseTarget { target } = controller.as_mut() {
            *target = player.pos;
        }
    }
}

pub fn steer_chasers(mut chasers: Query<(&mut Actor, &Controller)>) {
    for (mut actor, controller) in &mut chasers {
        if let Controller::ChaseTarget { target } = *controller {
            let (direction, status) = chase(actor.pos, target, actor.status);
            actor.direction = direction;
            actor.status = status;
        }
    }
}

/// Charge the penalty when a pursuer starts touching the player.
pub fn apply_pursuer_penalty(
    config: Res<GameConfig>,
    mut wallet: ResMut<PlayerWallet>,
    player: Query<&Hitbox, With<Player>>,
    mut pursuers: Query<(&Hitbox, &mut PursuerContact), (With<Pursuer>, Without<Player>)>,
) {
    let Ok(player) = player.get_single() else {
        return;
    };
    for (hitbox, mut contact) in &mut pursuers {
        if contact.update(overlaps(hitbox.0, player.0)) {
            wallet.money -= config.economy.pursuer_penalty;
            warn!(
                "[Pursuer] caught the player: -{} (money {})",
                config.economy.pursuer_penalty, wallet.money
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chases_along_both_axes() {
        let (direction, status) = chase(
            Vec2::ZERO,
            Vec2::new(-300.0, 40.0),
            ActorStatus::idle(Facing::Up),
        );
        assert_eq!(direction, Vec2::new(-1.0, 1.0));
        assert_eq!(status, ActorStatus::moving(Facing::Down));
    }

    #[test]
    fn aligned_axis_does_not_jitter() {
        let (direction, status) = chase(
            Vec2::new(10.0, 10.0),
            Vec2::new(200.0, 10.4),
            ActorStatus::idle(Facing::Up),
        );
        assert_eq!(direction, Vec2::X);
        assert_eq!(status, ActorStatus::moving(Facing::Right));
    }

    #[test]
    fn contact_charges_once_per_touch() {
        let mut contact = PursuerContact::default();
        assert!(contact.update(true));
        assert!(!contact.update(true), "still touching");
        assert!(!contact.update(false));
        assert!(contact.update(true), "touched again");
    }

    #[test]
    fn spawning_on_the_player_is_not_a_new_contact() {
        let player = Rect::from_center_size(Vec2::ZERO, Vec2::new(66.0, 122.0));
        let near = Rect::from_center_size(Vec2::new(20.0, -20.0), Vec2::new(66.0, 122.0));
        let far = Rect::from_center_size(Vec2::new(500.0, 0.0), Vec2::new(66.0, 122.0));

        let mut contact = PursuerContact::at_spawn(near, player);
        assert!(contact.touching);
        assert!(!contact.update(true));

        assert!(!PursuerContact::at_spawn(far, player).touching);
    }

    #[test]
    fn idles_on_target() {
        let (direction, status) = chase(
            Vec2::new(5.0, 5.0),
            Vec2::new(5.0, 5.0),
            ActorStatus::moving(Facing::Left),
        );
        assert_eq!(direction, Vec2::ZERO);
        assert_eq!(status, ActorStatus::idle(Facing::Left));
    }
}
