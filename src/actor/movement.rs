use bevy::prelude::*;

use super::Actor;
use crate::registry::{collidable_rects, overlaps, Groups, Hitbox, WorldSprite};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Move an actor by `direction × speed × dt`, one axis at a time, resolving
/// collisions after each axis. The hitbox is the source of truth for
/// position; the actor's `pos` is its centre afterwards.
///
/// The stored direction is normalized in place so diagonal movement is not
/// faster than cardinal movement.
pub fn move_actor(actor: &mut Actor, hitbox: &mut Rect, obstacles: &[Rect], dt: f32) {
    actor.direction = actor.direction.normalize_or_zero();
    let step = actor.direction * actor.speed * dt;

    actor.pos.x += step.x;
    *hitbox = Rect::from_center_size(Vec2::new(actor.pos.x, hitbox.center().y), hitbox.size());
    resolve(actor, hitbox, obstacles, Axis::X);

    actor.pos.y += step.y;
    *hitbox = Rect::from_center_size(Vec2::new(hitbox.center().x, actor.pos.y), hitbox.size());
    resolve(actor, hitbox, obstacles, Axis::Y);
}

/// Clamp the hitbox edge facing the direction of travel to every obstacle it
/// now overlaps.
fn resolve(actor: &mut Actor, hitbox: &mut Rect, obstacles: &[Rect], axis: Axis) {
    for obstacle in obstacles {
        if !overlaps(*hitbox, *obstacle) {
            continue;
        }
        let size = hitbox.size();
        match axis {
            Axis::X if actor.direction.x > 0.0 => {
                hitbox.max.x = obstacle.min.x;
                hitbox.min.x = hitbox.max.x - size.x;
            }
            Axis::X if actor.direction.x < 0.0 => {
                hitbox.min.x = obstacle.max.x;
                hitbox.max.x = hitbox.min.x + size.x;
            }
            Axis::Y if actor.direction.y > 0.0 => {
                hitbox.max.y = obstacle.min.y;
                hitbox.min.y = hitbox.max.y - size.y;
            }
            Axis::Y if actor.direction.y < 0.0 => {
                hitbox.min.y = obstacle.max.y;
                hitbox.max.y = hitbox.min.y + size.y;
            }
            _ => {}
        }
        match axis {
            Axis::X => actor.pos.x = hitbox.center().x,
            Axis::Y => actor.pos.y = hitbox.center().y,
        }
    }
}

/// Advance every actor and keep its sprite rect centred on it.
pub fn move_actors(
    time: Res<Time>,
    mut actors: Query<(&mut Actor, &mut Hitbox, &mut WorldSprite)>,
    solids: Query<(&WorldSprite, &Groups, Option<&Hitbox>), Without<Actor>>,
) {
    let dt = time.delta_secs();
    let obstacles = collidable_rects(solids.iter());

    for (mut actor, mut hitbox, mut sprite) in &mut actors {
        move_actor(&mut actor, &mut hitbox.0, &obstacles, dt);
        sprite.rect = Rect::from_center_size(actor.pos, sprite.rect.size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::rect_at;
    use crate::shared::*;

    fn actor_at(pos: Vec2, direction: Vec2) -> (Actor, Rect) {
        let actor = Actor::new(pos, 200.0, ActorStatus::idle(Facing::Down));
        let actor = Actor { direction, ..actor };
        (actor, Rect::from_center_size(pos, Vec2::new(66.0, 122.0)))
    }

    #[test]
    fn diagonal_is_not_faster() {
        let (mut actor, mut hitbox) = actor_at(Vec2::ZERO, Vec2::new(3.0, 4.0));
        move_actor(&mut actor, &mut hitbox, &[], 1.0);
        assert!((actor.direction.length() - 1.0).abs() < 1e-5);
        assert!((actor.pos.length() - 200.0).abs() < 1e-3);
    }

    #[test]
    fn zero_direction_stays_put() {
        let (mut actor, mut hitbox) = actor_at(Vec2::new(5.0, 5.0), Vec2::ZERO);
        move_actor(&mut actor, &mut hitbox, &[], 1.0);
        assert_eq!(actor.direction, Vec2::ZERO);
        assert_eq!(actor.pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn moving_right_clamps_to_left_edge() {
        let wall = rect_at(Vec2::new(100.0, -200.0), Vec2::new(64.0, 400.0));
        let (mut actor, mut hitbox) = actor_at(Vec2::ZERO, Vec2::X);
        move_actor(&mut actor, &mut hitbox, &[wall], 0.5);
        assert_eq!(hitbox.max.x, 100.0);
        assert_eq!(actor.pos.x, 100.0 - 33.0);
        assert!(!overlaps(hitbox, wall));
    }

    #[test]
    fn moving_up_clamps_to_bottom_edge() {
        let ceiling = rect_at(Vec2::new(-200.0, -164.0), Vec2::new(400.0, 64.0));
        let (mut actor, mut hitbox) = actor_at(Vec2::ZERO, Vec2::NEG_Y);
        move_actor(&mut actor, &mut hitbox, &[ceiling], 1.0);
        assert_eq!(hitbox.min.y, -100.0);
        assert_eq!(actor.pos.y, -100.0 + 61.0);
    }

    #[test]
    fn slides_along_wall_without_snagging() {
        // Wall to the right; diagonal input should still make vertical progress.
        let wall = rect_at(Vec2::new(40.0, -1000.0), Vec2::new(64.0, 2000.0));
        let (mut actor, mut hitbox) = actor_at(Vec2::ZERO, Vec2::new(1.0, 1.0));
        for _ in 0..10 {
            actor.direction = Vec2::new(1.0, 1.0);
            move_actor(&mut actor, &mut hitbox, &[wall], 0.1);
            assert!(!overlaps(hitbox, wall));
        }
        assert_eq!(hitbox.max.x, 40.0);
        assert!(actor.pos.y > 100.0);
    }
}
