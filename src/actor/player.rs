//! Player controller: arrow keys, tools, seeds, interaction zones.

use std::time::Duration;

use bevy::prelude::*;

use super::{Actor, Controller};
use crate::input::FrameInput;
use crate::registry::{overlaps, Hitbox, WorldSprite};
use crate::shared::*;
use crate::world::Zone;

const TOOL_USE_SECS: f32 = 0.35;
const SWITCH_SECS: f32 = 0.2;

/// A once-timer that starts out finished, so the first use is not delayed.
fn ready_timer(secs: f32) -> Timer {
    let mut timer = Timer::from_seconds(secs, TimerMode::Once);
    timer.tick(Duration::from_secs_f32(secs));
    timer
}

/// Selected tool and seed, action cooldowns, and the sleep flag.
#[derive(Component, Debug, Clone)]
pub struct PlayerKit {
    pub tool: Tool,
    pub seed: CropKind,
    /// Set when the player goes to bed; cleared when the fade finishes.
    pub sleeping: bool,
    tool_use: Timer,
    tool_switch: Timer,
    seed_use: Timer,
    seed_switch: Timer,
}

impl Default for PlayerKit {
    fn default() -> Self {
        Self {
            tool: Tool::Hoe,
            seed: CropKind::Corn,
            sleeping: false,
            tool_use: ready_timer(TOOL_USE_SECS),
            tool_switch: ready_timer(SWITCH_SECS),
            seed_use: ready_timer(TOOL_USE_SECS),
            seed_switch: ready_timer(SWITCH_SECS),
        }
    }
}

impl PlayerKit {
    fn tick(&mut self, delta: Duration) {
        for timer in [
            &mut self.tool_use,
            &mut self.tool_switch,
            &mut self.seed_use,
            &mut self.seed_switch,
        ] {
            timer.tick(delta);
        }
    }

    /// Tool or seed animation still playing: no walking.
    pub fn busy(&self) -> bool {
        !self.tool_use.finished() || !self.seed_use.finished()
    }
}

/// Point in front of the actor where tools and seeds land.
pub fn target_point(pos: Vec2, facing: Facing) -> Vec2 {
    let offset = match facing {
        Facing::Left => Vec2::new(-50.0, 40.0),
        Facing::Right => Vec2::new(50.0, 40.0),
        Facing::Up => Vec2::new(0.0, -10.0),
        Facing::Down => Vec2::new(0.0, 50.0),
    };
    pos + offset
}

/// Direction and status from held arrows. Horizontal input decides the
/// facing when both axes are held.
pub fn steer_from_arrows(actor: &mut Actor, input: &FrameInput) {
    let axis = input.arrow_axis();
    let mut facing = actor.status.facing;
    if axis.y < 0.0 {
        facing = Facing::Up;
    } else if axis.y > 0.0 {
        facing = Facing::Down;
    }
    if axis.x > 0.0 {
        facing = Facing::Right;
    } else if axis.x < 0.0 {
        facing = Facing::Left;
    }
    actor.direction = axis;
    actor.status = if axis == Vec2::ZERO {
        ActorStatus::idle(facing)
    } else {
        ActorStatus::moving(facing)
    };
}

/// Held-key handling for the player: movement, tool and seed use, switching.
pub fn drive_player(
    time: Res<Time>,
    input: Res<FrameInput>,
    mut player: Query<(&mut Actor, &mut PlayerKit, &Controller), With<Player>>,
    mut tools: EventWriter<ToolUseEvent>,
    mut seeds: EventWriter<SeedUseEvent>,
) {
    let Ok((mut actor, mut kit, controller)) = player.get_single_mut() else {
        return;
    };
    if *controller != Controller::PlayerInput {
        return;
    }
    kit.tick(time.delta());

    if kit.sleeping || kit.busy() {
        actor.direction = Vec2::ZERO;
        actor.idle();
        return;
    }

    steer_from_arrows(&mut actor, &input);

    if input.held(KeyCode::Space) {
        kit.tool_use.reset();
        actor.direction = Vec2::ZERO;
        actor.frame = 0.0;
        actor.idle();
        tools.send(ToolUseEvent {
            tool: kit.tool,
            target: target_point(actor.pos, actor.status.facing),
        });
    }

    if input.held(KeyCode::KeyQ) && kit.tool_switch.finished() {
        kit.tool_switch.reset();
        kit.tool = kit.tool.next();
        info!("[Player] tool: {:?}", kit.tool);
    }

    if input.held(KeyCode::ControlLeft) && kit.tool_use.finished() {
        kit.seed_use.reset();
        actor.direction = Vec2::ZERO;
        actor.frame = 0.0;
        actor.idle();
        seeds.send(SeedUseEvent {
            crop: kit.seed,
            target: target_point(actor.pos, actor.status.facing),
        });
    }

    if input.held(KeyCode::KeyE) && kit.seed_switch.finished() {
        kit.seed_switch.reset();
        kit.seed = kit.seed.next();
        info!("[Player] seed: {}", kit.seed.name());
    }
}

/// Zone the hitbox currently overlaps, if any. The trader wins over the bed.
pub fn zone_under<'a>(
    hitbox: Rect,
    zones: impl Iterator<Item = (&'a Zone, &'a WorldSprite)>,
) -> Option<Zone> {
    let mut found = None;
    for (zone, sprite) in zones {
        if overlaps(hitbox, sprite.rect) {
            match zone {
                Zone::Trader => return Some(Zone::Trader),
                Zone::Bed => found = Some(Zone::Bed),
            }
        }
    }
    found
}

/// `Enter` inside a zone: open the shop at the trader, go to sleep in bed.
pub fn handle_player_interactions(
    input: Res<FrameInput>,
    mut player: Query<(&mut Actor, &mut PlayerKit, &Hitbox), With<Player>>,
    zones: Query<(&Zone, &WorldSprite)>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !input.just_pressed(KeyCode::Enter) {
        return;
    }
    let Ok((mut actor, mut kit, hitbox)) = player.get_single_mut() else {
        return;
    };
    if kit.sleeping {
        return;
    }

    match zone_under(hitbox.0, zones.iter()) {
        Some(Zone::Trader) => {
            info!("[Player] opening the shop");
            next_state.set(GameState::Shop);
        }
        Some(Zone::Bed) => {
            info!("[Player] going to sleep");
            actor.status = ActorStatus::idle(Facing::Left);
            actor.direction = Vec2::ZERO;
            kit.sleeping = true;
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyPress;

    fn held(keys: &[KeyCode]) -> FrameInput {
        FrameInput {
            presses: keys.iter().map(|k| KeyPress::key(*k)).collect(),
            held: keys.iter().copied().collect(),
        }
    }

    #[test]
    fn target_point_follows_facing() {
        let pos = Vec2::new(100.0, 100.0);
        assert_eq!(target_point(pos, Facing::Left), Vec2::new(50.0, 140.0));
        assert_eq!(target_point(pos, Facing::Right), Vec2::new(150.0, 140.0));
        assert_eq!(target_point(pos, Facing::Up), Vec2::new(100.0, 90.0));
        assert_eq!(target_point(pos, Facing::Down), Vec2::new(100.0, 150.0));
    }

    #[test]
    fn horizontal_arrow_decides_facing() {
        let mut actor = Actor::new(Vec2::ZERO, 200.0, ActorStatus::idle(Facing::Down));
        steer_from_arrows(&mut actor, &held(&[KeyCode::ArrowUp, KeyCode::ArrowLeft]));
        assert_eq!(actor.status, ActorStatus::moving(Facing::Left));
        assert_eq!(actor.direction, Vec2::new(-1.0, -1.0));

        steer_from_arrows(&mut actor, &held(&[]));
        assert_eq!(actor.status, ActorStatus::idle(Facing::Left));
        assert_eq!(actor.direction, Vec2::ZERO);
    }

    #[test]
    fn fresh_kit_is_not_busy() {
        let mut kit = PlayerKit::default();
        assert!(!kit.busy());
        kit.tool_use.reset();
        assert!(kit.busy());
        kit.tick(Duration::from_millis(351));
        assert!(!kit.busy());
    }

    #[test]
    fn trader_wins_over_bed() {
        let sprite = |x: f32| WorldSprite {
            rect: Rect::new(x, 0.0, x + 100.0, 100.0),
            layer: Layer::Main,
            order: 0,
        };
        let bed = sprite(0.0);
        let trader = sprite(50.0);
        let hitbox = Rect::new(60.0, 10.0, 80.0, 50.0);
        let zones = [(&Zone::Bed, &bed), (&Zone::Trader, &trader)];
        assert_eq!(zone_under(hitbox, zones.into_iter()), Some(Zone::Trader));

        let zones = [(&Zone::Bed, &bed)];
        assert_eq!(zone_under(hitbox, zones.into_iter()), Some(Zone::Bed));

        let far = Rect::new(500.0, 500.0, 510.0, 510.0);
        assert_eq!(zone_under(far, [(&Zone::Bed, &bed)].into_iter()), None);
    }
}
