//! Short-lived pop particles left behind by harvests and axe hits.

use std::time::Duration;

use bevy::prelude::*;

use crate::registry::*;
use crate::shared::*;

pub const POP_LIFETIME: Duration = Duration::from_millis(200);

const POP_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.9);

/// Despawns itself once its timer runs out.
#[derive(Component, Debug, Clone)]
pub struct Lifetime(pub Timer);

impl Lifetime {
    pub fn new(duration: Duration) -> Self {
        Self(Timer::new(duration, TimerMode::Once))
    }
}

pub fn spawn_pop_particles(
    mut commands: Commands,
    mut events: EventReader<PopParticleEvent>,
    mut registry: ResMut<SpriteRegistry>,
) {
    for event in events.read() {
        let registration = Registration::new(event.rect, Layer::Main, &[Group::All], Look::Color(POP_COLOR));
        registry
            .register(&mut commands, None, registration)
            .insert(Lifetime::new(POP_LIFETIME));
    }
}

/// Tick every lifetime and despawn the expired. Frozen while the shop is open.
pub fn expire_lifetimes(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Lifetime)>,
) {
    for (entity, mut lifetime) in &mut query {
        lifetime.0.tick(time.delta());
        if lifetime.0.finished() {
            destroy(&mut commands, entity);
        }
    }
}
