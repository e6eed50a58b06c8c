//! Sky tint, rain, and ambient track selection.

use bevy::prelude::*;

use crate::shared::*;

pub mod rain;

/// Colour the sky starts each day with.
pub const DAY_START: Vec3 = Vec3::new(255.0, 255.0, 255.0);
/// Colour the sky settles on by evening.
pub const DAY_END: Vec3 = Vec3::new(38.0, 101.0, 189.0);
/// Channel decay per second.
const FADE_PER_SEC: f32 = 2.0;

/// Multiplicative tint over the world, in 0–255 channels.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Sky {
    pub color: Vec3,
}

impl Default for Sky {
    fn default() -> Self {
        Self { color: DAY_START }
    }
}

impl Sky {
    /// Decay every channel still above its evening value.
    pub fn advance(&mut self, dt: f32) {
        let step = FADE_PER_SEC * dt;
        for i in 0..3 {
            if self.color[i] > DAY_END[i] {
                self.color[i] = (self.color[i] - step).max(DAY_END[i]);
            }
        }
    }

    pub fn reset(&mut self) {
        self.color = DAY_START;
    }

    pub fn tint(&self) -> Color {
        let c = self.color / 255.0;
        Color::srgb(c.x, c.y, c.z)
    }
}

/// The ambient loop that should be playing.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveAmbient(pub AmbientTrack);

impl Default for ActiveAmbient {
    fn default() -> Self {
        Self(AmbientTrack::Day)
    }
}

fn advance_sky(time: Res<Time>, mut sky: ResMut<Sky>) {
    sky.advance(time.delta_secs());
}

/// Every run starts under a white sky.
fn reset_sky(mut sky: ResMut<Sky>) {
    sky.reset();
}

pub fn select_ambient(weather: Res<Weather>, mut active: ResMut<ActiveAmbient>) {
    let track = weather.ambient();
    if active.0 != track {
        info!("[Sky] ambient track: {:?}", track);
        active.0 = track;
    }
}

pub struct SkyPlugin;

impl Plugin for SkyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Sky>()
            .init_resource::<ActiveAmbient>()
            .add_systems(OnEnter(GameState::Start), reset_sky)
            .add_systems(
                Update,
                advance_sky.in_set(LevelSet::Advance).run_if(level_active),
            )
            .add_systems(
                Update,
                (rain::spawn_rain, rain::fall_rain)
                    .chain()
                    .in_set(LevelSet::Advance)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                select_ambient.in_set(LevelSet::Ambient).run_if(level_active),
            );
    }
}
