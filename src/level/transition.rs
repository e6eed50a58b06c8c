//! Sleep fade: darken, reset the day at the bottom, brighten, wake up.

use bevy::prelude::*;

use crate::actor::PlayerKit;
use crate::shared::*;

/// Fully lit.
pub const FADE_MAX: f32 = 255.0;
/// Fade units per second.
pub const FADE_SPEED: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStep {
    Fading,
    /// Fully dark. The day reset runs now.
    Midpoint,
    /// Lit again. The player wakes.
    Finished,
}

/// The fade value shared with the overlay: 255 is no darkening, 0 is black.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SleepFade {
    pub value: f32,
    velocity: f32,
}

impl Default for SleepFade {
    fn default() -> Self {
        Self {
            value: FADE_MAX,
            velocity: -FADE_SPEED,
        }
    }
}

impl SleepFade {
    pub fn advance(&mut self, dt: f32) -> FadeStep {
        self.value += self.velocity * dt;
        if self.value <= 0.0 {
            self.value = 0.0;
            self.velocity = FADE_SPEED;
            return FadeStep::Midpoint;
        }
        if self.value > FADE_MAX {
            *self = Self::default();
            return FadeStep::Finished;
        }
        FadeStep::Fading
    }

    /// Overlay opacity in 0..=1.
    pub fn darkness(&self) -> f32 {
        1.0 - self.value / FADE_MAX
    }
}

/// Runs the fade while the player sleeps.
pub fn play_sleep_transition(
    time: Res<Time>,
    mut fade: ResMut<SleepFade>,
    mut player: Query<&mut PlayerKit, With<Player>>,
    mut resets: EventWriter<DayResetEvent>,
) {
    let Ok(mut kit) = player.get_single_mut() else {
        return;
    };
    if !kit.sleeping {
        return;
    }
    match fade.advance(time.delta_secs()) {
        FadeStep::Fading => {}
        FadeStep::Midpoint => {
            info!("[Level] night falls");
            resets.send(DayResetEvent);
        }
        FadeStep::Finished => {
            info!("[Level] good morning");
            kit.sleeping = false;
        }
    }
}
