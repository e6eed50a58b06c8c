//! Level orchestration: the per-frame order of the level update, the sleep
//! fade and the day reset.
//!
//! Every domain files its level systems under a [`LevelSet`]. This plugin
//! chains the sets so one frame runs: pursuer tracking, camera and draw,
//! actor and ambient advance, auto-harvest, player or shop input, ambient
//! track selection, sleep transition, then the money check.

use bevy::prelude::*;

use crate::shared::*;

pub mod reset;
pub mod transition;

pub use transition::SleepFade;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                LevelSet::Track,
                LevelSet::Render,
                LevelSet::Advance,
                LevelSet::Harvest,
                LevelSet::Control,
                LevelSet::Ambient,
                LevelSet::Transition,
                LevelSet::Evaluate,
            )
                .chain(),
        )
        .init_resource::<SleepFade>()
        .add_systems(OnEnter(GameState::Start), reset_fade)
        .add_systems(
            Update,
            (transition::play_sleep_transition, reset::run_day_reset)
                .chain()
                .in_set(LevelSet::Transition)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

fn reset_fade(mut fade: ResMut<SleepFade>) {
    *fade = SleepFade::default();
}
