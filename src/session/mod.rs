//! Session flow: start screen, instructions, and the money thresholds that
//! end a run.

use bevy::prelude::*;

use crate::data::config::SessionConfig;
use crate::data::GameConfig;
use crate::input::FrameInput;
use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    GameOver,
}

/// Victory is checked before loss, so at most one outcome per frame.
pub fn evaluate(money: i64, session: &SessionConfig) -> Option<Outcome> {
    if money > session.victory_threshold {
        Some(Outcome::Victory)
    } else if money < session.loss_threshold {
        Some(Outcome::GameOver)
    } else {
        None
    }
}

fn check_outcome(
    wallet: Res<PlayerWallet>,
    config: Res<GameConfig>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    match evaluate(wallet.money, &config.session) {
        Some(Outcome::Victory) => {
            info!("[Session] victory with {} gold", wallet.money);
            next_state.set(GameState::Victory);
        }
        Some(Outcome::GameOver) => {
            info!("[Session] game over with {} gold", wallet.money);
            next_state.set(GameState::GameOver);
        }
        None => {}
    }
}

fn start_screen_input(input: Res<FrameInput>, mut next_state: ResMut<NextState<GameState>>) {
    if input.just_pressed(KeyCode::Enter) {
        next_state.set(GameState::Playing);
    } else if input.just_pressed(KeyCode::Space) {
        next_state.set(GameState::Instructions);
    }
}

fn instructions_input(input: Res<FrameInput>, mut next_state: ResMut<NextState<GameState>>) {
    if input.just_pressed(KeyCode::Escape) {
        next_state.set(GameState::Start);
    }
}

fn end_screen_input(input: Res<FrameInput>, mut next_state: ResMut<NextState<GameState>>) {
    if input.just_pressed(KeyCode::Enter) {
        next_state.set(GameState::Start);
    }
}

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            check_outcome
                .in_set(LevelSet::Evaluate)
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            Update,
            (
                start_screen_input.run_if(in_state(GameState::Start)),
                instructions_input.run_if(in_state(GameState::Instructions)),
                end_screen_input
                    .run_if(in_state(GameState::GameOver).or(in_state(GameState::Victory))),
            ),
        );
    }
}
