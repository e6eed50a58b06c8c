//! The day reset, run once at the bottom of the sleep fade.

use bevy::prelude::*;
use rand::Rng;

use crate::agent::DecisionAgent;
use crate::data::GameConfig;
use crate::farming::SoilGrid;
use crate::shared::*;
use crate::sky::Sky;
use crate::world::setup::roll_rain;

/// Grow watered plants, dry the soil, then apply the new weather. Rain waters
/// every tilled tile straight away. Returns how many plants grew.
pub fn reset_soil(grid: &mut SoilGrid, raining: bool) -> usize {
    let grown = grid.advance_growth();
    grid.remove_water();
    grid.raining = raining;
    if raining {
        grid.water_all();
    }
    grown
}

/// Tomorrow's weather. With an enabled decision agent the agent decides from
/// the player's money; when it fails the weather stays as it was. Otherwise
/// the dice decide.
pub fn next_weather(
    current: bool,
    money: i64,
    rain_chance: f64,
    agent: Option<&mut DecisionAgent>,
    rng: &mut impl Rng,
) -> bool {
    match agent {
        Some(agent) if agent.enabled() => match agent.decide(money) {
            Ok(raining) => raining,
            Err(err) => {
                warn!("[Level] weather decision failed, keeping current weather: {err}");
                current
            }
        },
        _ => roll_rain(rain_chance, rng),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run_day_reset(
    mut resets: EventReader<DayResetEvent>,
    config: Res<GameConfig>,
    wallet: Res<PlayerWallet>,
    mut grid: ResMut<SoilGrid>,
    mut weather: ResMut<Weather>,
    mut sky: ResMut<Sky>,
    mut agent: Option<ResMut<DecisionAgent>>,
) {
    if resets.read().count() == 0 {
        return;
    }
    let mut rng = rand::thread_rng();
    weather.raining = next_weather(
        weather.raining,
        wallet.money,
        config.rain_chance,
        agent.as_deref_mut(),
        &mut rng,
    );
    let grown = reset_soil(&mut grid, weather.raining);
    sky.reset();
    info!(
        "[Level] new day: {} plants grew, raining: {}",
        grown, weather.raining
    );
}
