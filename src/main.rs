use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use harvest_moonlight::shared::*;
use harvest_moonlight::ui::UiPlugin;
use harvest_moonlight::SimulationPlugins;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Harvest Moonlight".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .add_plugins(SimulationPlugins)
        .add_plugins(UiPlugin)
        .run();
}
