//! Presentation: camera, menu screens, HUD, shop panel, overlays and
//! ambient audio. Only the windowed binary adds this plugin; the simulation
//! runs without it.

mod audio;
mod hud;
mod main_menu;
mod shop_screen;
mod transitions;

use bevy::prelude::*;
use crate::shared::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<audio::MusicState>();

        // ─── CAMERA + OVERLAYS: always present ───
        app.add_systems(Startup, (spawn_camera, transitions::spawn_overlays));
        app.add_systems(
            Update,
            (transitions::update_sky_overlay, transitions::update_fade).run_if(level_active),
        );
        for state in [GameState::Start, GameState::GameOver, GameState::Victory] {
            app.add_systems(OnEnter(state), transitions::clear_overlays);
        }

        // ─── MENU SCREENS ───
        app.add_systems(OnEnter(GameState::Start), main_menu::spawn_start_screen);
        app.add_systems(OnEnter(GameState::Instructions), main_menu::spawn_instructions_screen);
        app.add_systems(OnEnter(GameState::GameOver), main_menu::spawn_game_over_screen);
        app.add_systems(OnEnter(GameState::Victory), main_menu::spawn_victory_screen);
        for state in [
            GameState::Start,
            GameState::Instructions,
            GameState::GameOver,
            GameState::Victory,
        ] {
            app.add_systems(OnExit(state), main_menu::despawn_menu_screen);
        }

        // ─── HUD: visible while a level is on screen ───
        app.add_systems(OnEnter(GameState::Playing), hud::spawn_hud);
        app.add_systems(OnEnter(GameState::Start), hud::despawn_hud);
        app.add_systems(OnEnter(GameState::GameOver), hud::despawn_hud);
        app.add_systems(OnEnter(GameState::Victory), hud::despawn_hud);
        app.add_systems(
            Update,
            (
                hud::update_gold_display,
                hud::update_inventory_display,
                hud::update_tool_display,
                hud::update_weather_display,
            )
                .run_if(level_active),
        );

        // ─── SHOP ───
        app.add_systems(OnEnter(GameState::Shop), shop_screen::spawn_shop_screen);
        app.add_systems(OnExit(GameState::Shop), shop_screen::despawn_shop_screen);
        app.add_systems(
            Update,
            (shop_screen::update_shop_rows, shop_screen::update_chat_panel)
                .after(LevelSet::Control)
                .run_if(in_state(GameState::Shop)),
        );

        // ─── AUDIO ───
        app.add_systems(
            Update,
            audio::play_ambient
                .after(LevelSet::Ambient)
                .run_if(level_active),
        );
        app.add_systems(OnEnter(GameState::Start), audio::stop_ambient);
        app.add_systems(OnEnter(GameState::GameOver), audio::stop_ambient);
        app.add_systems(OnEnter(GameState::Victory), audio::stop_ambient);
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
