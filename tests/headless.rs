//! Headless integration tests for Harvest Moonlight.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register every
//! simulation plugin (skipping all rendering/UI), and drive the keyboard
//! by writing `FrameInput` directly.
//!
//! Run with: `cargo test --test headless`

use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use harvest_moonlight::actor::{Actor, PlayerKit};
use harvest_moonlight::agent::{
    AgentError, ChatAgent, ChatMessage, CompletionBackend, DecisionAgent,
};
use harvest_moonlight::data::GameConfig;
use harvest_moonlight::farming::{SoilGrid, TileCoord};
use harvest_moonlight::input::{FrameInput, KeyPress};
use harvest_moonlight::registry::{Hitbox, WorldSprite};
use harvest_moonlight::shared::*;
use harvest_moonlight::shop::{ChatLog, ShopMenu, ShopMode, Speaker};
use harvest_moonlight::sky::{Sky, DAY_END, DAY_START};
use harvest_moonlight::world::{Tree, Zone};
use harvest_moonlight::SimulationPlugins;

const FRAME: Duration = Duration::from_millis(33);

// ─────────────────────────────────────────────────────────────────────────────
// Test backends
// ─────────────────────────────────────────────────────────────────────────────

/// Always answers with the same text.
struct FixedReply(&'static str);

impl CompletionBackend for FixedReply {
    fn complete(&self, _messages: &[ChatMessage]) -> Result<String, AgentError> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Always fails.
struct Broken;

impl CompletionBackend for Broken {
    fn complete(&self, _messages: &[ChatMessage]) -> Result<String, AgentError> {
        Err(AgentError::Transport("connection refused".into()))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds the simulation with fixed-length frames and no window, assets or
/// audio. The shipped config and map are loaded from disk.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app.add_plugins(SimulationPlugins);
    app
}

fn install_agents(app: &mut App, chat: Arc<dyn CompletionBackend>, decision: Arc<dyn CompletionBackend>) {
    app.insert_resource(ChatAgent::new(chat, "You are a trader.", "Sorry, something went wrong."));
    app.insert_resource(DecisionAgent::new(decision, "odd means rain", true));
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

/// One frame with these keys pressed this frame and held.
fn press(app: &mut App, presses: Vec<KeyPress>) {
    {
        let mut input = app.world_mut().resource_mut::<FrameInput>();
        input.held = presses.iter().map(|p| p.code).collect();
        input.presses = presses;
    }
    app.update();
    app.world_mut().resource_mut::<FrameInput>().clear();
}

fn press_key(app: &mut App, code: KeyCode) {
    press(app, vec![KeyPress::key(code)]);
}

/// Boot to the start screen, silence the pursuer, and start playing.
fn start_playing(app: &mut App) {
    app.update();
    app.update();
    assert_eq!(state(app), GameState::Start, "loading should end on the start screen");

    app.world_mut()
        .resource_mut::<GameConfig>()
        .economy
        .pursuer_penalty = 0;

    press_key(app, KeyCode::Enter);
    app.update();
    assert_eq!(state(app), GameState::Playing);
}

fn player_entity(app: &mut App) -> Entity {
    let mut query = app.world_mut().query_filtered::<Entity, With<Player>>();
    query.single(app.world())
}

fn zone_center(app: &mut App, zone: Zone) -> Vec2 {
    let mut query = app.world_mut().query::<(&Zone, &WorldSprite)>();
    query
        .iter(app.world())
        .find(|(z, _)| **z == zone)
        .map(|(_, sprite)| sprite.rect.center())
        .expect("zone should exist")
}

fn pursuer_entity(app: &mut App) -> Entity {
    let mut query = app.world_mut().query_filtered::<Entity, With<Pursuer>>();
    query.single(app.world())
}

fn place_actor(app: &mut App, entity: Entity, pos: Vec2) {
    let mut actor = app.world_mut().entity_mut(entity);
    actor.get_mut::<Actor>().unwrap().pos = pos;
    let size = actor.get::<Hitbox>().unwrap().0.size();
    actor.get_mut::<Hitbox>().unwrap().0 = Rect::from_center_size(pos, size);
}

fn teleport_player(app: &mut App, pos: Vec2) {
    let entity = player_entity(app);
    place_actor(app, entity, pos);
}

fn money(app: &App) -> i64 {
    app.world().resource::<PlayerWallet>().money
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot and level construction
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_builds_the_level() {
    let mut app = build_test_app();
    start_playing(&mut app);

    let world = app.world_mut();
    assert_eq!(world.query::<&Player>().iter(world).count(), 1);
    assert_eq!(world.query::<&Pursuer>().iter(world).count(), 1);
    assert_eq!(world.query::<&Tree>().iter(world).count(), 3);
    assert_eq!(world.query::<&Zone>().iter(world).count(), 2);

    let wallet = world.resource::<PlayerWallet>();
    assert_eq!(wallet.money, 200);
    assert_eq!(wallet.item_count(Item::Wood), 20);
    assert_eq!(wallet.seed_count(CropKind::Corn), 5);

    let grid = world.resource::<SoilGrid>();
    assert!(grid.cells().any(|(_, cell)| cell.farmable));

    // Disabled agents are installed from the shipped config.
    assert!(!world.resource::<DecisionAgent>().enabled());
    assert!(world.contains_resource::<ChatAgent>());
}

#[test]
fn test_smoke_frames_stay_playing() {
    let mut app = build_test_app();
    start_playing(&mut app);
    for _ in 0..120 {
        app.update();
    }
    assert_eq!(state(&app), GameState::Playing);
}

// ─────────────────────────────────────────────────────────────────────────────
// Actors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_arrow_keys_move_the_player_at_unit_speed() {
    let mut app = build_test_app();
    start_playing(&mut app);

    let entity = player_entity(&mut app);
    let start = app.world().get::<Actor>(entity).unwrap().pos;

    {
        let mut input = app.world_mut().resource_mut::<FrameInput>();
        input.held.insert(KeyCode::ArrowRight);
        input.held.insert(KeyCode::ArrowDown);
    }
    for _ in 0..10 {
        app.update();
    }
    app.world_mut().resource_mut::<FrameInput>().clear();

    let actor = *app.world().get::<Actor>(entity).unwrap();
    let travelled = actor.pos - start;
    assert!(travelled.x > 0.0 && travelled.y > 0.0);
    // Ten frames at 200 px/s, never faster along the diagonal.
    assert!(travelled.length() <= 200.0 * 0.33 + 1.0, "travelled {travelled:?}");
    assert!(actor.direction == Vec2::ZERO || (actor.direction.length() - 1.0).abs() < 1e-4);
}

#[test]
fn test_pursuer_closes_in_on_the_player() {
    let mut app = build_test_app();
    start_playing(&mut app);

    let player = player_entity(&mut app);
    let player_pos = app.world().get::<Actor>(player).unwrap().pos;
    let pursuer = {
        let mut query = app.world_mut().query_filtered::<Entity, With<Pursuer>>();
        query.single(app.world())
    };
    app.world_mut().get_mut::<Actor>(pursuer).unwrap().pos = player_pos + Vec2::new(300.0, 0.0);
    let before = 300.0;

    for _ in 0..15 {
        app.update();
    }
    let after = app.world().get::<Actor>(pursuer).unwrap().pos.distance(player_pos);
    assert!(after < before, "pursuer should approach: {after}");
}

#[test]
fn test_pursuer_charges_once_per_contact() {
    let mut app = build_test_app();
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::Start);
    let penalty = app.world().resource::<GameConfig>().economy.pursuer_penalty;
    assert!(penalty > 0);

    press_key(&mut app, KeyCode::Enter);
    app.update();
    assert_eq!(state(&app), GameState::Playing);

    // The pursuer spawns on top of the player; that is not a catch.
    for _ in 0..5 {
        app.update();
    }
    assert_eq!(money(&app), 200);

    let player = player_entity(&mut app);
    let pursuer = pursuer_entity(&mut app);
    let home = app.world().get::<Actor>(player).unwrap().pos;

    place_actor(&mut app, pursuer, home + Vec2::new(300.0, 0.0));
    app.update();
    assert_eq!(money(&app), 200);

    place_actor(&mut app, pursuer, home);
    app.update();
    assert_eq!(money(&app), 200 - penalty);

    // Staying in contact costs nothing more.
    for _ in 0..5 {
        app.update();
    }
    assert_eq!(money(&app), 200 - penalty);

    place_actor(&mut app, pursuer, home + Vec2::new(300.0, 0.0));
    app.update();
    place_actor(&mut app, pursuer, home);
    app.update();
    assert_eq!(money(&app), 200 - 2 * penalty);
}

// ─────────────────────────────────────────────────────────────────────────────
// Farming
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_ripe_plant_under_the_player_is_harvested() {
    let mut app = build_test_app();
    start_playing(&mut app);

    let entity = player_entity(&mut app);
    let pos = app.world().get::<Actor>(entity).unwrap().pos;
    let coord = TileCoord::from_world(pos).unwrap();
    {
        let mut grid = app.world_mut().resource_mut::<SoilGrid>();
        grid.set_farmable(coord);
        let centre = coord.rect().center();
        assert!(grid.till(centre));
        assert!(grid.plant(centre, CropKind::Tomato));
        for _ in 0..3 {
            grid.water_all();
            grid.advance_growth();
        }
    }
    let before = app.world().resource::<PlayerWallet>().item_count(Item::Tomato);
    app.update();

    let wallet = app.world().resource::<PlayerWallet>();
    assert_eq!(wallet.item_count(Item::Tomato), before + 1);
    let grid = app.world().resource::<SoilGrid>();
    assert!(grid.cell(coord).unwrap().plant.is_none());
    assert!(grid.cell(coord).unwrap().tilled);
}

// ─────────────────────────────────────────────────────────────────────────────
// Shop
// ─────────────────────────────────────────────────────────────────────────────

fn open_shop(app: &mut App) {
    let trader = zone_center(app, Zone::Trader);
    teleport_player(app, trader);
    press_key(app, KeyCode::Enter);
    app.update();
    assert_eq!(state(app), GameState::Shop);
}

#[test]
fn test_shop_sells_and_buys_and_freezes_the_world() {
    let mut app = build_test_app();
    start_playing(&mut app);
    open_shop(&mut app);

    let entity = player_entity(&mut app);
    let frozen = app.world().get::<Actor>(entity).unwrap().pos;

    // Row 0 is wood: sells for 4.
    press_key(&mut app, KeyCode::KeyZ);
    assert_eq!(money(&app), 204);
    assert_eq!(app.world().resource::<PlayerWallet>().item_count(Item::Wood), 19);

    // Walk down to corn seeds (row 4), waiting out the repeat delay before
    // every press.
    let wait_out_cooldown = |app: &mut App| {
        for _ in 0..7 {
            app.update();
        }
    };
    for _ in 0..4 {
        wait_out_cooldown(&mut app);
        press_key(&mut app, KeyCode::ArrowDown);
    }
    assert_eq!(app.world().resource::<ShopMenu>().index(), 4);
    wait_out_cooldown(&mut app);
    press_key(&mut app, KeyCode::KeyZ);
    assert_eq!(money(&app), 200);
    assert_eq!(app.world().resource::<PlayerWallet>().seed_count(CropKind::Corn), 6);

    // Arrow keys drive the menu, not the player.
    assert_eq!(app.world().get::<Actor>(entity).unwrap().pos, frozen);

    press_key(&mut app, KeyCode::Escape);
    app.update();
    assert_eq!(state(&app), GameState::Playing);
}

#[test]
fn test_chat_round_trip_and_exit_resets_mode() {
    let mut app = build_test_app();
    install_agents(&mut app, Arc::new(FixedReply("Corn is 4 gold.")), Arc::new(Broken));
    start_playing(&mut app);
    open_shop(&mut app);

    press_key(&mut app, KeyCode::KeyC);
    assert_eq!(app.world().resource::<ShopMenu>().mode, ShopMode::Chatting);

    press(
        &mut app,
        vec![
            KeyPress::character(KeyCode::KeyH, "h"),
            KeyPress::character(KeyCode::KeyI, "i"),
            KeyPress::character(KeyCode::KeyX, "x"),
        ],
    );
    press_key(&mut app, KeyCode::Backspace);
    assert_eq!(app.world().resource::<ChatLog>().input, "hi");

    press_key(&mut app, KeyCode::Enter);
    for _ in 0..200 {
        if !app.world().resource::<ChatLog>().waiting() {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
        app.update();
    }

    let log = app.world().resource::<ChatLog>();
    let lines: Vec<_> = log.lines().cloned().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].speaker, Speaker::Player);
    assert_eq!(lines[0].text, "hi");
    assert_eq!(lines[1].speaker, Speaker::Trader);
    assert_eq!(lines[1].text, "Corn is 4 gold.");
    assert!(log.input.is_empty());
    assert_eq!(app.world().resource::<ChatAgent>().conversation().len(), 3);

    // Enter while chatting sends, it does not leave; Esc leaves chat, then
    // the shop.
    press_key(&mut app, KeyCode::Escape);
    assert_eq!(app.world().resource::<ShopMenu>().mode, ShopMode::Navigating);
    press_key(&mut app, KeyCode::KeyC);
    press_key(&mut app, KeyCode::Escape);
    press_key(&mut app, KeyCode::Escape);
    app.update();
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(app.world().resource::<ShopMenu>().mode, ShopMode::Navigating);
}

// ─────────────────────────────────────────────────────────────────────────────
// Sleep and day reset
// ─────────────────────────────────────────────────────────────────────────────

fn sleep_through_the_night(app: &mut App) {
    let bed = zone_center(app, Zone::Bed);
    teleport_player(app, bed);
    press_key(app, KeyCode::Enter);
    let entity = player_entity(app);
    assert!(app.world().get::<PlayerKit>(entity).unwrap().sleeping);

    // 255 down and back up at 120/s is about 4.3 s.
    for _ in 0..200 {
        app.update();
        if !app.world().get::<PlayerKit>(entity).unwrap().sleeping {
            return;
        }
    }
    panic!("player never woke up");
}

#[test]
fn test_sleeping_grows_watered_crops_and_resets_the_sky() {
    let mut app = build_test_app();
    install_agents(&mut app, Arc::new(Broken), Arc::new(FixedReply("1")));
    start_playing(&mut app);

    let coord = {
        let grid = app.world().resource::<SoilGrid>();
        grid.cells()
            .find(|(_, cell)| cell.farmable)
            .map(|(coord, _)| coord)
            .unwrap()
    };
    {
        let mut grid = app.world_mut().resource_mut::<SoilGrid>();
        let centre = coord.rect().center();
        assert!(grid.till(centre));
        grid.water(centre);
        assert!(grid.plant(centre, CropKind::Corn));
    }
    app.world_mut().resource_mut::<Sky>().color = Vec3::new(100.0, 120.0, 200.0);

    sleep_through_the_night(&mut app);

    let grid = app.world().resource::<SoilGrid>();
    assert_eq!(grid.cell(coord).unwrap().plant.unwrap().stage, 1);
    // The decision agent answered 1: rain, so every tilled tile is wet again.
    assert!(app.world().resource::<Weather>().raining);
    assert!(grid.raining);
    assert!(grid.cell(coord).unwrap().watered);
    // Reset to white at midnight, then about two seconds of fading.
    assert!(app.world().resource::<Sky>().color.x > 240.0);
}

#[test]
fn test_failed_weather_decision_keeps_the_weather() {
    let mut app = build_test_app();
    install_agents(&mut app, Arc::new(Broken), Arc::new(Broken));
    start_playing(&mut app);

    let before = *app.world().resource::<Weather>();
    sleep_through_the_night(&mut app);
    assert_eq!(*app.world().resource::<Weather>(), before);
    assert_eq!(state(&app), GameState::Playing);
}

// ─────────────────────────────────────────────────────────────────────────────
// Session outcome
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_victory_then_back_to_start_tears_the_level_down() {
    let mut app = build_test_app();
    start_playing(&mut app);

    app.world_mut().resource_mut::<PlayerWallet>().money = 11_001;
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::Victory);

    press_key(&mut app, KeyCode::Enter);
    app.update();
    assert_eq!(state(&app), GameState::Start);

    let world = app.world_mut();
    assert_eq!(world.query::<&Player>().iter(world).count(), 0);
    assert_eq!(world.query::<&WorldSprite>().iter(world).count(), 0);
}

#[test]
fn test_running_out_of_money_ends_the_game() {
    let mut app = build_test_app();
    start_playing(&mut app);

    app.world_mut().resource_mut::<PlayerWallet>().money = 99;
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::GameOver);

    // A fresh run starts with a fresh wallet.
    press_key(&mut app, KeyCode::Enter);
    app.update();
    press_key(&mut app, KeyCode::Enter);
    app.update();
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(money(&app), 200);
}

#[test]
fn test_new_run_starts_under_a_white_sky() {
    let mut app = build_test_app();
    start_playing(&mut app);

    app.world_mut().resource_mut::<Sky>().color = DAY_END;
    app.world_mut().resource_mut::<PlayerWallet>().money = 99;
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::GameOver);

    press_key(&mut app, KeyCode::Enter);
    app.update();
    assert_eq!(state(&app), GameState::Start);
    assert_eq!(app.world().resource::<Sky>().color, DAY_START);

    press_key(&mut app, KeyCode::Enter);
    app.update();
    assert_eq!(state(&app), GameState::Playing);
    let sky = app.world().resource::<Sky>().color;
    assert!(sky.min_element() > 254.0, "sky {sky:?}");
}

#[test]
fn test_instructions_screen_round_trip() {
    let mut app = build_test_app();
    app.update();
    app.update();
    press_key(&mut app, KeyCode::Space);
    app.update();
    assert_eq!(state(&app), GameState::Instructions);
    press_key(&mut app, KeyCode::Escape);
    app.update();
    assert_eq!(state(&app), GameState::Start);
}
