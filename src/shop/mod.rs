//! Shop domain: the trader's menu and chat.
//!
//! While `GameState::Shop` is active this plugin owns the keyboard. The world
//! stays on screen but frozen.

use bevy::prelude::*;

use crate::agent::ChatAgent;
use crate::data::GameConfig;
use crate::input::FrameInput;
use crate::shared::*;

pub mod chat;
pub mod menu;

pub use chat::{ChatLog, Speaker};
pub use menu::{ShopEntry, ShopMenu, ShopMode, Trade};

fn log_trade(trade: Trade) {
    match trade {
        Trade::Sold { item, price } => info!("[Shop] sold 1 {} for {}", item.name(), price),
        Trade::Bought { crop, price } => {
            info!("[Shop] bought 1 {} seed for {}", crop.name(), price)
        }
    }
}

/// Discrete key presses first (leave, chat, typing), then held-key
/// navigation.
#[allow(clippy::too_many_arguments)]
pub fn handle_shop_input(
    time: Res<Time>,
    input: Res<FrameInput>,
    config: Res<GameConfig>,
    mut menu: ResMut<ShopMenu>,
    mut log: ResMut<ChatLog>,
    mut wallet: ResMut<PlayerWallet>,
    mut agent: Option<ResMut<ChatAgent>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for press in &input.presses {
        match menu.mode {
            ShopMode::Navigating => match press.code {
                KeyCode::Enter | KeyCode::Escape => {
                    info!("[Shop] closing the shop");
                    next_state.set(GameState::Playing);
                    return;
                }
                KeyCode::KeyC => {
                    menu.enter_chat();
                    log.input.clear();
                }
                _ => {}
            },
            ShopMode::Chatting => match press.code {
                KeyCode::Escape => menu.leave_chat(),
                KeyCode::Enter => {
                    if let Some(line) = log.take_input() {
                        chat::submit_line(&mut log, agent.as_deref_mut(), &config, line);
                    }
                }
                KeyCode::Backspace => log.backspace(),
                _ => {
                    if let Some(text) = &press.text {
                        log.type_text(text);
                    }
                }
            },
        }
    }

    if let Some(trade) = menu.navigate(time.delta(), &input, &mut wallet, &config.economy) {
        log_trade(trade);
    }
}

/// Leaving the shop always drops back to navigation.
fn close_chat(mut menu: ResMut<ShopMenu>) {
    menu.leave_chat();
}

/// Fresh menu and chat for every run.
fn reset_shop(mut menu: ResMut<ShopMenu>, mut log: ResMut<ChatLog>) {
    *menu = ShopMenu::default();
    *log = ChatLog::default();
}

pub struct ShopPlugin;

impl Plugin for ShopPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ShopMenu>()
            .init_resource::<ChatLog>()
            .add_systems(OnExit(GameState::Shop), close_chat)
            .add_systems(OnEnter(GameState::Start), reset_shop)
            .add_systems(
                Update,
                handle_shop_input
                    .in_set(LevelSet::Control)
                    .run_if(in_state(GameState::Shop)),
            )
            .add_systems(
                Update,
                chat::poll_chat_reply
                    .in_set(LevelSet::Control)
                    .after(handle_shop_input)
                    .run_if(level_active),
            );
    }
}
