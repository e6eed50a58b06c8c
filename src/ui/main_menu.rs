use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

/// Root of whichever full-screen menu is showing.
#[derive(Component)]
pub struct MenuScreenRoot;

const TITLE: &str = "HARVEST MOONLIGHT";

const INSTRUCTIONS: &[&str] = &[
    "Arrow keys: walk",
    "Space: use tool    Q: switch tool (hoe, axe, watering can)",
    "Left Ctrl: plant seed    E: switch seed (corn, tomato)",
    "Enter at the bed: sleep until tomorrow",
    "Enter at the trader: open the shop",
    "In the shop: arrows to choose, Z to trade, C to chat, Esc to leave",
    "Ripe crops are picked up by walking into them.",
    "Watch out for the troublemaker: every catch costs 10 gold.",
];

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

fn spawn_menu_screen(commands: &mut Commands, title: &str, lines: &[&str], hint: &str) {
    commands
        .spawn((
            MenuScreenRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.08, 0.12, 0.08)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.9, 0.6)),
            ));
            for line in lines {
                parent.spawn((
                    Text::new(*line),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.85, 0.85, 0.85)),
                ));
            }
            parent.spawn((
                Text::new(hint),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.6, 0.6)),
                Node {
                    margin: UiRect::top(Val::Px(24.0)),
                    ..default()
                },
            ));
        });
}

pub fn spawn_start_screen(mut commands: Commands) {
    spawn_menu_screen(
        &mut commands,
        TITLE,
        &["Grow crops, chop wood, sell it all to the trader."],
        "Enter: play    Space: how to play",
    );
}

pub fn spawn_instructions_screen(mut commands: Commands) {
    spawn_menu_screen(&mut commands, "HOW TO PLAY", INSTRUCTIONS, "Esc: back");
}

pub fn spawn_game_over_screen(mut commands: Commands) {
    spawn_menu_screen(
        &mut commands,
        "GAME OVER",
        &["You ran out of money."],
        "Enter: back to the title",
    );
}

pub fn spawn_victory_screen(mut commands: Commands, wallet: Res<PlayerWallet>) {
    let line = format!("You made {} gold.", wallet.money);
    spawn_menu_screen(&mut commands, "VICTORY", &[line.as_str()], "Enter: back to the title");
}

pub fn despawn_menu_screen(mut commands: Commands, query: Query<Entity, With<MenuScreenRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
