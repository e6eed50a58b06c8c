use bevy::prelude::*;
use crate::data::GameConfig;
use crate::shared::*;
use crate::shop::chat::VISIBLE_CHAT_LINES;
use crate::shop::{ChatLog, ShopEntry, ShopMenu, ShopMode, Speaker};

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct ShopScreenRoot;

#[derive(Component)]
pub struct ShopListItem {
    pub index: usize,
}

#[derive(Component)]
pub struct ShopItemName {
    pub index: usize,
}

#[derive(Component)]
pub struct ShopItemAmount {
    pub index: usize,
}

#[derive(Component)]
pub struct ShopItemAction {
    pub index: usize,
}

#[derive(Component)]
pub struct ChatPanel;

#[derive(Component)]
pub struct ChatLineText {
    pub slot: usize,
}

#[derive(Component)]
pub struct ChatInputText;

const ROW_COLOR: Color = Color::WHITE;
const ROW_SELECTED_BORDER: Color = Color::BLACK;
const PLAYER_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);
const TRADER_COLOR: Color = Color::srgb(0.4, 0.6, 1.0);

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_shop_screen(mut commands: Commands, menu: Res<ShopMenu>) {
    commands
        .spawn((
            ShopScreenRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            GlobalZIndex(20),
        ))
        .with_children(|root| {
            // Item list
            root.spawn(Node {
                width: Val::Px(400.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(10.0),
                ..default()
            })
            .with_children(|list| {
                for (index, entry) in menu.entries().iter().enumerate() {
                    list.spawn((
                        ShopListItem { index },
                        Node {
                            width: Val::Percent(100.0),
                            flex_direction: FlexDirection::Row,
                            justify_content: JustifyContent::SpaceBetween,
                            align_items: AlignItems::Center,
                            padding: UiRect::axes(Val::Px(20.0), Val::Px(8.0)),
                            border: UiRect::all(Val::Px(4.0)),
                            ..default()
                        },
                        BackgroundColor(ROW_COLOR),
                        BorderColor(Color::NONE),
                        BorderRadius::all(Val::Px(4.0)),
                    ))
                    .with_children(|row| {
                        row.spawn((
                            ShopItemName { index },
                            Text::new(entry.label()),
                            TextFont {
                                font_size: 24.0,
                                ..default()
                            },
                            TextColor(Color::BLACK),
                        ));
                        row.spawn((
                            ShopItemAction { index },
                            Text::new(""),
                            TextFont {
                                font_size: 20.0,
                                ..default()
                            },
                            TextColor(Color::BLACK),
                        ));
                        row.spawn((
                            ShopItemAmount { index },
                            Text::new("0"),
                            TextFont {
                                font_size: 24.0,
                                ..default()
                            },
                            TextColor(Color::BLACK),
                        ));
                    });
                }
            });

            // Chat panel along the bottom edge
            root.spawn((
                ChatPanel,
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Px(150.0),
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(0.0),
                    left: Val::Px(0.0),
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(Val::Px(10.0)),
                    row_gap: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.2, 0.2, 0.2)),
                Visibility::Hidden,
            ))
            .with_children(|panel| {
                for slot in 0..VISIBLE_CHAT_LINES {
                    panel.spawn((
                        ChatLineText { slot },
                        Text::new(""),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                }
                panel.spawn((
                    ChatInputText,
                    Text::new(""),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(Color::BLACK),
                    BackgroundColor(Color::WHITE),
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::all(Val::Px(4.0)),
                        ..default()
                    },
                ));
            });
        });
}

pub fn despawn_shop_screen(mut commands: Commands, query: Query<Entity, With<ShopScreenRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

pub fn update_shop_rows(
    menu: Res<ShopMenu>,
    wallet: Res<PlayerWallet>,
    config: Res<GameConfig>,
    mut rows: Query<(&ShopListItem, &mut BorderColor)>,
    mut amounts: Query<(&ShopItemAmount, &mut Text), Without<ShopItemAction>>,
    mut actions: Query<(&ShopItemAction, &mut Text), Without<ShopItemAmount>>,
) {
    for (row, mut border) in &mut rows {
        border.0 = if row.index == menu.index() {
            ROW_SELECTED_BORDER
        } else {
            Color::NONE
        };
    }
    for (amount, mut text) in &mut amounts {
        if let Some(entry) = menu.entries().get(amount.index) {
            **text = entry.amount(&wallet).to_string();
        }
    }
    for (action, mut text) in &mut actions {
        **text = match menu.entries().get(action.index) {
            Some(entry) if action.index == menu.index() => match entry {
                ShopEntry::Sell(item) => format!("sell ${}", config.economy.sale_price(*item)),
                ShopEntry::Buy(crop) => match config.economy.purchase_price(*crop) {
                    Some(price) => format!("buy ${price}"),
                    None => "not for sale".to_string(),
                },
            },
            _ => String::new(),
        };
    }
}

pub fn update_chat_panel(
    menu: Res<ShopMenu>,
    log: Res<ChatLog>,
    mut panel: Query<&mut Visibility, With<ChatPanel>>,
    mut lines: Query<(&ChatLineText, &mut Text, &mut TextColor), Without<ChatInputText>>,
    mut input: Query<&mut Text, With<ChatInputText>>,
) {
    let chatting = menu.mode == ShopMode::Chatting;
    for mut visibility in &mut panel {
        *visibility = if chatting {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    if !chatting {
        return;
    }

    let visible: Vec<_> = log.visible().collect();
    for (slot, mut text, mut color) in &mut lines {
        match visible.get(slot.slot) {
            Some(line) => {
                **text = format!("{}: {}", line.speaker.label(), line.text);
                color.0 = match line.speaker {
                    Speaker::Player => PLAYER_COLOR,
                    Speaker::Trader => TRADER_COLOR,
                };
            }
            None => text.0.clear(),
        }
    }
    for mut text in &mut input {
        **text = if log.waiting() {
            format!("{}  (the trader is thinking...)", log.input)
        } else {
            format!("{}|", log.input)
        };
    }
}
