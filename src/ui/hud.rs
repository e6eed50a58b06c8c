use bevy::prelude::*;
use crate::actor::PlayerKit;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS: used to query and update HUD elements
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudGoldText;

#[derive(Component)]
pub struct HudToolText;

#[derive(Component)]
pub struct HudInventoryText;

#[derive(Component)]
pub struct HudWeatherText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

fn hud_text(size: f32, color: Color) -> (TextFont, TextColor) {
    (
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

pub fn spawn_hud(mut commands: Commands, existing: Query<(), With<HudRoot>>) {
    if !existing.is_empty() {
        return;
    }
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
            GlobalZIndex(10),
        ))
        .with_children(|root| {
            // Top row: tool + seed on the left, weather on the right
            root.spawn(Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            })
            .with_children(|row| {
                row.spawn((
                    HudToolText,
                    Text::new(""),
                    hud_text(18.0, Color::WHITE),
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.4)),
                ));
                row.spawn((
                    HudWeatherText,
                    Text::new(""),
                    hud_text(18.0, Color::WHITE),
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.4)),
                ));
            });

            // Bottom row: inventory on the left, gold in the middle
            root.spawn(Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::End,
                ..default()
            })
            .with_children(|row| {
                row.spawn((
                    HudInventoryText,
                    Text::new(""),
                    hud_text(14.0, Color::WHITE),
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.4)),
                ));
                row.spawn((
                    HudGoldText,
                    Text::new(""),
                    hud_text(22.0, Color::BLACK),
                    BackgroundColor(Color::WHITE),
                ));
            });
        });
}

pub fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

pub fn update_gold_display(
    wallet: Res<PlayerWallet>,
    mut query: Query<&mut Text, With<HudGoldText>>,
) {
    for mut text in &mut query {
        **text = format!(" Gold: ${} ", wallet.money);
    }
}

pub fn update_inventory_display(
    wallet: Res<PlayerWallet>,
    mut query: Query<&mut Text, With<HudInventoryText>>,
) {
    if !wallet.is_changed() {
        return;
    }
    let items: Vec<String> = Item::ALL
        .iter()
        .map(|item| format!("{} {}", item.name(), wallet.item_count(*item)))
        .collect();
    let seeds: Vec<String> = CropKind::ALL
        .iter()
        .map(|crop| format!("{} seeds {}", crop.name(), wallet.seed_count(*crop)))
        .collect();
    for mut text in &mut query {
        **text = format!("{}\n{}", items.join("  "), seeds.join("  "));
    }
}

pub fn update_tool_display(
    player: Query<&PlayerKit, With<Player>>,
    mut query: Query<&mut Text, With<HudToolText>>,
) {
    let Ok(kit) = player.get_single() else {
        return;
    };
    for mut text in &mut query {
        **text = format!(" Tool: {:?}   Seed: {} ", kit.tool, kit.seed.name());
    }
}

pub fn update_weather_display(
    weather: Res<Weather>,
    mut query: Query<&mut Text, With<HudWeatherText>>,
) {
    for mut text in &mut query {
        **text = if weather.raining {
            " Rain ".to_string()
        } else {
            " Sunny ".to_string()
        };
    }
}
