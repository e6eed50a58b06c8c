use bevy::prelude::*;
use crate::level::SleepFade;
use crate::sky::{Sky, DAY_END};

/// Marker for the sky tint overlay.
#[derive(Component)]
pub struct SkyOverlay;

/// Marker for the sleep fade overlay.
#[derive(Component)]
pub struct ScreenFadeOverlay;

/// Strongest sky darkening, as overlay alpha.
const MAX_SKY_ALPHA: f32 = 0.6;

fn full_screen_overlay(z: i32) -> (Node, BackgroundColor, GlobalZIndex, PickingBehavior) {
    (
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::NONE),
        GlobalZIndex(z),
        PickingBehavior::IGNORE,
    )
}

/// Spawn both overlays (always present, transparent until needed).
pub fn spawn_overlays(mut commands: Commands) {
    commands.spawn((SkyOverlay, full_screen_overlay(5)));
    commands.spawn((ScreenFadeOverlay, full_screen_overlay(100)));
}

/// The further the sky has faded from white, the stronger its tint.
pub fn sky_overlay_color(sky: &Sky) -> Color {
    let brightness = |color: Vec3| color.element_sum() / (3.0 * 255.0);
    let darkest = brightness(DAY_END);
    let alpha = (1.0 - brightness(sky.color)) / (1.0 - darkest) * MAX_SKY_ALPHA;
    let c = sky.color / 255.0;
    Color::srgba(c.x, c.y, c.z, alpha.clamp(0.0, MAX_SKY_ALPHA))
}

pub fn update_sky_overlay(
    sky: Res<Sky>,
    mut query: Query<&mut BackgroundColor, With<SkyOverlay>>,
) {
    for mut bg in &mut query {
        *bg = BackgroundColor(sky_overlay_color(&sky));
    }
}

/// Off-level screens show no tint and no fade.
pub fn clear_overlays(
    mut query: Query<&mut BackgroundColor, Or<(With<SkyOverlay>, With<ScreenFadeOverlay>)>>,
) {
    for mut bg in &mut query {
        *bg = BackgroundColor(Color::NONE);
    }
}

/// Black overlay tracking the sleep fade.
pub fn update_fade(
    fade: Res<SleepFade>,
    mut query: Query<&mut BackgroundColor, With<ScreenFadeOverlay>>,
) {
    if !fade.is_changed() {
        return;
    }
    for mut bg in &mut query {
        *bg = BackgroundColor(Color::srgba(0.0, 0.0, 0.0, fade.darkness()));
    }
}
