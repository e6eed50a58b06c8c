//! Camera and layered renderer.
//!
//! The view offset follows the player's centre every frame with no
//! smoothing. Drawing sorts every visible sprite by layer, then by the
//! vertical centre of its rect, then by registration order, and blits them
//! back to front onto a [`Canvas`]. The Bevy canvas turns blits into sprite
//! transforms whose z encodes the draw order.

use std::cmp::Ordering;

use bevy::prelude::*;

use crate::registry::{Group, Groups, WorldSprite};
use crate::shared::*;

/// z distance between consecutive blits.
const DEPTH_STEP: f32 = 0.01;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraView {
    /// Map-pixel position of the viewport's top-left corner.
    pub offset: Vec2,
}

/// Offset that centres `center` in a viewport of the given size.
pub fn compute_offset(center: Vec2, viewport: Vec2) -> Vec2 {
    center - viewport / 2.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub entity: Entity,
    pub rect: Rect,
    pub layer: Layer,
    pub order: u64,
}

impl DrawItem {
    fn cmp_draw(&self, other: &Self) -> Ordering {
        self.layer
            .cmp(&other.layer)
            .then_with(|| self.rect.center().y.total_cmp(&other.rect.center().y))
            .then_with(|| self.order.cmp(&other.order))
    }
}

/// Back to front: layer, then vertical centre, then registration order.
pub fn sort_for_drawing(items: &mut [DrawItem]) {
    items.sort_by(DrawItem::cmp_draw);
}

/// One draw call: `screen` is the sprite rect in viewport pixels, `depth`
/// its position in the back-to-front sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blit {
    pub entity: Entity,
    pub screen: Rect,
    pub depth: usize,
}

pub trait Canvas {
    fn blit(&mut self, blit: Blit);
}

/// Records blits in order.
impl Canvas for Vec<Blit> {
    fn blit(&mut self, blit: Blit) {
        self.push(blit);
    }
}

/// Sort `items` and blit them with the camera offset applied.
pub fn draw(items: &mut [DrawItem], offset: Vec2, canvas: &mut impl Canvas) {
    sort_for_drawing(items);
    for (depth, item) in items.iter().enumerate() {
        canvas.blit(Blit {
            entity: item.entity,
            screen: Rect::from_corners(item.rect.min - offset, item.rect.max - offset),
            depth,
        });
    }
}

/// Viewport pixels (origin top-left, y down) to a Bevy translation (origin
/// centre, y up).
pub fn screen_to_translation(screen: Rect, depth: usize) -> Vec3 {
    let center = screen.center();
    Vec3::new(
        center.x - SCREEN_WIDTH / 2.0,
        SCREEN_HEIGHT / 2.0 - center.y,
        depth as f32 * DEPTH_STEP,
    )
}

pub fn track_camera(
    player: Query<&WorldSprite, With<Player>>,
    mut view: ResMut<CameraView>,
) {
    if let Ok(sprite) = player.get_single() {
        view.offset = compute_offset(sprite.rect.center(), viewport());
    }
}

pub fn draw_world(
    view: Res<CameraView>,
    mut sprites: Query<(Entity, &WorldSprite, &Groups, &mut Transform)>,
) {
    let mut items: Vec<DrawItem> = sprites
        .iter()
        .filter(|(_, _, groups, _)| groups.contains(Group::All))
        .map(|(entity, sprite, _, _)| DrawItem {
            entity,
            rect: sprite.rect,
            layer: sprite.layer,
            order: sprite.order,
        })
        .collect();

    let mut frame: Vec<Blit> = Vec::with_capacity(items.len());
    draw(&mut items, view.offset, &mut frame);

    for blit in frame {
        if let Ok((_, _, _, mut transform)) = sprites.get_mut(blit.entity) {
            transform.translation = screen_to_translation(blit.screen, blit.depth);
        }
    }
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraView>().add_systems(
            Update,
            (track_camera, draw_world)
                .chain()
                .in_set(LevelSet::Render)
                .run_if(level_active),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, layer: Layer, center_y: f32, order: u64) -> DrawItem {
        DrawItem {
            entity: Entity::from_raw(id),
            rect: Rect::from_center_size(Vec2::new(0.0, center_y), Vec2::splat(10.0)),
            layer,
            order,
        }
    }

    #[test]
    fn offset_centres_the_target() {
        let offset = compute_offset(Vec2::new(1000.0, 500.0), viewport());
        assert_eq!(offset, Vec2::new(360.0, 140.0));
    }

    #[test]
    fn layer_beats_height_and_height_beats_order() {
        let mut items = vec![
            item(0, Layer::Main, 50.0, 0),
            item(1, Layer::Ground, 900.0, 1),
            item(2, Layer::Main, 10.0, 2),
            item(3, Layer::Fruit, -5.0, 3),
        ];
        sort_for_drawing(&mut items);
        let ids: Vec<u32> = items.iter().map(|i| i.entity.index()).collect();
        assert_eq!(ids, vec![1, 2, 0, 3]);
    }

    #[test]
    fn ties_break_on_registration_order() {
        let mut items = vec![
            item(7, Layer::Main, 20.0, 9),
            item(8, Layer::Main, 20.0, 3),
            item(9, Layer::Main, 20.0, 5),
        ];
        sort_for_drawing(&mut items);
        let orders: Vec<u64> = items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![3, 5, 9]);
    }

    #[test]
    fn draw_applies_offset_and_leaves_items_alone() {
        let original = vec![item(1, Layer::Main, 100.0, 0), item(2, Layer::Water, 100.0, 1)];
        let mut items = original.clone();
        let mut canvas: Vec<Blit> = Vec::new();
        draw(&mut items, Vec2::new(10.0, 20.0), &mut canvas);

        assert_eq!(canvas.len(), 2);
        assert_eq!(canvas[0].entity, Entity::from_raw(2));
        assert_eq!(canvas[0].depth, 0);
        assert_eq!(canvas[1].screen.center(), Vec2::new(-10.0, 80.0));
        // Same rects, only reordered.
        for drawn in &items {
            assert!(original.contains(drawn));
        }
    }

    #[test]
    fn screen_centre_maps_to_origin() {
        let rect = Rect::from_center_size(viewport() / 2.0, Vec2::splat(4.0));
        assert_eq!(screen_to_translation(rect, 0), Vec3::ZERO);
    }
}
