//! Sprite registry: group membership and draw metadata for world entities.
//!
//! Every renderable or collidable object is spawned through
//! [`SpriteRegistry::register`]. Membership in the `all`, `collidable`,
//! `tree` and `interactable` groups is an explicit tag set on the entity, so
//! systems filter by tag instead of by type. Despawning an entity removes it
//! from every group at once.

use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;

use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// Drawn by the camera.
    All,
    /// Blocks actor movement.
    Collidable,
    Tree,
    Interactable,
}

impl Group {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Non-exclusive set of [`Group`] tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupSet(u8);

impl GroupSet {
    pub const EMPTY: GroupSet = GroupSet(0);

    pub fn of(groups: &[Group]) -> Self {
        groups.iter().fold(Self::EMPTY, |set, g| set.with(*g))
    }

    pub fn with(self, group: Group) -> Self {
        Self(self.0 | group.bit())
    }

    pub fn without(self, group: Group) -> Self {
        Self(self.0 & !group.bit())
    }

    pub fn contains(self, group: Group) -> bool {
        self.0 & group.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Group membership of a registered entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Groups(pub GroupSet);

impl Groups {
    pub fn contains(&self, group: Group) -> bool {
        self.0.contains(group)
    }
}

/// World-space bounding rect (y grows downward, map pixels), draw layer and
/// registration order. The order is the final draw tie-break.
#[derive(Component, Debug, Clone, Copy)]
pub struct WorldSprite {
    pub rect: Rect,
    pub layer: Layer,
    pub order: u64,
}

/// Collision rect. Usually a shrunken copy of the sprite rect.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hitbox(pub Rect);

/// How a registered entity looks before any animation takes over.
#[derive(Debug, Clone)]
pub enum Look {
    Image(String),
    Color(Color),
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub rect: Rect,
    pub layer: Layer,
    pub groups: GroupSet,
    pub hitbox: Option<Rect>,
    pub look: Look,
}

impl Registration {
    pub fn new(rect: Rect, layer: Layer, groups: &[Group], look: Look) -> Self {
        Self {
            rect,
            layer,
            groups: GroupSet::of(groups),
            hitbox: None,
            look,
        }
    }

    pub fn with_hitbox(mut self, hitbox: Rect) -> Self {
        self.hitbox = Some(hitbox);
        self
    }
}

/// Hands out registration order numbers.
#[derive(Resource, Debug, Default)]
pub struct SpriteRegistry {
    next_order: u64,
}

/// Colour used when an image is requested but no asset server is running
/// (headless tests, tools).
const PLACEHOLDER_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);

impl SpriteRegistry {
    /// Spawn an entity with its sprite, draw metadata and group tags.
    pub fn register<'a>(
        &mut self,
        commands: &'a mut Commands,
        assets: Option<&AssetServer>,
        registration: Registration,
    ) -> EntityCommands<'a> {
        let order = self.next_order;
        self.next_order += 1;

        let size = registration.rect.size();
        let sprite = match (&registration.look, assets) {
            (Look::Image(path), Some(assets)) => Sprite {
                image: assets.load(path.clone()),
                custom_size: Some(size),
                ..default()
            },
            (Look::Image(_), None) => Sprite {
                color: PLACEHOLDER_COLOR,
                custom_size: Some(size),
                ..default()
            },
            (Look::Color(color), _) => Sprite {
                color: *color,
                custom_size: Some(size),
                ..default()
            },
        };

        let visibility = if registration.groups.contains(Group::All) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };

        let mut entity = commands.spawn((
            WorldSprite {
                rect: registration.rect,
                layer: registration.layer,
                order,
            },
            Groups(registration.groups),
            sprite,
            Transform::default(),
            visibility,
        ));
        if let Some(hitbox) = registration.hitbox {
            entity.insert(Hitbox(hitbox));
        }
        entity
    }

    /// Number of registrations handed out so far.
    pub fn registered(&self) -> u64 {
        self.next_order
    }

    pub fn reset(&mut self) {
        self.next_order = 0;
    }
}

/// Remove an entity from every group it belongs to.
pub fn destroy(commands: &mut Commands, entity: Entity) {
    if let Some(mut entity_commands) = commands.get_entity(entity) {
        entity_commands.despawn();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rect helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Strict overlap: rects that only share an edge do not collide.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

pub fn contains_point(rect: Rect, point: Vec2) -> bool {
    point.x >= rect.min.x && point.x < rect.max.x && point.y >= rect.min.y && point.y < rect.max.y
}

/// Grow (or shrink, with negative values) a rect around its centre.
/// `delta` is the total change in width and height.
pub fn inflate(rect: Rect, delta: Vec2) -> Rect {
    Rect::from_center_size(rect.center(), (rect.size() + delta).max(Vec2::ZERO))
}

/// Rect of the given size whose top-left corner sits at `top_left`.
pub fn rect_at(top_left: Vec2, size: Vec2) -> Rect {
    Rect::from_corners(top_left, top_left + size)
}

/// Collision rects of every collidable entity, falling back to the sprite
/// rect when no hitbox is attached.
pub fn collidable_rects<'a>(
    entities: impl Iterator<Item = (&'a WorldSprite, &'a Groups, Option<&'a Hitbox>)>,
) -> Vec<Rect> {
    entities
        .filter(|(_, groups, _)| groups.contains(Group::Collidable))
        .map(|(sprite, _, hitbox)| hitbox.map_or(sprite.rect, |h| h.0))
        .collect()
}
