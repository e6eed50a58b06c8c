//! Trees: fruit, axe damage, stumps.

use bevy::prelude::*;
use rand::Rng;

use crate::data::crops::{TreeSize, APPLE_IMAGE, APPLE_SIZE, FRUIT_ROLLS_HIT, TREE_HEALTH};
use crate::registry::*;
use crate::shared::*;

#[derive(Component, Debug, Clone)]
pub struct Tree {
    pub size: TreeSize,
    pub health: u32,
    pub alive: bool,
    /// Apple entities currently hanging on this tree.
    pub apples: Vec<Entity>,
}

impl Tree {
    pub fn new(size: TreeSize) -> Self {
        Self {
            size,
            health: TREE_HEALTH,
            alive: true,
            apples: Vec::new(),
        }
    }
}

/// Outcome of one axe hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Chop {
    /// Index into `Tree::apples` of the apple knocked off.
    pub apple: Option<usize>,
    /// The tree just became a stump.
    pub felled: bool,
}

/// Apply one axe hit. Stumps ignore further hits.
pub fn chop(tree: &mut Tree, rng: &mut impl Rng) -> Chop {
    if !tree.alive {
        return Chop::default();
    }
    tree.health = tree.health.saturating_sub(1);
    let apple = (!tree.apples.is_empty()).then(|| rng.gen_range(0..tree.apples.len()));
    let felled = tree.health == 0;
    if felled {
        tree.alive = false;
    }
    Chop { apple, felled }
}

/// Fruit slots that bear an apple this time. Each slot wins 2 of 11 rolls.
pub fn roll_fruit_slots(size: TreeSize, rng: &mut impl Rng) -> Vec<Vec2> {
    size.fruit_slots()
        .iter()
        .copied()
        .filter(|_| rng.gen_range(0..=10) < FRUIT_ROLLS_HIT)
        .collect()
}

/// Generic object hitbox: 20% narrower, 75% shorter.
pub fn object_hitbox(rect: Rect) -> Rect {
    inflate(rect, Vec2::new(-rect.width() * 0.2, -rect.height() * 0.75))
}

/// Hang fresh apples on a tree whose sprite occupies `tree_rect`.
pub fn grow_fruit(
    commands: &mut Commands,
    registry: &mut SpriteRegistry,
    assets: Option<&AssetServer>,
    tree_rect: Rect,
    size: TreeSize,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    roll_fruit_slots(size, rng)
        .into_iter()
        .map(|offset| {
            let rect = rect_at(tree_rect.min + offset, APPLE_SIZE);
            let registration =
                Registration::new(rect, Layer::Fruit, &[Group::All], Look::Image(APPLE_IMAGE.into()));
            registry.register(commands, assets, registration).id()
        })
        .collect()
}

/// Register a tree and its first crop of apples.
pub fn spawn_tree(
    commands: &mut Commands,
    registry: &mut SpriteRegistry,
    assets: Option<&AssetServer>,
    rect: Rect,
    size: TreeSize,
    image: &str,
    rng: &mut impl Rng,
) -> Entity {
    let mut tree = Tree::new(size);
    tree.apples = grow_fruit(commands, registry, assets, rect, size, rng);
    let registration = Registration::new(
        rect,
        Layer::Main,
        &[Group::All, Group::Collidable, Group::Tree],
        Look::Image(image.to_string()),
    )
    .with_hitbox(object_hitbox(rect));
    registry.register(commands, assets, registration).insert(tree).id()
}

/// Axe hits on trees under the tool's target point.
pub fn handle_axe(
    mut commands: Commands,
    mut events: EventReader<ToolUseEvent>,
    assets: Option<Res<AssetServer>>,
    mut wallet: ResMut<PlayerWallet>,
    mut trees: Query<(&mut Tree, &mut WorldSprite, &mut Hitbox, &mut Sprite, &Groups)>,
    apples: Query<&WorldSprite, Without<Tree>>,
    mut particles: EventWriter<PopParticleEvent>,
) {
    let mut rng = rand::thread_rng();
    for event in events.read().filter(|e| e.tool == Tool::Axe) {
        for (mut tree, mut sprite, mut hitbox, mut image, groups) in &mut trees {
            if !groups.contains(Group::Tree) || !contains_point(sprite.rect, event.target) {
                continue;
            }
            let outcome = chop(&mut tree, &mut rng);

            if let Some(index) = outcome.apple {
                let apple = tree.apples.swap_remove(index);
                if let Ok(apple_sprite) = apples.get(apple) {
                    particles.send(PopParticleEvent {
                        rect: apple_sprite.rect,
                    });
                }
                destroy(&mut commands, apple);
                wallet.add_item(Item::Apple);
                info!("[World] apple picked (now {})", wallet.item_count(Item::Apple));
            }

            if outcome.felled {
                particles.send(PopParticleEvent { rect: sprite.rect });
                for apple in tree.apples.drain(..) {
                    destroy(&mut commands, apple);
                }
                let bottom = Vec2::new(sprite.rect.center().x, sprite.rect.max.y);
                let stump_size = Vec2::new(sprite.rect.width(), sprite.rect.height() * 0.5);
                sprite.rect = Rect::from_corners(
                    bottom - Vec2::new(stump_size.x / 2.0, stump_size.y),
                    bottom + Vec2::new(stump_size.x / 2.0, 0.0),
                );
                hitbox.0 = inflate(sprite.rect, Vec2::new(-10.0, -sprite.rect.height() * 0.6));
                image.custom_size = Some(sprite.rect.size());
                if let Some(assets) = assets.as_deref() {
                    image.image = assets.load(tree.size.stump_image());
                }
                wallet.add_item(Item::Wood);
                info!("[World] tree felled (wood {})", wallet.item_count(Item::Wood));
            }
        }
    }
}

/// Day reset: every living tree drops its old apples and grows a new set.
pub fn regrow_fruit(
    mut commands: Commands,
    mut resets: EventReader<DayResetEvent>,
    assets: Option<Res<AssetServer>>,
    mut registry: ResMut<SpriteRegistry>,
    mut trees: Query<(&mut Tree, &WorldSprite)>,
) {
    if resets.read().count() == 0 {
        return;
    }
    let mut rng = rand::thread_rng();
    for (mut tree, sprite) in &mut trees {
        for apple in tree.apples.drain(..) {
            destroy(&mut commands, apple);
        }
        if tree.alive {
            tree.apples = grow_fruit(
                &mut commands,
                &mut registry,
                assets.as_deref(),
                sprite.rect,
                tree.size,
                &mut rng,
            );
        }
    }
}
