//! Static crop and tree tables.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::*;

/// Growth data for one crop kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropDef {
    pub kind: CropKind,
    /// Stage at which the plant becomes harvestable.
    pub max_stage: u8,
    /// Vertical shift of the plant sprite relative to its soil tile.
    pub y_offset: f32,
}

pub fn crop_def(kind: CropKind) -> CropDef {
    match kind {
        CropKind::Corn => CropDef {
            kind,
            max_stage: 3,
            y_offset: -16.0,
        },
        CropKind::Tomato => CropDef {
            kind,
            max_stage: 3,
            y_offset: -8.0,
        },
    }
}

/// Image path of a plant sprite at the given growth stage.
pub fn stage_image(kind: CropKind, stage: u8) -> String {
    format!("graphics/fruit/{}/{}.png", kind.name(), stage)
}

pub fn seed_image(kind: CropKind) -> String {
    format!("graphics/overlay/{}.png", kind.name())
}

// ─────────────────────────────────────────────────────────────────────────────
// Trees
// ─────────────────────────────────────────────────────────────────────────────

pub const TREE_HEALTH: u32 = 5;
pub const APPLE_SIZE: Vec2 = Vec2::new(18.0, 18.0);
pub const APPLE_IMAGE: &str = "graphics/fruit/apple.png";

/// Out of 11 equally likely rolls, this many bear fruit.
pub const FRUIT_ROLLS_HIT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeSize {
    Small,
    Large,
}

impl TreeSize {
    /// Map object names are "Small" or "Large"; anything else is treated as a
    /// small tree.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("large") {
            TreeSize::Large
        } else {
            TreeSize::Small
        }
    }

    /// Apple positions relative to the tree sprite's top-left corner.
    pub fn fruit_slots(self) -> &'static [Vec2] {
        const SMALL: [Vec2; 6] = [
            Vec2::new(18.0, 17.0),
            Vec2::new(30.0, 37.0),
            Vec2::new(12.0, 50.0),
            Vec2::new(30.0, 45.0),
            Vec2::new(20.0, 30.0),
            Vec2::new(30.0, 10.0),
        ];
        const LARGE: [Vec2; 6] = [
            Vec2::new(30.0, 24.0),
            Vec2::new(60.0, 65.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(16.0, 40.0),
            Vec2::new(45.0, 50.0),
            Vec2::new(42.0, 70.0),
        ];
        match self {
            TreeSize::Small => &SMALL,
            TreeSize::Large => &LARGE,
        }
    }

    pub fn stump_image(self) -> &'static str {
        match self {
            TreeSize::Small => "graphics/stumps/small.png",
            TreeSize::Large => "graphics/stumps/large.png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_crops_mature_at_stage_three() {
        for kind in CropKind::ALL {
            assert_eq!(crop_def(kind).max_stage, 3);
        }
        assert_eq!(stage_image(CropKind::Tomato, 2), "graphics/fruit/tomato/2.png");
    }

    #[test]
    fn tree_sizes_have_six_fruit_slots() {
        assert_eq!(TreeSize::Small.fruit_slots().len(), 6);
        assert_eq!(TreeSize::Large.fruit_slots().len(), 6);
        assert_eq!(TreeSize::from_name("Large"), TreeSize::Large);
        assert_eq!(TreeSize::from_name("whatever"), TreeSize::Small);
    }
}
