//! Shared components, resources, events, and states for Harvest Moonlight.
//!
//! This is the type contract. Every domain plugin imports from here.
//! Domains talk to each other through these events and resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Start,
    Instructions,
    /// The world simulation runs.
    Playing,
    /// The trader menu owns input; the world is frozen but still drawn.
    Shop,
    GameOver,
    Victory,
}

/// Run condition: a level exists and is on screen (world or shop).
pub fn level_active(state: Res<State<GameState>>) -> bool {
    matches!(state.get(), GameState::Playing | GameState::Shop)
}

/// Per-frame order of the level update. Chained in this order by
/// `LevelPlugin`; every domain files its systems under one of these.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelSet {
    /// Point the pursuer at the player.
    Track,
    /// Camera offset and draw order.
    Render,
    /// Actors, particles, rain, sky.
    Advance,
    /// Auto-harvest of ripe plants under the player.
    Harvest,
    /// Player input, tools, interactions, shop input.
    Control,
    /// Ambient track selection.
    Ambient,
    /// Sleep fade and day reset.
    Transition,
    /// Money thresholds.
    Evaluate,
}

// ═══════════════════════════════════════════════════════════════════════
// DRAW LAYERS
// ═══════════════════════════════════════════════════════════════════════

/// Back-to-front draw order. Declaration order is the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    Water,
    Ground,
    Soil,
    SoilWater,
    RainFloor,
    HouseBottom,
    GroundPlant,
    Main,
    HouseTop,
    Fruit,
    RainDrops,
}

impl Layer {
    pub fn index(self) -> u8 {
        self as u8
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ITEMS, CROPS, TOOLS
// ═══════════════════════════════════════════════════════════════════════

/// Harvested goods the player can sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    Wood,
    Apple,
    Corn,
    Tomato,
}

impl Item {
    pub const ALL: [Item; 4] = [Item::Wood, Item::Apple, Item::Corn, Item::Tomato];

    pub fn name(self) -> &'static str {
        match self {
            Item::Wood => "wood",
            Item::Apple => "apple",
            Item::Corn => "corn",
            Item::Tomato => "tomato",
        }
    }
}

/// Plantable crops. Seeds are tracked per crop kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropKind {
    Corn,
    Tomato,
}

impl CropKind {
    pub const ALL: [CropKind; 2] = [CropKind::Corn, CropKind::Tomato];

    /// The item a mature plant of this kind yields.
    pub fn produce(self) -> Item {
        match self {
            CropKind::Corn => Item::Corn,
            CropKind::Tomato => Item::Tomato,
        }
    }

    pub fn next(self) -> Self {
        match self {
            CropKind::Corn => CropKind::Tomato,
            CropKind::Tomato => CropKind::Corn,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CropKind::Corn => "corn",
            CropKind::Tomato => "tomato",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tool {
    #[default]
    Hoe,
    Axe,
    Water,
}

impl Tool {
    pub fn next(self) -> Self {
        match self {
            Tool::Hoe => Tool::Axe,
            Tool::Axe => Tool::Water,
            Tool::Water => Tool::Hoe,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ACTOR STATUS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// One of the eight animation labels: {up,down,left,right} × {moving,idle}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActorStatus {
    pub facing: Facing,
    pub moving: bool,
}

impl ActorStatus {
    pub const ALL: [ActorStatus; 8] = [
        ActorStatus::moving(Facing::Up),
        ActorStatus::moving(Facing::Down),
        ActorStatus::moving(Facing::Left),
        ActorStatus::moving(Facing::Right),
        ActorStatus::idle(Facing::Up),
        ActorStatus::idle(Facing::Down),
        ActorStatus::idle(Facing::Left),
        ActorStatus::idle(Facing::Right),
    ];

    pub const fn moving(facing: Facing) -> Self {
        Self { facing, moving: true }
    }

    pub const fn idle(facing: Facing) -> Self {
        Self { facing, moving: false }
    }

    /// Asset folder name for this status, e.g. `"down_idle"`.
    pub fn label(self) -> &'static str {
        match (self.facing, self.moving) {
            (Facing::Up, true) => "up",
            (Facing::Down, true) => "down",
            (Facing::Left, true) => "left",
            (Facing::Right, true) => "right",
            (Facing::Up, false) => "up_idle",
            (Facing::Down, false) => "down_idle",
            (Facing::Left, false) => "left_idle",
            (Facing::Right, false) => "right_idle",
        }
    }
}

/// The player-controlled actor.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// The autonomous actor that chases the player.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Pursuer;

// ═══════════════════════════════════════════════════════════════════════
// PLAYER WALLET: inventories and money
// ═══════════════════════════════════════════════════════════════════════

/// Player inventories and currency. Counts are unsigned so they can never go
/// negative. Money is signed and never clamped: a penalty can push it below
/// zero, and any balance under the loss threshold ends the run.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerWallet {
    pub items: BTreeMap<Item, u32>,
    pub seeds: BTreeMap<CropKind, u32>,
    pub money: i64,
}

impl PlayerWallet {
    pub fn item_count(&self, item: Item) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn seed_count(&self, crop: CropKind) -> u32 {
        self.seeds.get(&crop).copied().unwrap_or(0)
    }

    pub fn add_item(&mut self, item: Item) {
        let count = self.items.entry(item).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Remove one unit. Returns false (and changes nothing) when none is held.
    pub fn take_item(&mut self, item: Item) -> bool {
        match self.items.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn add_seed(&mut self, crop: CropKind) {
        let count = self.seeds.entry(crop).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn take_seed(&mut self, crop: CropKind) -> bool {
        match self.seeds.get_mut(&crop) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WEATHER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmbientTrack {
    Day,
    Rain,
}

/// Re-rolled once per day-reset.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Weather {
    pub raining: bool,
}

impl Weather {
    pub fn ambient(self) -> AmbientTrack {
        if self.raining {
            AmbientTrack::Rain
        } else {
            AmbientTrack::Day
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS: cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Fired once at the midpoint of the sleep fade.
#[derive(Event, Debug, Clone, Copy)]
pub struct DayResetEvent;

/// The player swung a tool at `target` (map pixels).
#[derive(Event, Debug, Clone, Copy)]
pub struct ToolUseEvent {
    pub tool: Tool,
    pub target: Vec2,
}

/// The player tried to plant a seed at `target`.
#[derive(Event, Debug, Clone, Copy)]
pub struct SeedUseEvent {
    pub crop: CropKind,
    pub target: Vec2,
}

/// Spawn a short-lived pop particle covering `rect`.
#[derive(Event, Debug, Clone, Copy)]
pub struct PopParticleEvent {
    pub rect: Rect,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 64.0;
pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;

pub fn viewport() -> Vec2 {
    Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)
}
