//! Tunable game settings, read from `assets/config/game.ron`.
//!
//! Every section has defaults matching the shipped game, so a partial file
//! only needs the values it changes.

use std::collections::BTreeMap;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::SetupError;
use crate::shared::*;

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub economy: EconomyConfig,
    pub session: SessionConfig,
    pub agent: AgentConfig,
    pub actors: ActorConfig,
    /// Probability of rain when the weather is rolled locally.
    pub rain_chance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            economy: EconomyConfig::default(),
            session: SessionConfig::default(),
            agent: AgentConfig::default(),
            actors: ActorConfig::default(),
            // a roll of 0..=10 landing above 7
            rain_chance: 3.0 / 11.0,
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, SetupError> {
        ron::from_str(source).map_err(|source| SetupError::Parse {
            what: "game config".to_string(),
            source,
        })
    }

    /// Missing file → defaults. Unreadable or malformed file → error.
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_ron_str(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("[Data] {} not found, using default config", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(SetupError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Economy
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_money: i64,
    pub starting_items: BTreeMap<Item, u32>,
    pub starting_seeds: BTreeMap<CropKind, u32>,
    pub sale_prices: BTreeMap<Item, u32>,
    pub purchase_prices: BTreeMap<CropKind, u32>,
    /// Money lost each time the pursuer catches the player.
    pub pursuer_penalty: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_money: 200,
            starting_items: Item::ALL.iter().map(|item| (*item, 20)).collect(),
            starting_seeds: CropKind::ALL.iter().map(|crop| (*crop, 5)).collect(),
            sale_prices: BTreeMap::from([
                (Item::Wood, 4),
                (Item::Apple, 2),
                (Item::Corn, 10),
                (Item::Tomato, 20),
            ]),
            purchase_prices: BTreeMap::from([(CropKind::Corn, 4), (CropKind::Tomato, 5)]),
            pursuer_penalty: 10,
        }
    }
}

impl EconomyConfig {
    pub fn sale_price(&self, item: Item) -> u32 {
        self.sale_prices.get(&item).copied().unwrap_or(0)
    }

    /// `None` when the seed is not for sale.
    pub fn purchase_price(&self, crop: CropKind) -> Option<u32> {
        self.purchase_prices.get(&crop).copied()
    }

    /// A fresh wallet. Every item and seed gets an entry so the shop lists it
    /// even at zero.
    pub fn starting_wallet(&self) -> PlayerWallet {
        PlayerWallet {
            items: Item::ALL
                .iter()
                .map(|item| (*item, self.starting_items.get(item).copied().unwrap_or(0)))
                .collect(),
            seeds: CropKind::ALL
                .iter()
                .map(|crop| (*crop, self.starting_seeds.get(crop).copied().unwrap_or(0)))
                .collect(),
            money: self.starting_money,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session thresholds
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Money strictly below this ends the game.
    pub loss_threshold: i64,
    /// Money strictly above this wins the game.
    pub victory_threshold: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            loss_threshold: 100,
            victory_threshold: 11_000,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Remote agent
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// When false no network calls are made: weather is rolled locally and
    /// the trader answers with the apology line.
    pub enabled: bool,
    /// OpenAI-compatible endpoint root, e.g. an Ollama server's `/v1`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub chat_system_prompt: String,
    pub decision_system_prompt: String,
    /// Reply shown when the chat service fails.
    pub apology: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: "ollama".to_string(),
            model: "llama3.2".to_string(),
            timeout_secs: 10,
            chat_system_prompt: "Farmer: earn gold by growing crops, chopping wood and picking \
                                 apples, then selling them.\n\
                                 Trader: you can buy seeds and sell your goods in the shop.\n\
                                 Troublemaker: every time the troublemaker catches you, you \
                                 lose 10 gold."
                .to_string(),
            decision_system_prompt: "Look at the number I send. If it is odd, answer 1. If it is \
                                     even, answer 2. Answer with a single character only."
                .to_string(),
            apology: "Sorry, something went wrong.".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Actors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub player_speed: f32,
    pub pursuer_speed: f32,
    /// Animation frames advanced per second.
    pub animation_fps: f32,
    pub frames_per_status: usize,
    /// Visual sprite size of both actors.
    pub sprite_size: (f32, f32),
    /// Pursuer spawns within ± this many pixels of the player start.
    pub pursuer_spawn_jitter: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            player_speed: 200.0,
            pursuer_speed: 100.0,
            animation_fps: 4.0,
            frames_per_status: 4,
            sprite_size: (192.0, 192.0),
            pursuer_spawn_jitter: 20.0,
        }
    }
}

impl ActorConfig {
    pub fn sprite_size(&self) -> Vec2 {
        Vec2::new(self.sprite_size.0, self.sprite_size.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = GameConfig::from_ron_str(
            "(economy: (starting_money: 500), agent: (enabled: true, model: \"qwen\"))",
        )
        .unwrap();
        assert_eq!(config.economy.starting_money, 500);
        assert_eq!(config.economy.sale_price(Item::Wood), 4);
        assert!(config.agent.enabled);
        assert_eq!(config.agent.model, "qwen");
        assert_eq!(config.session.victory_threshold, 11_000);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let result = GameConfig::from_ron_str("(economy: (starting_money: \"lots\"))");
        assert!(matches!(result, Err(SetupError::Parse { .. })));
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = GameConfig::load(Path::new("does/not/exist.ron")).unwrap();
        assert_eq!(config.economy.starting_money, 200);
    }

    #[test]
    fn starting_wallet_lists_every_item() {
        let mut economy = EconomyConfig::default();
        economy.starting_items.remove(&Item::Apple);
        let wallet = economy.starting_wallet();
        assert_eq!(wallet.items.len(), Item::ALL.len());
        assert_eq!(wallet.item_count(Item::Apple), 0);
        assert_eq!(wallet.seed_count(CropKind::Corn), 5);
        assert_eq!(wallet.money, 200);
    }

    #[test]
    fn shipped_config_parses() {
        let text = std::fs::read_to_string(super::super::CONFIG_PATH).unwrap();
        let config = GameConfig::from_ron_str(&text).unwrap();
        assert_eq!(config.economy.purchase_price(CropKind::Corn), Some(4));
    }
}
