//! The trader's buy/sell list.

use std::time::Duration;

use bevy::prelude::*;

use crate::data::config::EconomyConfig;
use crate::input::FrameInput;
use crate::shared::*;

/// Cooldown between repeated moves (and trades) while a key is held.
pub const REPEAT_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopEntry {
    Sell(Item),
    Buy(CropKind),
}

impl ShopEntry {
    pub fn label(self) -> &'static str {
        match self {
            ShopEntry::Sell(item) => item.name(),
            ShopEntry::Buy(crop) => crop.name(),
        }
    }

    /// How many the player holds: items for sale rows, seeds for buy rows.
    pub fn amount(self, wallet: &PlayerWallet) -> u32 {
        match self {
            ShopEntry::Sell(item) => wallet.item_count(item),
            ShopEntry::Buy(crop) => wallet.seed_count(crop),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShopMode {
    #[default]
    Navigating,
    Chatting,
}

/// A completed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trade {
    Sold { item: Item, price: u32 },
    Bought { crop: CropKind, price: u32 },
}

/// Sell one unit. No-op when none is held.
pub fn sell(wallet: &mut PlayerWallet, item: Item, economy: &EconomyConfig) -> Option<Trade> {
    if !wallet.take_item(item) {
        return None;
    }
    let price = economy.sale_price(item);
    wallet.money += i64::from(price);
    Some(Trade::Sold { item, price })
}

/// Buy one seed. No-op when the seed is not for sale or money is short.
pub fn buy(wallet: &mut PlayerWallet, crop: CropKind, economy: &EconomyConfig) -> Option<Trade> {
    let price = economy.purchase_price(crop)?;
    if wallet.money < i64::from(price) {
        return None;
    }
    wallet.money -= i64::from(price);
    wallet.add_seed(crop);
    Some(Trade::Bought { crop, price })
}

#[derive(Resource, Debug, Clone)]
pub struct ShopMenu {
    entries: Vec<ShopEntry>,
    index: usize,
    cooldown: Timer,
    pub mode: ShopMode,
}

impl Default for ShopMenu {
    fn default() -> Self {
        let entries = Item::ALL
            .iter()
            .map(|item| ShopEntry::Sell(*item))
            .chain(CropKind::ALL.iter().map(|crop| ShopEntry::Buy(*crop)))
            .collect();
        let mut cooldown = Timer::new(REPEAT_DELAY, TimerMode::Once);
        cooldown.tick(REPEAT_DELAY);
        Self {
            entries,
            index: 0,
            cooldown,
            mode: ShopMode::Navigating,
        }
    }
}

impl ShopMenu {
    pub fn entries(&self) -> &[ShopEntry] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn selected(&self) -> Option<ShopEntry> {
        self.entries.get(self.index).copied()
    }

    pub fn move_up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.index = (self.index + 1).min(self.entries.len().saturating_sub(1));
    }

    /// Trade on the selected row.
    pub fn confirm(&self, wallet: &mut PlayerWallet, economy: &EconomyConfig) -> Option<Trade> {
        match self.selected()? {
            ShopEntry::Sell(item) => sell(wallet, item, economy),
            ShopEntry::Buy(crop) => buy(wallet, crop, economy),
        }
    }

    /// Held-key navigation: arrows move, `Z` trades. Nothing happens while
    /// the cooldown runs or while chatting.
    pub fn navigate(
        &mut self,
        delta: Duration,
        input: &FrameInput,
        wallet: &mut PlayerWallet,
        economy: &EconomyConfig,
    ) -> Option<Trade> {
        if self.mode != ShopMode::Navigating {
            return None;
        }
        self.cooldown.tick(delta);
        if !self.cooldown.finished() {
            return None;
        }

        let mut acted = false;
        if input.held(KeyCode::ArrowUp) {
            self.move_up();
            acted = true;
        }
        if input.held(KeyCode::ArrowDown) {
            self.move_down();
            acted = true;
        }
        let mut trade = None;
        if input.held(KeyCode::KeyZ) {
            trade = self.confirm(wallet, economy);
            acted = true;
        }
        if acted {
            self.cooldown.reset();
        }
        trade
    }

    pub fn enter_chat(&mut self) {
        self.mode = ShopMode::Chatting;
    }

    pub fn leave_chat(&mut self) {
        self.mode = ShopMode::Navigating;
    }
}
