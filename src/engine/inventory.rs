//! Item stacks, gold, and loot generation.

use anyhow::{Context, Result};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::port::{keys, load_json, save_json, SharedStore};
use crate::models::{Item, ItemType, Rarity, RewardTier};
use crate::utils::ids::unique_suffix;

/// Items a reward chest can drop.
pub const CHEST_POOL: &[&str] = &[
    "gold_coin", "diamond", "potion", "shield", "hammer", "key", "map", "herb", "skull",
];

/// What the inventory looks like to code that only needs to spend items.
pub trait ItemLedger {
    /// Total held across every stack whose base id is `base_id`.
    fn held_quantity(&self, base_id: &str) -> i64;
    fn remove_item(&mut self, id: &str, amount: i64) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loot {
    pub gold: u64,
    pub item: Option<Item>,
}

pub struct InventoryLedger {
    store: SharedStore,
    items: Vec<Item>,
    gold: u64,
}

impl InventoryLedger {
    pub fn load(store: SharedStore) -> Result<Self> {
        let items: Vec<Item> = load_json(store.as_ref(), keys::INVENTORY)
            .context("Loading inventory")?
            .unwrap_or_default();
        let gold: u64 = load_json(store.as_ref(), keys::GOLD)
            .context("Loading gold")?
            .unwrap_or(0);

        // Stacks are never stored empty; drop any that slipped through.
        let items = items.into_iter().filter(|i| i.quantity > 0).collect();
        Ok(Self { store, items, gold })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn gold(&self) -> u64 {
        self.gold
    }

    pub fn add_gold(&mut self, amount: u64) -> Result<()> {
        self.gold = self.gold.saturating_add(amount);
        self.save_gold()
    }

    /// Stack onto an existing entry with the same id, or append.
    pub fn add_item(&mut self, item: Item) -> Result<()> {
        if item.quantity <= 0 {
            return Ok(());
        }
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => existing.quantity += item.quantity,
            None => self.items.push(item),
        }
        self.save_items()
    }

    /// Draw a count in `[min, max]` and clone that many chest items, each
    /// with a fresh id suffix so duplicates stay distinct until collected.
    pub fn get_random_items_with<R: Rng>(&self, rng: &mut R, min: u32, max: u32) -> Vec<Item> {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let count = rng.gen_range(lo..=hi);

        let mut drawn = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let Some(mut item) = CHEST_POOL.choose(rng).and_then(|id| catalog_item(id)) else {
                continue;
            };
            item.id = format!("{}_{}", item.id, unique_suffix(rng));
            item.quantity = 1;
            drawn.push(item);
        }
        drawn
    }

    /// Fixed gold for the tier plus a coin flip for the tier's item.
    pub fn generate_loot_with<R: Rng>(&mut self, rng: &mut R, tier: RewardTier) -> Result<Loot> {
        let gold = tier_gold(tier);
        self.add_gold(gold)?;

        let item = if rng.gen_bool(0.5) {
            catalog_item(tier_item_id(tier))
        } else {
            None
        };

        if let Some(item) = &item {
            self.add_item(Item {
                quantity: 1,
                ..item.clone()
            })?;
        }

        info!(
            "Loot ({}): {} gold{}",
            tier.as_str(),
            gold,
            item.as_ref()
                .map(|i| format!(" + {}", i.name))
                .unwrap_or_default()
        );
        Ok(Loot { gold, item })
    }

    /// The stack `id` names: an exact match, or else the first stack with that base id.
    pub fn find(&self, id: &str) -> Option<&Item> {
        self.stack_index(id).map(|i| &self.items[i])
    }

    /// Consume one unit. Only consumables can be used.
    pub fn use_item(&mut self, id: &str) -> Result<Option<Item>> {
        let Some(index) = self.stack_index(id) else {
            return Ok(None);
        };
        if self.items[index].item_type != ItemType::Consumable {
            debug!("use_item: '{}' is not a consumable", id);
            return Ok(None);
        }
        let used = self.take_one(index)?;
        info!("Used {}", used.name);
        Ok(Some(used))
    }

    /// Trade one unit for its sell value in gold.
    pub fn sell_item(&mut self, id: &str) -> Result<Option<Item>> {
        let Some(index) = self.stack_index(id) else {
            return Ok(None);
        };
        let sold = self.take_one(index)?;
        self.add_gold(u64::from(sold.sell_value))?;
        info!("Sold {} for {} gold", sold.name, sold.sell_value);
        Ok(Some(sold))
    }

    pub fn drop_item(&mut self, id: &str) -> Result<Option<Item>> {
        let Some(index) = self.stack_index(id) else {
            return Ok(None);
        };
        let dropped = self.take_one(index)?;
        info!("Dropped {}", dropped.name);
        Ok(Some(dropped))
    }

    fn stack_index(&self, id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.id == id)
            .or_else(|| self.items.iter().position(|i| base_item_id(&i.id) == id))
    }

    fn take_one(&mut self, index: usize) -> Result<Item> {
        let taken = Item {
            quantity: 1,
            ..self.items[index].clone()
        };
        self.items[index].quantity -= 1;
        if self.items[index].quantity <= 0 {
            self.items.remove(index);
        }
        self.save_items()?;
        Ok(taken)
    }

    fn save_items(&self) -> Result<()> {
        save_json(self.store.as_ref(), keys::INVENTORY, &self.items).context("Saving inventory")
    }

    fn save_gold(&self) -> Result<()> {
        save_json(self.store.as_ref(), keys::GOLD, &self.gold).context("Saving gold")
    }
}

impl ItemLedger for InventoryLedger {
    fn held_quantity(&self, base_id: &str) -> i64 {
        self.items
            .iter()
            .filter(|i| base_item_id(&i.id) == base_id)
            .map(|i| i.quantity)
            .sum()
    }

    /// Drain `amount` across every stack sharing `id`'s base id, the exact
    /// id first. Emptied stacks are deleted; absent ids are ignored.
    fn remove_item(&mut self, id: &str, amount: i64) -> Result<()> {
        let base = base_item_id(id);
        let mut order: Vec<usize> = (0..self.items.len())
            .filter(|&i| base_item_id(&self.items[i].id) == base)
            .collect();
        if order.is_empty() {
            debug!("remove_item: '{}' not held", id);
            return Ok(());
        }
        order.sort_by_key(|&i| self.items[i].id != id);

        let mut remaining = amount;
        for i in order {
            if remaining <= 0 {
                break;
            }
            let taken = remaining.min(self.items[i].quantity);
            self.items[i].quantity -= taken;
            remaining -= taken;
        }
        self.items.retain(|i| i.quantity > 0);
        self.save_items()
    }
}

pub fn tier_gold(tier: RewardTier) -> u64 {
    match tier {
        RewardTier::Low => 10,
        RewardTier::Medium => 50,
        RewardTier::High => 100,
    }
}

pub fn tier_item_id(tier: RewardTier) -> &'static str {
    match tier {
        RewardTier::Low => "potion",
        RewardTier::Medium => "gem",
        RewardTier::High => "sword",
    }
}

/// Strip a generated suffix: "potion_k3j9x0a1b" -> "potion".
/// Ids that are not catalog-derived come back unchanged.
pub fn base_item_id(id: &str) -> &str {
    for entry in CATALOG {
        let base = entry.0;
        if id == base {
            return &id[..base.len()];
        }
        if id.len() > base.len() && id.starts_with(base) && id[base.len()..].starts_with('_') {
            return &id[..base.len()];
        }
    }
    id
}

// ─── Item catalog ────────────────────────────────────────────────────────────

type CatalogEntry = (&'static str, &'static str, &'static str, ItemType, &'static str, u32, Rarity);

const CATALOG: &[CatalogEntry] = &[
    ("gold_coin", "Gold Coin", "cash-outline", ItemType::Material, "Currency.", 1, Rarity::Common),
    ("diamond", "Diamond", "diamond-outline", ItemType::Material, "Sparkling gem.", 100, Rarity::Legendary),
    ("potion", "Potion", "flask-outline", ItemType::Consumable, "Restores health.", 15, Rarity::Rare),
    ("shield", "Shield", "shield-outline", ItemType::Equipment, "Protection.", 10, Rarity::Common),
    ("hammer", "Iron Hammer", "hammer-outline", ItemType::Equipment, "Good for smashing.", 20, Rarity::Common),
    ("key", "Mystery Key", "key-outline", ItemType::Material, "Opens something...", 50, Rarity::Rare),
    ("map", "Old Map", "map-outline", ItemType::Consumable, "Reveals secrets.", 5, Rarity::Common),
    ("herb", "Magic Herb", "leaf-outline", ItemType::Material, "Medicinal plant.", 2, Rarity::Common),
    ("skull", "Cursed Skull", "skull-outline", ItemType::Material, "Spooky vibes.", 200, Rarity::Legendary),
    // tier rewards only, never dropped by chests
    ("gem", "Polished Gem", "diamond-outline", ItemType::Material, "Worth a fair bit.", 40, Rarity::Rare),
    ("sword", "Steel Sword", "flash-outline", ItemType::Equipment, "Sharp and reliable.", 120, Rarity::Legendary),
];

pub fn catalog_item(id: &str) -> Option<Item> {
    CATALOG
        .iter()
        .find(|entry| entry.0 == id)
        .map(|&(id, name, icon, item_type, description, sell_value, rarity)| Item {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            item_type,
            description: description.to_string(),
            sell_value,
            rarity,
            quantity: 1,
        })
}
