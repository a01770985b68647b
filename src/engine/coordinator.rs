//! Sequences the engine components for each user action.
//!
//! Every component loads its own aggregate from the shared store; this type
//! only decides the order in which they run and which buff multipliers apply.
//! Newly completed achievements reach the front end through `subscribe`.

use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info};
use rand::Rng;

use crate::config::AppConfig;
use crate::db::port::SharedStore;
use crate::engine::achievements::AchievementLadder;
use crate::engine::buffs::{find_buff, BuffEngine};
use crate::engine::character::{round_tenth, CharacterProgression};
use crate::engine::events::UnlockListener;
use crate::engine::habits::HabitStore;
use crate::engine::inventory::{base_item_id, InventoryLedger, Loot};
use crate::engine::streak::StreakTracker;
use crate::models::{Buff, Habit, Item, Mood};

#[derive(Debug, Clone, PartialEq)]
pub struct DayStart {
    pub new_day: bool,
    pub check_in_streak: u32,
}

#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub habit: Habit,
    pub stat_value: f64,
    pub loot: Loot,
}

#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    pub xp: u64,
    pub levels_gained: u32,
}

pub struct ProgressionCoordinator {
    config: AppConfig,
    habits: HabitStore,
    character: CharacterProgression,
    inventory: InventoryLedger,
    buffs: BuffEngine,
    ladder: AchievementLadder,
    streak: StreakTracker,
}

impl ProgressionCoordinator {
    pub fn new(store: SharedStore, config: AppConfig) -> Result<Self> {
        Ok(Self {
            config,
            habits: HabitStore::load(store.clone())?,
            character: CharacterProgression::load(store.clone())?,
            inventory: InventoryLedger::load(store.clone())?,
            buffs: BuffEngine::load(store.clone())?,
            ladder: AchievementLadder::load(store.clone())?,
            streak: StreakTracker::load(store)?,
        })
    }

    pub fn habits(&self) -> &HabitStore {
        &self.habits
    }

    pub fn character(&self) -> &CharacterProgression {
        &self.character
    }

    pub fn inventory(&self) -> &InventoryLedger {
        &self.inventory
    }

    pub fn buffs(&self) -> &BuffEngine {
        &self.buffs
    }

    pub fn ladder(&self) -> &AchievementLadder {
        &self.ladder
    }

    pub fn streak(&self) -> &StreakTracker {
        &self.streak
    }

    pub fn subscribe(&mut self) -> UnlockListener {
        self.ladder.subscribe()
    }

    /// Day rollover plus the daily check-in. Safe to call on every launch.
    pub fn start_day(&mut self, today: NaiveDate) -> Result<DayStart> {
        let new_day = self.habits.check_date_and_reset(today)?;
        if new_day {
            self.buffs.reset_daily()?;
        }
        let check_in_streak = self.streak.check_in(today)?;
        Ok(DayStart {
            new_day,
            check_in_streak,
        })
    }

    pub fn add_habit(&mut self, habit: Habit) -> Result<bool> {
        self.habits.add(habit)
    }

    pub fn delete_habit(&mut self, id: &str) -> Result<bool> {
        self.habits.delete(id)
    }

    pub fn complete_habit(
        &mut self,
        id: &str,
        mood: Mood,
        today: NaiveDate,
    ) -> Result<Option<CompletionOutcome>> {
        self.complete_habit_with(id, mood, today, &mut rand::thread_rng())
    }

    /// Returns `None` for unknown habits and habits already done today.
    pub fn complete_habit_with<R: Rng>(
        &mut self,
        id: &str,
        mood: Mood,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Option<CompletionOutcome>> {
        match self.habits.get(id) {
            Some(h) if !h.completed => {}
            Some(_) => {
                debug!("complete_habit: '{}' already done today", id);
                return Ok(None);
            }
            None => return Ok(None),
        }
        let Some(habit) = self.habits.complete(id, mood, today)? else {
            return Ok(None);
        };

        let before = self.character.state().stats.get(habit.associated_stat);
        let stat_value = self.character.modify_stat(
            habit.associated_stat,
            habit.difficulty,
            false,
            self.stat_multiplier(),
        )?;
        let habit = self
            .habits
            .record_stat_gain(id, round_tenth(stat_value - before))?
            .unwrap_or(habit);

        self.ladder.notify_habit_complete(habit.streak)?;
        let loot = self.inventory.generate_loot_with(rng, habit.reward)?;
        self.ladder.notify_inventory_update(self.inventory.items())?;

        info!("Completed '{}' (streak {})", habit.title, habit.streak);
        Ok(Some(CompletionOutcome {
            habit,
            stat_value,
            loot,
        }))
    }

    /// Undo today's completion and take back exactly the stat gain it paid.
    /// Returns `None` unless the habit was completed.
    pub fn uncomplete_habit(&mut self, id: &str) -> Result<Option<Habit>> {
        let Some(gain) = self
            .habits
            .get(id)
            .filter(|h| h.completed)
            .map(|h| h.stat_gain)
        else {
            return Ok(None);
        };
        let Some(habit) = self.habits.uncomplete(id)? else {
            return Ok(None);
        };
        self.character.revert_stat(habit.associated_stat, gain)?;
        info!("Undid '{}'", habit.title);
        Ok(Some(habit))
    }

    pub fn claim(&mut self, id: &str) -> Result<Option<ClaimOutcome>> {
        self.claim_with(id, &mut rand::thread_rng())
    }

    pub fn claim_with<R: Rng>(&mut self, id: &str, rng: &mut R) -> Result<Option<ClaimOutcome>> {
        let reward = self.ladder.claim_with(id, &mut self.inventory, rng)?;
        if reward == 0 {
            return Ok(None);
        }

        let xp = (f64::from(reward) * self.xp_multiplier()).round().max(0.0) as u64;
        let levels_gained = self.character.add_xp(xp)?;
        // the claim may have rolled a bounty the inventory already covers
        self.ladder.notify_inventory_update(self.inventory.items())?;

        Ok(Some(ClaimOutcome { xp, levels_gained }))
    }

    pub fn open_chest(&mut self) -> Result<Vec<Item>> {
        self.open_chest_with(&mut rand::thread_rng())
    }

    /// Draw a reward chest and collect every item under its catalog id.
    pub fn open_chest_with<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<Item>> {
        let drawn = self.inventory.get_random_items_with(
            rng,
            self.config.rewards.chest_min,
            self.config.rewards.chest_max,
        );

        let mut items = Vec::with_capacity(drawn.len());
        for item in drawn {
            let base = base_item_id(&item.id).to_string();
            let item = Item { id: base, ..item };
            self.inventory.add_item(item.clone())?;
            items.push(item);
        }
        info!("Opened a chest with {} item(s)", items.len());

        self.ladder.notify_inventory_update(self.inventory.items())?;
        Ok(items)
    }

    /// Use one consumable. `None` when nothing usable is held under `id`.
    pub fn use_item(&mut self, id: &str) -> Result<Option<Item>> {
        let used = self.inventory.use_item(id)?;
        self.sync_collections(used)
    }

    pub fn sell_item(&mut self, id: &str) -> Result<Option<Item>> {
        let sold = self.inventory.sell_item(id)?;
        self.sync_collections(sold)
    }

    pub fn drop_item(&mut self, id: &str) -> Result<Option<Item>> {
        let dropped = self.inventory.drop_item(id)?;
        self.sync_collections(dropped)
    }

    /// Activate a catalog buff by id. Unknown ids change nothing.
    pub fn set_buff(&mut self, id: &str) -> Result<Option<Buff>> {
        let Some(buff) = find_buff(id) else {
            return Ok(None);
        };
        self.buffs.activate(Some(buff.clone()))?;
        Ok(Some(buff))
    }

    pub fn clear_buff(&mut self) -> Result<()> {
        self.buffs.activate(None)
    }

    fn sync_collections(&mut self, spent: Option<Item>) -> Result<Option<Item>> {
        if spent.is_some() {
            self.ladder.notify_inventory_update(self.inventory.items())?;
        }
        Ok(spent)
    }

    fn xp_multiplier(&self) -> f64 {
        if self.config.buffs.apply_multipliers {
            self.buffs.xp_multiplier()
        } else {
            1.0
        }
    }

    fn stat_multiplier(&self) -> f64 {
        if self.config.buffs.apply_multipliers {
            self.buffs.stat_multiplier()
        } else {
            1.0
        }
    }
}
