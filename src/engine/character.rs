//! XP, levels and attribute stats.

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::db::port::{keys, load_json, save_json, SharedStore};
use crate::models::character::{STARTING_MAX_XP, STAT_FLOOR};
use crate::models::{CharacterState, Difficulty, StatKey};

/// Each level needs this much more XP than the previous one (floored).
pub const LEVEL_GROWTH: f64 = 1.5;

pub struct CharacterProgression {
    store: SharedStore,
    state: CharacterState,
}

impl CharacterProgression {
    pub fn load(store: SharedStore) -> Result<Self> {
        let mut state: CharacterState = load_json(store.as_ref(), keys::CHARACTER)
            .context("Loading character")?
            .unwrap_or_default();

        if state.max_xp == 0 || state.level == 0 {
            warn!("Character blob has a zero level or threshold, starting fresh");
            state = CharacterState::default();
        }

        Ok(Self { store, state })
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    /// Add XP and level up as many times as the total allows.
    /// Returns the number of levels gained.
    pub fn add_xp(&mut self, amount: u64) -> Result<u32> {
        let gained = apply_xp(&mut self.state, amount);
        if gained > 0 {
            info!(
                "Level up! Now level {} ({}/{} XP)",
                self.state.level, self.state.current_xp, self.state.max_xp
            );
        }
        self.save()?;
        Ok(gained)
    }

    /// Apply the difficulty's stat delta, scaled by `multiplier`, and return
    /// the new value.
    pub fn modify_stat(
        &mut self,
        key: StatKey,
        difficulty: Difficulty,
        is_penalty: bool,
        multiplier: f64,
    ) -> Result<f64> {
        let mut delta = difficulty.stat_delta() * multiplier.max(0.0);
        if is_penalty {
            delta = -delta;
        }
        self.shift_stat(key, delta)
    }

    /// Take back a gain recorded earlier.
    pub fn revert_stat(&mut self, key: StatKey, gain: f64) -> Result<f64> {
        self.shift_stat(key, -gain)
    }

    fn shift_stat(&mut self, key: StatKey, delta: f64) -> Result<f64> {
        let slot = self.state.stats.get_mut(key);
        let before = *slot;
        *slot = adjust_stat(before, delta);
        let after = *slot;

        debug!("{} {} -> {}", key, before, after);
        self.save()?;
        Ok(after)
    }

    fn save(&self) -> Result<()> {
        save_json(self.store.as_ref(), keys::CHARACTER, &self.state).context("Saving character")
    }
}

/// Iterative level-up: each level consumes exactly its own threshold
/// before the threshold grows.
pub fn apply_xp(state: &mut CharacterState, amount: u64) -> u32 {
    if state.max_xp == 0 {
        state.max_xp = STARTING_MAX_XP;
    }

    state.current_xp = state.current_xp.saturating_add(amount);
    let mut gained = 0;
    while state.current_xp >= state.max_xp {
        state.current_xp -= state.max_xp;
        state.level += 1;
        state.max_xp = next_threshold(state.max_xp);
        gained += 1;
    }
    gained
}

pub fn next_threshold(max_xp: u64) -> u64 {
    ((max_xp as f64 * LEVEL_GROWTH).floor() as u64).max(1)
}

/// Apply a delta, keep one decimal and never drop below the floor.
pub fn adjust_stat(current: f64, delta: f64) -> f64 {
    round_tenth(current + delta).max(STAT_FLOOR)
}

pub fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
