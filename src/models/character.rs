use serde::{Deserialize, Serialize};

use crate::models::StatKey;

pub const STARTING_MAX_XP: u64 = 100;
pub const STAT_FLOOR: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: f64,
    pub intelligence: f64,
    pub constitution: f64,
    pub dexterity: f64,
    pub charisma: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            strength: STAT_FLOOR,
            intelligence: STAT_FLOOR,
            constitution: STAT_FLOOR,
            dexterity: STAT_FLOOR,
            charisma: STAT_FLOOR,
        }
    }
}

impl Stats {
    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Strength => self.strength,
            StatKey::Intelligence => self.intelligence,
            StatKey::Constitution => self.constitution,
            StatKey::Dexterity => self.dexterity,
            StatKey::Charisma => self.charisma,
        }
    }

    pub fn get_mut(&mut self, key: StatKey) -> &mut f64 {
        match key {
            StatKey::Strength => &mut self.strength,
            StatKey::Intelligence => &mut self.intelligence,
            StatKey::Constitution => &mut self.constitution,
            StatKey::Dexterity => &mut self.dexterity,
            StatKey::Charisma => &mut self.charisma,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterState {
    pub level: u32,
    pub current_xp: u64,
    pub max_xp: u64,
    #[serde(default)]
    pub stats: Stats,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            max_xp: STARTING_MAX_XP,
            stats: Stats::default(),
        }
    }
}

impl CharacterState {
    pub fn progress_to_next(&self) -> f64 {
        if self.max_xp == 0 {
            0.0
        } else {
            self.current_xp as f64 / self.max_xp as f64
        }
    }
}
