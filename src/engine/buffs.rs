//! The daily modifier and the catalog it is picked from.

use anyhow::{Context, Result};
use log::info;

use crate::db::port::{keys, load_json, save_json, SharedStore};
use crate::models::{Buff, BuffType};

pub struct BuffEngine {
    store: SharedStore,
    active: Option<Buff>,
}

impl BuffEngine {
    pub fn load(store: SharedStore) -> Result<Self> {
        let active = load_json(store.as_ref(), keys::DAILY_BUFF).context("Loading daily buff")?;
        Ok(Self { store, active })
    }

    pub fn active(&self) -> Option<&Buff> {
        self.active.as_ref()
    }

    /// Set or clear today's modifier. Clearing removes the persisted record.
    pub fn activate(&mut self, buff: Option<Buff>) -> Result<()> {
        match &buff {
            Some(b) => {
                info!("Daily buff activated: {}", b.name);
                save_json(self.store.as_ref(), keys::DAILY_BUFF, b).context("Saving daily buff")?;
            }
            None => {
                self.store
                    .remove(keys::DAILY_BUFF)
                    .context("Clearing daily buff")?;
            }
        }
        self.active = buff;
        Ok(())
    }

    pub fn reset_daily(&mut self) -> Result<()> {
        if let Some(b) = &self.active {
            info!("Daily buff '{}' expired", b.name);
        }
        self.activate(None)
    }

    pub fn xp_multiplier(&self) -> f64 {
        self.active.as_ref().map(|b| b.xp_multiplier).unwrap_or(1.0)
    }

    pub fn stat_multiplier(&self) -> f64 {
        self.active.as_ref().map(|b| b.stat_multiplier).unwrap_or(1.0)
    }
}

pub fn find_buff(id: &str) -> Option<Buff> {
    catalog().into_iter().find(|b| b.id == id)
}

/// The modifiers a player can pick for the day.
pub fn catalog() -> Vec<Buff> {
    vec![
        Buff {
            id: "coffee_rush".to_string(),
            name: "Caffeine Rush".to_string(),
            description: "You are wired! Gain more Stats, but learn less (XP).".to_string(),
            icon: "cafe".to_string(),
            buff_type: BuffType::Tradeoff,
            xp_multiplier: 0.8,
            stat_multiplier: 1.5,
        },
        Buff {
            id: "scholar".to_string(),
            name: "Scholar's Focus".to_string(),
            description: "Deep focus mode. Double XP, but physical Stats grow slowly.".to_string(),
            icon: "book".to_string(),
            buff_type: BuffType::Tradeoff,
            xp_multiplier: 2.0,
            stat_multiplier: 0.5,
        },
        Buff {
            id: "rest_day".to_string(),
            name: "Rest Day".to_string(),
            description: "Take it easy. Rewards are lowered, but relaxing is good.".to_string(),
            icon: "bed".to_string(),
            buff_type: BuffType::Debuff,
            xp_multiplier: 0.5,
            stat_multiplier: 0.5,
        },
        Buff {
            id: "hardcore".to_string(),
            name: "Hardcore Mode".to_string(),
            description: "High risk, High reward. Everything is boosted!".to_string(),
            icon: "flame".to_string(),
            buff_type: BuffType::Challenge,
            xp_multiplier: 1.5,
            stat_multiplier: 1.5,
        },
    ]
}
