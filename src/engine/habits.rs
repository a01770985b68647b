//! Habit list, completion toggling and the day-boundary reset.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::db::port::{keys, load_json, save_json, SharedStore};
use crate::models::{Habit, HabitLog, Mood};
use crate::utils::dates::day_key;

pub struct HabitStore {
    store: SharedStore,
    habits: Vec<Habit>,
    last_active_day: Option<String>,
}

impl HabitStore {
    /// Load the habit list, seeding the starter habit when nothing usable is stored.
    pub fn load(store: SharedStore) -> Result<Self> {
        let stored: Option<Vec<Habit>> =
            load_json(store.as_ref(), keys::HABITS).context("Loading habits")?;
        let last_active_day =
            load_json(store.as_ref(), keys::LAST_HABIT_DATE).context("Loading last habit date")?;

        let mut habit_store = Self {
            store,
            habits: Vec::new(),
            last_active_day,
        };
        match stored {
            Some(habits) => habit_store.habits = habits,
            None => {
                info!("No habits stored, seeding the starter habit");
                habit_store.habits = vec![Habit::starter()];
                habit_store.save()?;
            }
        }
        Ok(habit_store)
    }

    pub fn all(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Append a habit. A duplicate id is refused and reported as `false`.
    pub fn add(&mut self, habit: Habit) -> Result<bool> {
        if self.get(&habit.id).is_some() {
            warn!("Habit '{}' already exists, not adding", habit.id);
            return Ok(false);
        }
        self.habits.push(habit);
        self.save()?;
        Ok(true)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);
        if self.habits.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Mark done, bump the streak and log today's mood.
    pub fn complete(&mut self, id: &str, mood: Mood, today: NaiveDate) -> Result<Option<Habit>> {
        let Some(habit) = self.habits.iter_mut().find(|h| h.id == id) else {
            debug!("complete: unknown habit '{}'", id);
            return Ok(None);
        };

        habit.completed = true;
        habit.streak += 1;
        habit.history.push(HabitLog {
            date: day_key(today),
            mood,
        });
        let updated = habit.clone();

        self.save()?;
        Ok(Some(updated))
    }

    /// Remember the stat change today's completion applied.
    pub fn record_stat_gain(&mut self, id: &str, gain: f64) -> Result<Option<Habit>> {
        let Some(habit) = self.habits.iter_mut().find(|h| h.id == id) else {
            return Ok(None);
        };
        habit.stat_gain = gain;
        let updated = habit.clone();

        self.save()?;
        Ok(Some(updated))
    }

    /// Undo a completion. The history entry written by `complete` stays.
    pub fn uncomplete(&mut self, id: &str) -> Result<Option<Habit>> {
        let Some(habit) = self.habits.iter_mut().find(|h| h.id == id) else {
            debug!("uncomplete: unknown habit '{}'", id);
            return Ok(None);
        };

        habit.completed = false;
        habit.streak = habit.streak.saturating_sub(1);
        habit.stat_gain = 0.0;
        let updated = habit.clone();

        self.save()?;
        Ok(Some(updated))
    }

    /// Roll the habit list over to `today` if the stored marker is older.
    /// Returns `true` when a new day was detected.
    pub fn check_date_and_reset(&mut self, today: NaiveDate) -> Result<bool> {
        let today_key = day_key(today);
        if self.last_active_day.as_deref() == Some(today_key.as_str()) {
            return Ok(false);
        }

        info!("New day detected ({}), resetting habits", today_key);
        for habit in &mut self.habits {
            // Only "daily" habits are streak-checked; other frequencies keep theirs.
            if habit.is_daily() && !habit.completed && habit.streak > 0 {
                debug!("Streak broken for '{}' (was {})", habit.title, habit.streak);
                habit.streak = 0;
            }
            habit.completed = false;
            habit.stat_gain = 0.0;
        }

        self.save()?;
        save_json(self.store.as_ref(), keys::LAST_HABIT_DATE, &today_key)
            .context("Saving last habit date")?;
        self.last_active_day = Some(today_key);
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        save_json(self.store.as_ref(), keys::HABITS, &self.habits).context("Saving habits")
    }
}
