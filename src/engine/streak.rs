//! Daily check-in streak, separate from per-habit streaks.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use log::debug;

use crate::db::port::{keys, load_json, save_json, SharedStore};
use crate::models::{DayStatus, StreakData};
use crate::utils::dates::{day_key, is_day_before, week_start_sunday};

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub struct StreakTracker {
    store: SharedStore,
    data: StreakData,
}

impl StreakTracker {
    pub fn load(store: SharedStore) -> Result<Self> {
        let data = load_json(store.as_ref(), keys::STREAK_DATA)
            .context("Loading streak data")?
            .unwrap_or_default();
        Ok(Self { store, data })
    }

    pub fn data(&self) -> &StreakData {
        &self.data
    }

    /// Register an activation on `today` and return the streak.
    pub fn check_in(&mut self, today: NaiveDate) -> Result<u32> {
        let today_key = day_key(today);

        if self.data.last_visit.as_deref() == Some(today_key.as_str()) {
            return Ok(self.data.current_streak);
        }

        let consecutive = self
            .data
            .last_visit
            .as_deref()
            .is_some_and(|last| is_day_before(last, today));

        self.data.current_streak = if consecutive {
            self.data.current_streak + 1
        } else {
            1
        };
        debug!(
            "Check-in on {}: streak {}",
            today_key, self.data.current_streak
        );

        self.data.history.insert(today_key.clone());
        self.data.last_visit = Some(today_key);
        save_json(self.store.as_ref(), keys::STREAK_DATA, &self.data)
            .context("Saving streak data")?;
        Ok(self.data.current_streak)
    }

    /// Sunday..Saturday of the week containing `today`.
    pub fn week_progress(&self, today: NaiveDate) -> Vec<DayStatus> {
        let start = week_start_sunday(today);
        DAY_NAMES
            .iter()
            .enumerate()
            .map(|(i, &name)| {
                let date = start + Duration::days(i as i64);
                DayStatus {
                    name,
                    visited: self.data.history.contains(&day_key(date)),
                    is_today: date == today,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::port::MemoryStore;
    use crate::utils::dates::parse_day_key;
    use std::rc::Rc;

    fn date(s: &str) -> NaiveDate {
        parse_day_key(s).unwrap()
    }

    fn tracker() -> StreakTracker {
        StreakTracker::load(Rc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_first_check_in_starts_at_one() {
        let mut t = tracker();
        assert_eq!(t.check_in(date("2026-10-19")).unwrap(), 1);
    }

    #[test]
    fn test_same_day_is_unchanged() {
        let mut t = tracker();
        t.check_in(date("2026-10-19")).unwrap();
        assert_eq!(t.check_in(date("2026-10-19")).unwrap(), 1);
        assert_eq!(t.data().history.len(), 1);
    }

    #[test]
    fn test_consecutive_days_increment() {
        let mut t = tracker();
        t.check_in(date("2026-10-19")).unwrap();
        t.check_in(date("2026-10-20")).unwrap();
        assert_eq!(t.check_in(date("2026-10-21")).unwrap(), 3);
    }

    #[test]
    fn test_gap_resets_to_one() {
        let mut t = tracker();
        t.check_in(date("2026-10-19")).unwrap();
        t.check_in(date("2026-10-20")).unwrap();
        assert_eq!(t.check_in(date("2026-10-23")).unwrap(), 1);
        assert_eq!(t.data().history.len(), 3);
    }

    #[test]
    fn test_week_progress_marks_visits() {
        let mut t = tracker();
        t.check_in(date("2026-10-19")).unwrap();
        t.check_in(date("2026-10-20")).unwrap();

        let week = t.week_progress(date("2026-10-20"));
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].name, "Sun");
        assert!(!week[0].visited);
        assert!(week[1].visited);
        assert!(week[2].visited && week[2].is_today);
        assert!(!week[3].visited);
    }
}
