use log::debug;
use std::sync::mpsc;

use crate::models::Achievement;

/// Fan-out channel for achievements that just became completed.
///
/// Every subscriber gets its own receiver and owns its consumption state;
/// several completions in one operation are all delivered in order.
#[derive(Debug, Default)]
pub struct UnlockFeed {
    subscribers: Vec<mpsc::Sender<Achievement>>,
}

impl UnlockFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> UnlockListener {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        UnlockListener { rx }
    }

    pub fn publish(&mut self, achievement: &Achievement) {
        debug!("Achievement unlocked: {} ({})", achievement.title, achievement.id);
        // Dropped listeners disconnect their sender; prune them here.
        self.subscribers
            .retain(|tx| tx.send(achievement.clone()).is_ok());
    }
}

pub struct UnlockListener {
    rx: mpsc::Receiver<Achievement>,
}

impl UnlockListener {
    /// Take everything published since the last drain, without blocking.
    pub fn drain(&self) -> Vec<Achievement> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AchievementType;

    fn achievement(id: &str) -> Achievement {
        Achievement {
            id: id.to_string(),
            group_id: "g".to_string(),
            tier: 1,
            title: id.to_string(),
            description: String::new(),
            achievement_type: AchievementType::Count,
            target_id: None,
            target_value: 1,
            current_value: 1,
            xp_reward: 10,
            completed: true,
            claimed: false,
            is_dynamic: false,
            claimed_at: None,
        }
    }

    #[test]
    fn every_listener_sees_every_unlock() {
        let mut feed = UnlockFeed::new();
        let a = feed.subscribe();
        let b = feed.subscribe();

        feed.publish(&achievement("one"));
        feed.publish(&achievement("two"));

        let ids: Vec<_> = a.drain().into_iter().map(|x| x.id).collect();
        assert_eq!(ids, vec!["one", "two"]);
        assert_eq!(b.drain().len(), 2);
        assert!(a.drain().is_empty());
    }

    #[test]
    fn dropped_listener_is_pruned() {
        let mut feed = UnlockFeed::new();
        let keep = feed.subscribe();
        drop(feed.subscribe());

        feed.publish(&achievement("one"));
        assert_eq!(feed.subscribers.len(), 1);
        assert_eq!(keep.drain().len(), 1);
    }
}
