use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementType {
    Streak,
    Count,
    Collection,
}

impl AchievementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementType::Streak => "streak",
            AchievementType::Count => "count",
            AchievementType::Collection => "collection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub group_id: String,
    pub tier: u32,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub achievement_type: AchievementType,
    /// Catalog item id, collection achievements only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    pub target_value: u32,
    pub current_value: u32,
    pub xp_reward: u32,
    pub completed: bool,
    pub claimed: bool,
    #[serde(default)]
    pub is_dynamic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn is_claimable(&self) -> bool {
        self.completed && !self.claimed
    }
}
