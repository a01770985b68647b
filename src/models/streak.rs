use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    pub current_streak: u32,
    pub last_visit: Option<String>,
    #[serde(default)]
    pub history: BTreeSet<String>,
}

/// One cell of the Sunday..Saturday check-in strip.
#[derive(Debug, Clone, PartialEq)]
pub struct DayStatus {
    pub name: &'static str,
    pub visited: bool,
    pub is_today: bool,
}
