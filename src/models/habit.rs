use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKey {
    Strength,
    Intelligence,
    Constitution,
    Dexterity,
    Charisma,
}

impl StatKey {
    pub fn all() -> [StatKey; 5] {
        [
            StatKey::Strength,
            StatKey::Intelligence,
            StatKey::Constitution,
            StatKey::Dexterity,
            StatKey::Charisma,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::Strength => "strength",
            StatKey::Intelligence => "intelligence",
            StatKey::Constitution => "constitution",
            StatKey::Dexterity => "dexterity",
            StatKey::Charisma => "charisma",
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            StatKey::Strength => "STR",
            StatKey::Intelligence => "INT",
            StatKey::Constitution => "CON",
            StatKey::Dexterity => "DEX",
            StatKey::Charisma => "CHA",
        }
    }
}

impl std::fmt::Display for StatKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strength" | "str" => Ok(StatKey::Strength),
            "intelligence" | "int" => Ok(StatKey::Intelligence),
            "constitution" | "con" => Ok(StatKey::Constitution),
            "dexterity" | "dex" => Ok(StatKey::Dexterity),
            "charisma" | "cha" => Ok(StatKey::Charisma),
            _ => Err(anyhow::anyhow!("Unknown stat: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Base stat change for one completion.
    pub fn stat_delta(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.1,
            Difficulty::Medium => 0.3,
            Difficulty::Hard => 0.5,
        }
    }
}

impl FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(anyhow::anyhow!("Unknown difficulty: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardTier {
    Low,
    Medium,
    High,
}

impl RewardTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardTier::Low => "low",
            RewardTier::Medium => "medium",
            RewardTier::High => "high",
        }
    }
}

impl FromStr for RewardTier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RewardTier::Low),
            "medium" => Ok(RewardTier::Medium),
            "high" => Ok(RewardTier::High),
            _ => Err(anyhow::anyhow!("Unknown reward tier: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    Regular,
    Random,
}

impl HabitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitKind::Regular => "regular",
            HabitKind::Random => "random",
        }
    }
}

impl FromStr for HabitKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regular" => Ok(HabitKind::Regular),
            "random" => Ok(HabitKind::Random),
            _ => Err(anyhow::anyhow!("Unknown habit kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Sad,
    Neutral,
    Happy,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
            Mood::Happy => "happy",
        }
    }
}

impl FromStr for Mood {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sad" => Ok(Mood::Sad),
            "neutral" | "ok" => Ok(Mood::Neutral),
            "happy" => Ok(Mood::Happy),
            _ => Err(anyhow::anyhow!("Unknown mood: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitLog {
    pub date: String,
    pub mood: Mood,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: HabitKind,
    /// Free text: "daily", "weekly", "3x/week", ...
    pub frequency: String,
    pub reward: RewardTier,
    pub completed: bool,
    pub streak: u32,
    #[serde(default)]
    pub history: Vec<HabitLog>,
    pub associated_stat: StatKey,
    pub difficulty: Difficulty,
    /// Stat change credited by today's completion; undo takes back exactly this.
    #[serde(default)]
    pub stat_gain: f64,
}

impl Habit {
    pub fn is_daily(&self) -> bool {
        self.frequency == "daily"
    }

    pub fn starter() -> Self {
        Habit {
            id: "default_water".to_string(),
            title: "Drink Water".to_string(),
            icon: "water".to_string(),
            kind: HabitKind::Regular,
            frequency: "daily".to_string(),
            reward: RewardTier::Low,
            completed: false,
            streak: 0,
            history: Vec::new(),
            associated_stat: StatKey::Constitution,
            difficulty: Difficulty::Medium,
            stat_gain: 0.0,
        }
    }
}
