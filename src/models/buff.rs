use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuffType {
    Buff,
    Debuff,
    Challenge,
    Tradeoff,
}

impl BuffType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuffType::Buff => "buff",
            BuffType::Debuff => "debuff",
            BuffType::Challenge => "challenge",
            BuffType::Tradeoff => "tradeoff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buff {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "type")]
    pub buff_type: BuffType,
    /// 1.5 = +50% XP
    pub xp_multiplier: f64,
    /// 0.5 = -50% stat gain
    pub stat_multiplier: f64,
}
