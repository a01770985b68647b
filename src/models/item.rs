use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Consumable,
    Equipment,
    Material,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Consumable => "consumable",
            ItemType::Equipment => "equipment",
            ItemType::Material => "material",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub description: String,
    pub sell_value: u32,
    pub rarity: Rarity,
    pub quantity: i64,
}
