pub mod achievement;
pub mod buff;
pub mod character;
pub mod habit;
pub mod item;
pub mod streak;

pub use achievement::{Achievement, AchievementType};
pub use buff::{Buff, BuffType};
pub use character::CharacterState;
pub use habit::{Difficulty, Habit, HabitKind, HabitLog, Mood, RewardTier, StatKey};
pub use item::{Item, ItemType, Rarity};
pub use streak::{DayStatus, StreakData};
