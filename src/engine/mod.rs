pub mod achievements;
pub mod buffs;
pub mod character;
pub mod coordinator;
pub mod events;
pub mod habits;
pub mod inventory;
pub mod streak;

pub use coordinator::ProgressionCoordinator;
