use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "habitquest", version, author, about = "Turn your daily habits into an RPG character sheet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Character sheet, check-in streak and active buff
    Status,
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: HabitCommands,
    },
    /// Show the active tier of every achievement chain
    Quests,
    /// Claim a completed achievement for its XP
    Claim {
        /// Achievement id (see `quests`)
        id: String,
    },
    /// Show claimed achievements, newest first
    Trophies,
    /// Show held items and gold, or use, sell or drop one
    Inventory {
        #[command(subcommand)]
        action: Option<InventoryCommands>,
    },
    /// Open a reward chest
    Chest,
    /// Daily buff selection
    Buff {
        #[command(subcommand)]
        action: BuffCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum HabitCommands {
    /// List habits with today's state
    List,
    /// Add a new habit
    Add {
        /// Habit title
        title: String,
        #[arg(long, default_value = "star")]
        icon: String,
        /// Kind: regular or random
        #[arg(long, default_value = "regular")]
        kind: String,
        /// Free-text frequency; only "daily" habits lose their streak on a missed day
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Reward tier: low, medium or high
        #[arg(long, default_value = "low")]
        reward: String,
        /// Stat trained: strength, intelligence, constitution, dexterity, charisma
        #[arg(long, default_value = "constitution")]
        stat: String,
        /// Difficulty: easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: String,
    },
    /// Delete a habit by id
    Delete {
        id: String,
    },
    /// Mark a habit as done for today
    Done {
        id: String,
        /// Mood: sad, neutral or happy
        #[arg(long, default_value = "neutral")]
        mood: String,
    },
    /// Undo today's completion
    Undo {
        id: String,
    },
    /// Show one habit with its recent history
    Show {
        id: String,
        /// How many days back to show
        #[arg(long, default_value_t = 14)]
        days: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum InventoryCommands {
    /// Use one consumable
    Use {
        /// Item id (see `inventory`)
        id: String,
    },
    /// Sell one item for its value in gold
    Sell {
        id: String,
    },
    /// Throw one item away
    Drop {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BuffCommands {
    /// List the buffs you can pick from
    List,
    /// Activate a buff for the rest of the day
    Set {
        /// Buff id
        id: String,
    },
    /// Remove the active buff
    Clear,
}
