use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use std::str::FromStr;

use crate::cli::args::{BuffCommands, HabitCommands, InventoryCommands};
use crate::engine::buffs::catalog;
use crate::engine::coordinator::ProgressionCoordinator;
use crate::engine::inventory::{base_item_id, ItemLedger};
use crate::engine::events::UnlockListener;
use crate::models::{Achievement, AchievementType, Difficulty, Habit, HabitKind, Mood, Rarity, RewardTier, StatKey};
use crate::utils::dates::day_key;
use crate::utils::format::{format_multiplier, format_stat, progress_bar};
use crate::utils::ids::habit_id;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";
const PURPLE: &str = "\x1b[35m";

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn handle_status(coord: &ProgressionCoordinator, today: NaiveDate) -> Result<()> {
    let state = coord.character().state();

    println!();
    println_colored!(GOLD, "  Level {}", state.level);
    println!(
        "  XP    {}  {}/{} ({:.0}%)",
        progress_bar(state.current_xp, state.max_xp, 20),
        state.current_xp,
        state.max_xp,
        state.progress_to_next() * 100.0
    );
    println!();
    for key in StatKey::all() {
        println!("  {}   {:>5}", key.abbrev(), format_stat(state.stats.get(key)));
    }

    println!();
    let streak = coord.streak().data().current_streak;
    println_colored!(BOLD, "  Check-in streak: {} day{}", streak, if streak == 1 { "" } else { "s" });
    print!("  ");
    for day in coord.streak().week_progress(today) {
        let dot = if day.visited { "●" } else { "○" };
        if day.is_today {
            print!("{}{} {}\x1b[0m  ", AMBER, day.name, dot);
        } else if day.visited {
            print!("{}{} {}\x1b[0m  ", GREEN, day.name, dot);
        } else {
            print!("{}{} {}\x1b[0m  ", DIM, day.name, dot);
        }
    }
    println!();

    println!();
    match coord.buffs().active() {
        Some(buff) => println_colored!(
            PURPLE,
            "  Buff: {}  (XP {}, stats {})",
            buff.name,
            format_multiplier(buff.xp_multiplier),
            format_multiplier(buff.stat_multiplier)
        ),
        None => println_colored!(DIM, "  No buff active"),
    }
    println_colored!(GOLD, "  Gold: {}", coord.inventory().gold());
    println!();
    Ok(())
}

// ─── Habits ──────────────────────────────────────────────────────────────────

pub fn handle_habit(
    coord: &mut ProgressionCoordinator,
    action: &HabitCommands,
    today: NaiveDate,
) -> Result<()> {
    match action {
        HabitCommands::List => {
            let habits = coord.habits().all();
            println!();
            if habits.is_empty() {
                println_colored!(DIM, "  No habits yet. Add one with `habitquest habit add <title>`");
            }
            for habit in habits {
                let mark = if habit.completed {
                    format!("{}✓\x1b[0m", GREEN)
                } else {
                    "○".to_string()
                };
                println!(
                    "  {}  {:<24} {:<10} {} {:<6} streak {}  {}",
                    mark,
                    habit.title,
                    habit.frequency,
                    habit.associated_stat.abbrev(),
                    habit.difficulty.as_str(),
                    habit.streak,
                    format!("{}{}\x1b[0m", DIM, habit.id)
                );
            }
            println!();
        }
        HabitCommands::Add {
            title,
            icon,
            kind,
            frequency,
            reward,
            stat,
            difficulty,
        } => {
            let habit = Habit {
                id: habit_id(title, &mut rand::thread_rng()),
                title: title.clone(),
                icon: icon.clone(),
                kind: HabitKind::from_str(kind)?,
                frequency: frequency.clone(),
                reward: RewardTier::from_str(reward)?,
                completed: false,
                streak: 0,
                history: Vec::new(),
                associated_stat: StatKey::from_str(stat)?,
                difficulty: Difficulty::from_str(difficulty)?,
                stat_gain: 0.0,
            };
            let id = habit.id.clone();
            if coord.add_habit(habit)? {
                println_colored!(GREEN, "  ✓ Added habit: {} ({})", title, id);
            } else {
                println_colored!(AMBER, "  Habit {} already exists", id);
            }
        }
        HabitCommands::Delete { id } => {
            if coord.delete_habit(id)? {
                println_colored!(GREEN, "  ✓ Deleted {}", id);
            } else {
                println_colored!(AMBER, "  No habit with id {}", id);
            }
        }
        HabitCommands::Done { id, mood } => {
            let mood = Mood::from_str(mood)?;
            let listener = coord.subscribe();
            match coord
                .complete_habit(id, mood, today)
                .with_context(|| format!("Completing habit {}", id))?
            {
                Some(outcome) => {
                    println_colored!(
                        GREEN,
                        "  ✓ {} done (streak {})",
                        outcome.habit.title,
                        outcome.habit.streak
                    );
                    println!(
                        "    {} is now {}",
                        outcome.habit.associated_stat.abbrev(),
                        format_stat(outcome.stat_value)
                    );
                    println_colored!(GOLD, "    +{} gold", outcome.loot.gold);
                    if let Some(item) = &outcome.loot.item {
                        println_colored!(rarity_color(item.rarity), "    + {}", item.name);
                    }
                }
                None => println_colored!(DIM, "  Nothing to do: unknown habit or already done today"),
            }
            print_unlocks(&listener);
        }
        HabitCommands::Undo { id } => match coord.uncomplete_habit(id)? {
            Some(habit) => {
                println_colored!(AMBER, "  ↺ {} unmarked (streak {})", habit.title, habit.streak);
            }
            None => println_colored!(DIM, "  {} is not completed", id),
        },
        HabitCommands::Show { id, days } => {
            let Some(habit) = coord.habits().get(id) else {
                println_colored!(AMBER, "  No habit with id {}", id);
                return Ok(());
            };
            println!();
            println_colored!(BOLD, "  {}  ({})", habit.title, habit.id);
            println!(
                "  {} · {} · {} {} · {} reward",
                habit.kind.as_str(),
                habit.frequency,
                habit.associated_stat.abbrev(),
                habit.difficulty.as_str(),
                habit.reward.as_str()
            );
            println!("  Streak {}  ·  {} completion(s) logged", habit.streak, habit.history.len());
            println!();
            for back in (0..i64::from(*days)).rev() {
                let day = day_key(today - Duration::days(back));
                match habit.history.iter().find(|log| log.date == day) {
                    Some(log) => println!("  {}  {}✓\x1b[0m {}", day, GREEN, log.mood.as_str()),
                    None => println!("  {}  {}✗\x1b[0m", day, DIM),
                }
            }
            println!();
        }
    }
    Ok(())
}

// ─── Quests ──────────────────────────────────────────────────────────────────

pub fn handle_quests(coord: &ProgressionCoordinator) -> Result<()> {
    println!();
    println_colored!(GOLD, "  Quests");
    println!();
    for a in coord.ladder().visible() {
        let status = if a.completed {
            format!("{}ready to claim\x1b[0m", GREEN)
        } else {
            format!(
                "{} {}/{}",
                progress_bar(u64::from(a.current_value), u64::from(a.target_value), 12),
                a.current_value,
                a.target_value
            )
        };
        println_colored!(BOLD, "  {}  {}", type_icon(a), a.title);
        println!(
            "    {}  ·  {} XP  ·  {}",
            a.description,
            a.xp_reward,
            a.achievement_type.as_str()
        );
        println!("    {}", status);
        println_colored!(DIM, "    {}", a.id);
        println!();
    }
    Ok(())
}

pub fn handle_claim(coord: &mut ProgressionCoordinator, id: &str) -> Result<()> {
    let listener = coord.subscribe();
    match coord.claim(id)? {
        Some(outcome) => {
            let title = coord.ladder().get(id).map(|a| a.title.as_str()).unwrap_or(id);
            println_colored!(GREEN, "  ✓ {}: claimed {} XP", title, outcome.xp);
            if outcome.levels_gained > 0 {
                println_colored!(
                    GOLD,
                    "  ★ Level up! You are now level {}",
                    coord.character().state().level
                );
            }
        }
        None => println_colored!(AMBER, "  {} cannot be claimed", id),
    }
    print_unlocks(&listener);
    Ok(())
}

pub fn handle_trophies(coord: &ProgressionCoordinator) -> Result<()> {
    let trophies = coord.ladder().trophy_case();
    println!();
    if trophies.is_empty() {
        println_colored!(DIM, "  The trophy case is empty");
        println!();
        return Ok(());
    }
    println_colored!(GOLD, "  Trophy Case ({})", trophies.len());
    println!();
    for a in trophies {
        let when = a
            .claimed_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!("  🏆 {:<28} tier {:<3} {}", a.title, a.tier, when);
    }
    println!();
    Ok(())
}

// ─── Inventory ───────────────────────────────────────────────────────────────

pub fn handle_inventory(
    coord: &mut ProgressionCoordinator,
    action: Option<&InventoryCommands>,
) -> Result<()> {
    let Some(action) = action else {
        return show_inventory(coord);
    };
    let listener = coord.subscribe();
    match action {
        InventoryCommands::Use { id } => match coord.use_item(id)? {
            Some(item) => println_colored!(GREEN, "  ✓ Used {}", item.name),
            None => explain_refusal(coord, id, "cannot be used"),
        },
        InventoryCommands::Sell { id } => match coord.sell_item(id)? {
            Some(item) => println_colored!(
                GOLD,
                "  ✓ Sold {} for {} gold (now {})",
                item.name,
                item.sell_value,
                coord.inventory().gold()
            ),
            None => explain_refusal(coord, id, "cannot be sold"),
        },
        InventoryCommands::Drop { id } => match coord.drop_item(id)? {
            Some(item) => println_colored!(AMBER, "  ✓ Dropped {}", item.name),
            None => explain_refusal(coord, id, "cannot be dropped"),
        },
    }
    print_unlocks(&listener);
    Ok(())
}

fn show_inventory(coord: &ProgressionCoordinator) -> Result<()> {
    let items = coord.inventory().items();
    println!();
    println_colored!(GOLD, "  Gold: {}", coord.inventory().gold());
    println!();
    if items.is_empty() {
        println_colored!(DIM, "  Your bag is empty");
    }
    for item in items {
        println_colored!(
            rarity_color(item.rarity),
            "  {:<16} x{:<4} {:<10} {:<11} {}",
            item.name,
            item.quantity,
            item.rarity.as_str(),
            item.item_type.as_str(),
            item.description
        );
        println_colored!(DIM, "    {}  ·  sells for {}", item.id, item.sell_value);
    }
    println!();
    Ok(())
}

fn explain_refusal(coord: &ProgressionCoordinator, id: &str, what: &str) {
    match coord.inventory().find(id) {
        Some(item) => println_colored!(
            AMBER,
            "  {} {} ({} held, {})",
            item.name,
            what,
            coord.inventory().held_quantity(base_item_id(&item.id)),
            item.item_type.as_str()
        ),
        None => println_colored!(RED, "  You are not holding '{}'", id),
    }
}

pub fn handle_chest(coord: &mut ProgressionCoordinator) -> Result<()> {
    let listener = coord.subscribe();
    let items = coord.open_chest()?;
    println!();
    println_colored!(GOLD, "  The chest creaks open...");
    for item in &items {
        println_colored!(rarity_color(item.rarity), "    + {}", item.name);
    }
    println!();
    print_unlocks(&listener);
    Ok(())
}

// ─── Buffs ───────────────────────────────────────────────────────────────────

pub fn handle_buff(coord: &mut ProgressionCoordinator, action: &BuffCommands) -> Result<()> {
    match action {
        BuffCommands::List => {
            let active = coord.buffs().active().map(|b| b.id.clone());
            println!();
            for buff in catalog() {
                let marker = if active.as_deref() == Some(buff.id.as_str()) { "▶" } else { " " };
                println_colored!(
                    BOLD,
                    "  {} {:<16} XP {:>5}  stats {:>5}  [{}]",
                    marker,
                    buff.name,
                    format_multiplier(buff.xp_multiplier),
                    format_multiplier(buff.stat_multiplier),
                    buff.buff_type.as_str()
                );
                println_colored!(DIM, "    {}  ({})", buff.description, buff.id);
            }
            println!();
        }
        BuffCommands::Set { id } => match coord.set_buff(id)? {
            Some(buff) => println_colored!(PURPLE, "  ✦ {} active until tomorrow", buff.name),
            None => println_colored!(RED, "  Unknown buff '{}'. See `habitquest buff list`", id),
        },
        BuffCommands::Clear => {
            coord.clear_buff()?;
            println_colored!(DIM, "  Buff cleared");
        }
    }
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn print_unlocks(listener: &UnlockListener) {
    for a in listener.drain() {
        println_colored!(GOLD, "  ★ Achievement unlocked: {} (claim with `habitquest claim {}`)", a.title, a.id);
    }
}

fn type_icon(a: &Achievement) -> &'static str {
    match a.achievement_type {
        AchievementType::Streak => "🔥",
        AchievementType::Count => "⚔",
        AchievementType::Collection => "📜",
    }
}

fn rarity_color(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "",
        Rarity::Rare => AMBER,
        Rarity::Legendary => PURPLE,
    }
}
