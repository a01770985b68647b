/// Format a stat to one decimal place
pub fn format_stat(value: f64) -> String {
    format!("{:.1}", value)
}

/// Format a multiplier as a signed percentage: 1.5 -> "+50%", 0.8 -> "-20%"
pub fn format_multiplier(m: f64) -> String {
    let pct = ((m - 1.0) * 100.0).round() as i64;
    if pct >= 0 {
        format!("+{}%", pct)
    } else {
        format!("{}%", pct)
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u64, total: u64, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}
