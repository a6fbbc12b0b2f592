//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, input loading, JSON output)
//! - `reports` - Insight commands (summary, forecast, anomalies, behavior, budgets, recommend, report)
//! - `serve` - Web server command

pub mod core;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use core::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a fraction as a whole-number percentage
pub fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}
