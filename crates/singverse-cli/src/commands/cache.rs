//! Cache management commands

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use crate::cache::CacheManager;

/// Clear render entries, and the verse data too with `all`
pub fn clear(all: bool) -> Result<ExitCode> {
    let cache_mgr = CacheManager::new()?;

    println!("{}", "Clearing offline cache...".cyan().bold());

    let had_data = cache_mgr.has_data();
    let count = cache_mgr.clear(all)?;

    if count == 0 && !(all && had_data) {
        println!("  {}", "Cache is already empty".dimmed());
    } else {
        println!(
            "  {} Removed {} render {}",
            "SUCCESS".green().bold(),
            count,
            if count == 1 { "entry" } else { "entries" }
        );
        if all && had_data {
            println!("  {} Removed cached verse data", "SUCCESS".green().bold());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Show cache information
pub fn info(json: bool) -> Result<ExitCode> {
    let cache_mgr = CacheManager::new()?;
    let info = cache_mgr.info()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Cache Information".cyan().bold());
    println!(
        "  {}: {}",
        "Cache directory".dimmed(),
        info.cache_dir.display()
    );
    match &info.data {
        Some(data) => {
            println!("  {}: {}", "Verse data".dimmed(), data.source_url);
            println!("  {}: {}", "Fetched at".dimmed(), data.fetched_at);
            println!(
                "  {}: {} books, {} verses ({})",
                "Contents".dimmed(),
                data.book_count,
                data.verse_count,
                format_size(info.data_size_bytes)
            );
        }
        None => println!("  {}: {}", "Verse data".dimmed(), "not cached".yellow()),
    }
    println!("  {}: {}", "Render entries".dimmed(), info.entry_count);
    println!(
        "  {}: {}",
        "Render size".dimmed(),
        format_size(info.total_size_bytes)
    );

    Ok(ExitCode::SUCCESS)
}

fn format_size(bytes: u64) -> String {
    let size_mb = bytes as f64 / (1024.0 * 1024.0);
    if size_mb >= 1.0 {
        format!("{:.2} MB", size_mb)
    } else {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
