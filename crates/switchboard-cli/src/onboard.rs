//! `switchboard onboard` — initialize configuration.
//!
//! Creates `~/.switchboard/config.json` with defaults and the history
//! directory used by the chat REPL. Existing files are left alone.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use switchboard_core::config::{get_config_path, save_config, Config};
use switchboard_core::utils::get_history_path;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "⚡ Switchboard — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();
    if write_default_config(&config_path)? {
        println!("  {} created config at {}", "✓".green(), config_path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    if let Some(history_dir) = get_history_path().parent() {
        std::fs::create_dir_all(history_dir)?;
        println!("  {} history dir at {}", "✓".green(), history_dir.display());
    }

    println!();
    println!("  Next steps:");
    println!(
        "    1. Add at least one API key under {} (or export {})",
        "providers".bold(),
        "OPENAI_API_KEY".bold()
    );
    println!(
        "    2. Optionally set {} to try one provider first",
        "assistant.preferredProvider".bold()
    );
    println!("    3. Add webhook subscribers under {}", "webhooks".bold());
    println!();
    println!(
        "{}",
        "  Setup complete! Run `switchboard chat` to start chatting.".green()
    );
    println!();

    Ok(())
}

/// Write a default config at `path` unless one exists. Returns whether it wrote.
///
/// Always writes `Config::default()`; environment credentials are not persisted.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))?;
    Ok(true)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert!(write_default_config(&path).unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("attemptTimeoutSecs"));
        assert!(content.contains("deliveryTimeoutSecs"));
    }

    #[test]
    fn test_existing_config_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{\"custom\": true}").unwrap();

        assert!(!write_default_config(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"custom\": true}");
    }
}
