//! Shared CLI helpers — reply printing, banner, thinking indicator.

use colored::Colorize;

use switchboard_core::types::CompletionResult;

/// Print a completion reply, tagged with the provider that answered.
pub fn print_reply(reply: &CompletionResult) {
    println!();
    if reply.is_offline() {
        println!(
            "{} {}",
            "⚡ Switchboard".cyan().bold(),
            "(offline)".yellow().bold()
        );
        println!("{}", reply.text.yellow());
    } else {
        println!(
            "{} {}",
            "⚡ Switchboard".cyan().bold(),
            format!("via {}", reply.provider_name()).dimmed()
        );
        println!("{}", reply.text);
    }
    println!();
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "⚡ Switchboard".cyan().bold(), version.dimmed());
    println!("{}", "Type a message, or \"exit\" to quit.".dimmed());
    println!();
}

/// Print a "thinking" placeholder while providers are tried.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

/// Coloured ✓ / · marker used by `status` and `onboard`.
pub fn mark(ok: bool, ok_text: &str, missing_text: &str) -> String {
    if ok {
        format!("{} {}", "✓".green(), ok_text)
    } else {
        format!("{}", format!("· {missing_text}").dimmed())
    }
}
