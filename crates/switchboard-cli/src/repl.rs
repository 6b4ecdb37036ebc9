//! Interactive chat REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history. The
//! whole conversation is resent on every turn so providers keep context.

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use switchboard_core::types::ConversationTurn;
use switchboard_core::utils::get_history_path;
use switchboard_providers::CompletionGateway;

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// Clears the conversation without leaving the REPL.
const RESET_COMMAND: &str = "/reset";

/// Run the interactive REPL loop.
pub async fn run(gateway: CompletionGateway, template: Option<&str>) -> Result<()> {
    helpers::print_banner();

    let mut editor = create_editor()?;
    let mut conversation: Vec<ConversationTurn> = Vec::new();

    loop {
        let input = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => break,
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_exit_command(trimmed) {
            println!("\nGoodbye! 👋");
            break;
        }

        let _ = editor.add_history_entry(&input);

        if trimmed.eq_ignore_ascii_case(RESET_COMMAND) {
            conversation.clear();
            println!("(conversation cleared)\n");
            continue;
        }

        debug!(turns = conversation.len(), "processing input");
        helpers::print_thinking();

        conversation.push(ConversationTurn::user(trimmed));
        let reply = gateway.complete(&conversation, template).await;

        helpers::clear_thinking();
        helpers::print_reply(&reply);
        record_reply(&mut conversation, &reply.text, reply.is_offline());
    }

    save_history(&mut editor);

    Ok(())
}

/// Keep a real reply in the conversation. An offline notice is not a reply,
/// so the unanswered user turn is dropped too and can simply be retyped.
fn record_reply(conversation: &mut Vec<ConversationTurn>, text: &str, offline: bool) {
    if offline {
        conversation.pop();
    } else {
        conversation.push(ConversationTurn::assistant(text));
    }
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = get_history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = get_history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Check if input is an exit command.
fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_core::types::Role;

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("EXIT"));
        assert!(is_exit_command("/quit"));
        assert!(is_exit_command(":q"));
        assert!(!is_exit_command("hello"));
        assert!(!is_exit_command(""));
    }

    #[test]
    fn test_record_reply_keeps_answer() {
        let mut conv = vec![ConversationTurn::user("hi")];
        record_reply(&mut conv, "Hello!", false);
        assert_eq!(conv.len(), 2);
        assert_eq!(conv[1].role, Role::Assistant);
    }

    #[test]
    fn test_record_offline_drops_user_turn() {
        let mut conv = vec![
            ConversationTurn::user("hi"),
            ConversationTurn::assistant("Hello!"),
            ConversationTurn::user("still there?"),
        ];
        record_reply(&mut conv, "offline", true);
        assert_eq!(conv.len(), 2);
        assert_eq!(conv[1].content, "Hello!");
    }
}
