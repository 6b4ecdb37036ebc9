//! Prompt template merging.
//!
//! Call sites such as "rewrite this section" or "draft a meta description"
//! send a template alongside the conversation. The template is folded into
//! the final turn so that every provider sees the same single prompt.

use switchboard_core::types::ConversationTurn;

/// Label placed between the template and the original request.
const USER_REQUEST_LABEL: &str = "User request: ";

/// Merge `template` into the last turn of `conversation`.
///
/// The new last-turn content is `template + "\n\n" + "User request: " + original`.
/// Returns an unchanged copy when there is no template (or it is empty) or
/// the conversation is empty. The input slice is never modified.
pub fn augment(conversation: &[ConversationTurn], template: Option<&str>) -> Vec<ConversationTurn> {
    let mut turns = conversation.to_vec();

    let template = match template {
        Some(t) if !t.is_empty() => t,
        _ => return turns,
    };

    if let Some(last) = turns.last_mut() {
        last.content = format!("{}\n\n{}{}", template, USER_REQUEST_LABEL, last.content);
    }

    turns
}
