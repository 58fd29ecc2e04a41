//! Retrieval-augmented prompt assembly.

use crate::messages::ChatMessage;

/// Standing instruction for the DisToPia assistant.
pub const SYSTEM_PROMPT: &str = "You are the DisToPia world assistant. Answer questions about \
the DisToPia setting, its characters, species, and regions. Prefer the provided context \
when it is relevant, and say so when you do not know.";

/// Build the message list for one question.
///
/// Order: system prompt, retrieved context (numbered, omitted when empty),
/// prior history, then the question as the final user turn.
pub fn build_rag_messages(
    question: &str,
    context: &[String],
    history: &[ChatMessage],
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));

    if !context.is_empty() {
        messages.push(ChatMessage::system(format_context(context)));
    }

    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(question));
    messages
}

fn format_context(context: &[String]) -> String {
    let mut out = String::from("Relevant context:");
    for (i, doc) in context.iter().enumerate() {
        out.push_str(&format!("\n[{}] {}", i + 1, doc.trim()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Role;

    #[test]
    fn question_is_always_the_last_user_turn() {
        let history = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let messages = build_rag_messages("Who is Elara?", &[], &history);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1], ChatMessage::user("hi"));
        assert_eq!(messages[2], ChatMessage::assistant("hello"));
        assert_eq!(messages[3], ChatMessage::user("Who is Elara?"));
    }

    #[test]
    fn context_is_numbered_after_the_system_prompt() {
        let context = vec!["Elara is a scout.".to_string(), " Frostreach is cold. ".to_string()];
        let messages = build_rag_messages("q", &context, &[]);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::System);
        assert_eq!(
            messages[1].content,
            "Relevant context:\n[1] Elara is a scout.\n[2] Frostreach is cold."
        );
    }
}
