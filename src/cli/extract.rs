//! Extract command implementation
//!
//! Flattens the first few conversations of a chunk into a readable transcript:
//!
//! ```text
//!
//! === CONVERSATION 1: Title ===
//! USER: question
//!
//! ASSISTANT: answer
//!
//! ```

use anyhow::{Context, Result};
use serde_json::Value;

use crate::config::{expand_path, ExtractConfig};
use crate::export::{ordered_nodes, read_conversations, Conversation};

/// Render the transcript for the first `max_conversations` conversations
pub fn render_transcript(conversations: &[Value], config: &ExtractConfig) -> String {
    conversations
        .iter()
        .take(config.max_conversations)
        .enumerate()
        .map(|(i, value)| render_conversation(i + 1, &Conversation::new(value), config))
        .collect()
}

/// Render one conversation section.
///
/// Once the body grows past `max_chars` the marker is appended and the
/// remaining nodes are skipped; the node that crossed the budget is kept.
pub fn render_conversation(
    index: usize,
    conversation: &Conversation<'_>,
    config: &ExtractConfig,
) -> String {
    let title = match conversation.title() {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "Untitled".to_string(),
    };

    let mut section = format!("\n=== CONVERSATION {}: {} ===\n", index, title);
    let mut body = String::new();
    let mut chars = 0usize;

    for node in ordered_nodes(conversation, config.node_order) {
        let Some(message) = node.message() else {
            continue;
        };
        let role = message.role().to_uppercase();
        for part in message.text_parts() {
            let line = format!("{}: {}\n\n", role, part);
            chars += line.chars().count();
            body.push_str(&line);
        }
        if chars > config.max_chars {
            tracing::debug!(index, chars, "conversation text truncated");
            body.push('\n');
            body.push_str(&config.truncation_marker);
            body.push('\n');
            break;
        }
    }

    section.push_str(&body);
    section
}

pub fn run(config: &ExtractConfig) -> Result<usize> {
    let input = expand_path(&config.input);
    let output = expand_path(&config.output);

    let conversations = read_conversations(&input)?;
    let transcript = render_transcript(&conversations, config);
    std::fs::write(&output, transcript)
        .with_context(|| format!("writing `{}`", output.display()))?;

    let rendered = conversations.len().min(config.max_conversations);
    println!("Wrote {} with {} conversations", output.display(), rendered);
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeOrder;
    use serde_json::json;

    fn message(role: &str, parts: Value) -> Value {
        json!({"message": {"author": {"role": role}, "content": {"parts": parts}}})
    }

    #[test]
    fn test_empty_mapping_renders_header_only() {
        let items = vec![json!({"title": "A", "create_time": "100", "mapping": {}})];
        let transcript = render_transcript(&items, &ExtractConfig::default());
        assert_eq!(transcript, "\n=== CONVERSATION 1: A ===\n");
    }

    #[test]
    fn test_renders_roles_and_string_parts() {
        let value = json!({
            "mapping": {
                "root": {"message": null},
                "a": message("user", json!(["Hallo", {"asset": "img"}])),
                "b": {"message": {"content": {"parts": ["anon"]}}},
                "c": message("assistant", json!(["Grüß dich", "zweiter Teil"]))
            }
        });
        let section = render_conversation(2, &Conversation::new(&value), &ExtractConfig::default());
        assert_eq!(
            section,
            "\n=== CONVERSATION 2: Untitled ===\n\
             USER: Hallo\n\n\
             UNKNOWN: anon\n\n\
             ASSISTANT: Grüß dich\n\n\
             ASSISTANT: zweiter Teil\n\n"
        );
    }

    #[test]
    fn test_budget_keeps_crossing_node_then_stops() {
        let value = json!({
            "title": "long",
            "mapping": {
                "a": message("user", json!(["aaaa"])),
                "b": message("user", json!(["bbbb"])),
                "c": message("user", json!(["cccc"]))
            }
        });
        // each line is "USER: xxxx\n\n" = 12 chars
        let config = ExtractConfig {
            max_chars: 20,
            truncation_marker: "[CUT]".to_string(),
            ..ExtractConfig::default()
        };
        let section = render_conversation(1, &Conversation::new(&value), &config);
        assert_eq!(
            section,
            "\n=== CONVERSATION 1: long ===\nUSER: aaaa\n\nUSER: bbbb\n\n\n[CUT]\n"
        );
    }

    #[test]
    fn test_budget_counts_characters_not_bytes() {
        let value = json!({"mapping": {"a": message("user", json!(["ääää"]))}});
        let config = ExtractConfig {
            max_chars: 12,
            ..ExtractConfig::default()
        };
        let section = render_conversation(1, &Conversation::new(&value), &config);
        assert!(!section.contains("[TEXT GEKÜRZT]"));
    }

    #[test]
    fn test_limits_conversation_count() {
        let items: Vec<Value> = (0..8).map(|i| json!({"title": format!("t{i}")})).collect();
        let transcript = render_transcript(&items, &ExtractConfig::default());
        assert_eq!(transcript.matches("=== CONVERSATION").count(), 5);
        assert!(transcript.contains("CONVERSATION 5: t4"));
        assert!(!transcript.contains("t5"));
    }

    #[test]
    fn test_null_title_falls_back_to_untitled() {
        let items = vec![json!({"title": null, "mapping": {}})];
        let transcript = render_transcript(&items, &ExtractConfig::default());
        assert_eq!(transcript, "\n=== CONVERSATION 1: Untitled ===\n");
    }

    #[test]
    fn test_non_string_title_rendered_as_json() {
        let items = vec![json!({"title": 42})];
        let transcript = render_transcript(&items, &ExtractConfig::default());
        assert_eq!(transcript, "\n=== CONVERSATION 1: 42 ===\n");
    }

    #[test]
    fn test_thread_order_option() {
        let value = json!({
            "current_node": "b",
            "mapping": {
                "b": {"parent": "a", "message": {"author": {"role": "assistant"}, "content": {"parts": ["reply"]}}},
                "a": {"parent": null, "message": {"author": {"role": "user"}, "content": {"parts": ["ask"]}}}
            }
        });
        let config = ExtractConfig {
            node_order: NodeOrder::Thread,
            ..ExtractConfig::default()
        };
        let section = render_conversation(1, &Conversation::new(&value), &config);
        assert!(section.ends_with("USER: ask\n\nASSISTANT: reply\n\n"));
    }

    #[test]
    fn test_run_writes_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("chunk.json");
        std::fs::write(&input, r#"[{"title":"A","mapping":{}},{"title":"B","mapping":{}}]"#).unwrap();

        let config = ExtractConfig {
            input: input.to_string_lossy().into_owned(),
            output: dir.path().join("plain.txt").to_string_lossy().into_owned(),
            ..ExtractConfig::default()
        };
        assert_eq!(run(&config).unwrap(), 2);
        let written = std::fs::read_to_string(dir.path().join("plain.txt")).unwrap();
        assert_eq!(written, "\n=== CONVERSATION 1: A ===\n\n=== CONVERSATION 2: B ===\n");
    }
}
