//! Helpers over `chat.history` transcripts.
//!
//! Messages arrive as loose JSON: a `role` string and `content` that is
//! either plain text or a list of typed blocks.

use serde_json::Value;

const REASONING_TAGS: [(&str, &str); 2] = [("<think>", "</think>"), ("<thinking>", "</thinking>")];

/// Whether a transcript entry was produced by a tool
pub fn is_tool_message(message: &Value) -> bool {
    let role = message.get("role").and_then(Value::as_str).unwrap_or_default();
    matches!(role, "tool" | "toolResult") || message.get("toolCallId").is_some()
}

/// Drop tool-originated entries, keeping order
pub fn strip_tool_messages(messages: &[Value]) -> Vec<&Value> {
    messages.iter().filter(|m| !is_tool_message(m)).collect()
}

/// Text the assistant wrote in `message`, if it is an assistant message
pub fn extract_assistant_text(message: &Value) -> Option<String> {
    if message.get("role").and_then(Value::as_str) != Some("assistant") {
        return None;
    }

    let raw = match message.get("content")? {
        Value::String(text) => text.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => return None,
    };

    let text = strip_reasoning(&raw);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Reply of the last non-tool message in a `chat.history` payload
pub fn latest_reply(history: &Value) -> Option<String> {
    let messages = history.get("messages")?.as_array()?;
    strip_tool_messages(messages)
        .last()
        .and_then(|m| extract_assistant_text(m))
}

fn strip_reasoning(text: &str) -> String {
    let mut out = text.to_string();
    for (open, close) in REASONING_TAGS {
        while let Some(start) = out.find(open) {
            match out[start..].find(close) {
                Some(offset) => out.replace_range(start..start + offset + close.len(), ""),
                // Unterminated block: everything after the tag is reasoning
                None => out.truncate(start),
            }
        }
    }
    out
}
