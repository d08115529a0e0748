//! Chat stream data
//!
//! Normalizes the message and task payloads delivered by the agent stream and
//! derives the small status values the chat pane shows. The streaming
//! connection itself sits behind [`ChatDriver`].

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a chat entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// Tool invocation requested by the assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

/// Chat entry as rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

/// Normalize raw stream messages.
///
/// `type: "human"` maps to [`Role::User`], `type: "tool"` to [`Role::Tool`],
/// anything else to [`Role::Assistant`]. Missing ids become `msg_{index}`.
pub fn normalize_messages(raw: &[Value]) -> Vec<ChatMessage> {
    raw.iter()
        .enumerate()
        .map(|(index, msg)| {
            let role = match msg.get("type").and_then(Value::as_str) {
                Some("human") => Role::User,
                Some("tool") => Role::Tool,
                _ => Role::Assistant,
            };
            let id = msg
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("msg_{}", index));
            let tool_calls = msg
                .get("tool_calls")
                .and_then(|v| serde_json::from_value::<Vec<ToolCall>>(v.clone()).ok())
                .unwrap_or_default();

            ChatMessage {
                id,
                role,
                content: message_text(msg.get("content").unwrap_or(&Value::Null)),
                tool_calls,
                tool_call_id: string_field(msg, "tool_call_id"),
                tool_name: string_field(msg, "name"),
            }
        })
        .collect()
}

fn string_field(msg: &Value, key: &str) -> Option<String> {
    msg.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Plain text of a message content payload.
///
/// Strings pass through; arrays contribute the `text` of each `{"type": "text"}`
/// part (bare strings in the array count as text too).
pub fn message_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(s) => Some(s.as_str()),
                Value::Object(obj) if obj.get("type").and_then(Value::as_str) == Some("text") => {
                    obj.get("text").and_then(Value::as_str)
                }
                _ => None,
            })
            .collect::<String>(),
        _ => String::new(),
    }
}

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// One entry of the agent's task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub content: String,
    pub status: TodoStatus,
}

/// Normalize raw task items; unknown statuses count as pending.
pub fn normalize_todos(raw: &[Value]) -> Vec<TodoItem> {
    raw.iter()
        .map(|item| {
            let status = match item.get("status").and_then(Value::as_str) {
                Some("in_progress") => TodoStatus::InProgress,
                Some("completed") => TodoStatus::Completed,
                _ => TodoStatus::Pending,
            };
            TodoItem {
                content: item
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                status,
            }
        })
        .collect()
}

/// Tasks not yet completed
pub fn open_todo_count(todos: &[TodoItem]) -> usize {
    todos
        .iter()
        .filter(|t| t.status != TodoStatus::Completed)
        .count()
}

/// True while the assistant's reply text is already arriving.
pub fn is_streaming_response(messages: &[ChatMessage], is_loading: bool) -> bool {
    is_loading
        && messages
            .last()
            .map(|m| m.role == Role::Assistant && !m.content.is_empty())
            .unwrap_or(false)
}

/// Thinking indicator: loading, but no reply text yet.
pub fn show_thinking_indicator(messages: &[ChatMessage], is_loading: bool) -> bool {
    is_loading && !is_streaming_response(messages, is_loading)
}

/// Status line shown while the agent works.
pub fn writing_status(is_loading: bool, changes_count: usize) -> Option<String> {
    if !is_loading {
        None
    } else if changes_count > 1 {
        Some(format!("Working ({} files)", changes_count))
    } else {
        Some("Working".to_string())
    }
}

/// Commands accepted by the streaming backend connection.
///
/// Both are fire-and-forget; results arrive later as new snapshots.
pub trait ChatDriver {
    fn send_message(&mut self, text: &str) -> Result<(), ApiError>;
    fn stop_stream(&mut self) -> Result<(), ApiError>;
}
