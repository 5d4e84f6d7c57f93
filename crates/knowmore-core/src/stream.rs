//! Decoder for the line-oriented chat data stream.
//!
//! Each line is `<code>:<json>`. The accumulator applies lines to a single
//! assistant [`Message`] in place: text deltas extend the trailing text part,
//! tool calls append invocation parts, and tool results fill `result` on the
//! matching existing part. Rebuilding the view after every applied line gives
//! each intermediate render state.
//!
//! | code | payload |
//! |------|---------|
//! | `f`  | `{"messageId"}` |
//! | `0`  | text delta (JSON string) |
//! | `9`  | `{"toolCallId","toolName","args"}` |
//! | `b`  | `{"toolCallId","toolName"}` (streaming call start) |
//! | `c`  | `{"toolCallId","argsTextDelta"}` |
//! | `a`  | `{"toolCallId","result"}` |
//! | `e`  | step finish |
//! | `d`  | `{"finishReason"}` |
//! | `3`  | error string or `{"error"}` |

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Message, MessageRole};
use crate::parts::{MessagePart, ToolInvocation};

/// What applying one line did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEffect {
    MessageStart,
    TextDelta { part_index: usize },
    ToolCall { part_index: usize },
    ToolArgsDelta { part_index: usize },
    ToolResult { part_index: usize },
    StepFinish,
    Finish,
    Error,
    /// Blank line or unknown code.
    Ignored,
}

impl LineEffect {
    /// Whether the message changed and views should be rebuilt.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::MessageStart
                | Self::TextDelta { .. }
                | Self::ToolCall { .. }
                | Self::ToolArgsDelta { .. }
                | Self::ToolResult { .. }
        )
    }
}

#[derive(Debug, Deserialize)]
struct MessageStartPayload {
    #[serde(rename = "messageId")]
    message_id: String,
}

#[derive(Debug, Deserialize)]
struct ToolCallPayload {
    #[serde(rename = "toolCallId")]
    tool_call_id: String,
    #[serde(rename = "toolName")]
    tool_name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Deserialize)]
struct ToolCallStartPayload {
    #[serde(rename = "toolCallId")]
    tool_call_id: String,
    #[serde(rename = "toolName")]
    tool_name: String,
}

#[derive(Debug, Deserialize)]
struct ToolArgsDeltaPayload {
    #[serde(rename = "toolCallId")]
    tool_call_id: String,
    #[serde(rename = "argsTextDelta")]
    args_text_delta: String,
}

#[derive(Debug, Deserialize)]
struct ToolResultPayload {
    #[serde(rename = "toolCallId")]
    tool_call_id: String,
    #[serde(default)]
    result: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct FinishPayload {
    #[serde(rename = "finishReason", default)]
    finish_reason: Option<String>,
}

/// Builds one assistant message from stream lines.
#[derive(Debug, Clone)]
pub struct StreamAccumulator {
    message: Message,
    revision: u64,
    finished: bool,
    finish_reason: Option<String>,
    error: Option<String>,
    args_text: HashMap<String, String>,
}

impl Default for StreamAccumulator {
    fn default() -> Self {
        Self::new("")
    }
}

impl StreamAccumulator {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message: Message::new(message_id, MessageRole::Assistant),
            revision: 0,
            finished: false,
            finish_reason: None,
            error: None,
            args_text: HashMap::new(),
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn into_message(self) -> Message {
        self.message
    }

    /// Incremented on every mutation of the message.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Apply one stream line.
    ///
    /// On error the accumulator is unchanged, so callers can log and keep
    /// going with the next line.
    pub fn apply_line(&mut self, line: &str) -> Result<LineEffect> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(LineEffect::Ignored);
        }

        let (code, payload) = line
            .split_once(':')
            .ok_or_else(|| Error::Stream(format!("missing type prefix in line {line:?}")))?;

        let effect = match code {
            "f" => {
                let start: MessageStartPayload = decode(code, payload)?;
                self.message.id = start.message_id;
                LineEffect::MessageStart
            }
            "0" => {
                let delta: String = decode(code, payload)?;
                self.push_text(&delta)
            }
            "9" => {
                let call: ToolCallPayload = decode(code, payload)?;
                self.upsert_tool_call(call.tool_call_id, call.tool_name, call.args)
            }
            "b" => {
                let start: ToolCallStartPayload = decode(code, payload)?;
                self.upsert_tool_call(
                    start.tool_call_id,
                    start.tool_name,
                    Value::Object(serde_json::Map::new()),
                )
            }
            "c" => {
                let delta: ToolArgsDeltaPayload = decode(code, payload)?;
                self.push_args_delta(&delta.tool_call_id, &delta.args_text_delta)?
            }
            "a" => {
                let result: ToolResultPayload = decode(code, payload)?;
                self.resolve_tool_call(&result.tool_call_id, result.result)?
            }
            "e" => {
                let step: FinishPayload = decode(code, payload).unwrap_or_default();
                if step.finish_reason.is_some() {
                    self.finish_reason = step.finish_reason;
                }
                LineEffect::StepFinish
            }
            "d" => {
                let finish: FinishPayload = decode(code, payload).unwrap_or_default();
                self.finished = true;
                if finish.finish_reason.is_some() {
                    self.finish_reason = finish.finish_reason;
                }
                LineEffect::Finish
            }
            "3" => {
                let value: Value = decode(code, payload)?;
                let message = match &value {
                    Value::String(s) => s.clone(),
                    other => other
                        .get("error")
                        .and_then(Value::as_str)
                        .map_or_else(|| other.to_string(), str::to_string),
                };
                tracing::warn!(error = %message, "Stream reported an error");
                self.error = Some(message);
                LineEffect::Error
            }
            other => {
                tracing::debug!(code = other, "Ignoring unknown stream code");
                LineEffect::Ignored
            }
        };

        if effect.is_mutation() {
            self.revision += 1;
        }
        Ok(effect)
    }

    fn push_text(&mut self, delta: &str) -> LineEffect {
        self.message.content.push_str(delta);
        let parts = self.message.parts.get_or_insert_with(Vec::new);
        if let Some(MessagePart::Text { text }) = parts.last_mut() {
            text.push_str(delta);
        } else {
            parts.push(MessagePart::text(delta));
        }
        LineEffect::TextDelta {
            part_index: parts.len() - 1,
        }
    }

    fn upsert_tool_call(
        &mut self,
        tool_call_id: String,
        tool_name: String,
        args: Value,
    ) -> LineEffect {
        if let Some(index) = self.find_tool_call(&tool_call_id) {
            self.args_text.remove(&tool_call_id);
            if let Some(invocation) = self.invocation_mut(index) {
                invocation.tool_name = tool_name;
                invocation.args = args;
            }
            return LineEffect::ToolCall { part_index: index };
        }

        self.message
            .push_part(MessagePart::tool_call(tool_call_id, tool_name, args));
        LineEffect::ToolCall {
            part_index: self.message.parts().len() - 1,
        }
    }

    fn push_args_delta(&mut self, tool_call_id: &str, delta: &str) -> Result<LineEffect> {
        let index = self.require_tool_call(tool_call_id)?;
        let buffer = self.args_text.entry(tool_call_id.to_string()).or_default();
        buffer.push_str(delta);
        let args = Value::String(buffer.clone());
        if let Some(invocation) = self.invocation_mut(index) {
            invocation.args = args;
        }
        Ok(LineEffect::ToolArgsDelta { part_index: index })
    }

    fn resolve_tool_call(
        &mut self,
        tool_call_id: &str,
        result: Option<Value>,
    ) -> Result<LineEffect> {
        let index = self.require_tool_call(tool_call_id)?;
        let Some(result) = result.filter(|result| !result.is_null()) else {
            tracing::debug!(tool_call_id, "Null tool result, call stays pending");
            return Ok(LineEffect::Ignored);
        };
        self.args_text.remove(tool_call_id);
        if let Some(invocation) = self.invocation_mut(index) {
            invocation.resolve(result);
        }
        Ok(LineEffect::ToolResult { part_index: index })
    }

    fn find_tool_call(&self, tool_call_id: &str) -> Option<usize> {
        self.message.parts().iter().position(|part| {
            part.as_tool_invocation()
                .is_some_and(|invocation| invocation.tool_call_id == tool_call_id)
        })
    }

    fn require_tool_call(&self, tool_call_id: &str) -> Result<usize> {
        self.find_tool_call(tool_call_id)
            .ok_or_else(|| Error::Stream(format!("unknown tool call id {tool_call_id:?}")))
    }

    fn invocation_mut(&mut self, index: usize) -> Option<&mut ToolInvocation> {
        self.message
            .parts
            .as_mut()
            .and_then(|parts| parts.get_mut(index))
            .and_then(MessagePart::as_tool_invocation_mut)
    }
}

fn decode<T: serde::de::DeserializeOwned>(code: &str, payload: &str) -> Result<T> {
    serde_json::from_str(payload)
        .map_err(|e| Error::Stream(format!("invalid payload for code {code:?}: {e}")))
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
